use std::fmt;

use crate::constants::N_SQUARES;

use BitboardError::*;

pub type Result<T> = std::result::Result<T, BitboardError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitboardError {
    IndexOutOfRange(i64),
    InvalidValue(String),
    ParseError(String),
    IOError(String),
    ConfigError(String),
}

impl fmt::Display for BitboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexOutOfRange(index) => write!(
                f,
                "Bit index {} is out of range, expected 0..={}",
                index,
                N_SQUARES - 1
            ),
            InvalidValue(msg) => write!(f, "{}", msg),
            ParseError(msg) => write!(f, "{}", msg),
            IOError(msg) => write!(f, "{}", msg),
            ConfigError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for BitboardError {}

impl From<std::io::Error> for BitboardError {
    fn from(e: std::io::Error) -> Self {
        IOError(format!("IO error: {}", e))
    }
}

#[test]
fn test_index_out_of_range_names_index_and_range() {
    assert_eq!(
        IndexOutOfRange(64).to_string(),
        "Bit index 64 is out of range, expected 0..=63"
    );
    assert_eq!(
        IndexOutOfRange(-1).to_string(),
        "Bit index -1 is out of range, expected 0..=63"
    );
}

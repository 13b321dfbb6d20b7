use core::cmp::Ordering;
use std::convert::TryFrom;
use std::fmt;

use crate::constants::*;
use crate::error::{BitboardError, Result};

const COLUMN_NAMES: [char; N_COLUMNS] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];

/*
 * A validated bit index. Index 0 is the bottom-left square (a1) and index 63
 * the top-right (h8).
 */
#[derive(Debug, Eq, PartialEq, Clone, Copy, Hash)]
pub struct Square(usize);

impl Square {
    /*
     * Build a square from a row (0 = bottom) and column (0 = left).
     */
    pub fn at(row: usize, column: usize) -> Result<Square> {
        if row >= N_ROWS || column >= N_COLUMNS {
            return Err(BitboardError::IndexOutOfRange(
                (row * N_COLUMNS + column) as i64,
            ));
        }
        Ok(Square(row * N_COLUMNS + column))
    }

    pub fn index(&self) -> usize {
        self.0
    }

    pub fn row(&self) -> usize {
        self.0 / N_COLUMNS
    }

    pub fn column(&self) -> usize {
        self.0 % N_COLUMNS
    }

    pub fn all_squares() -> impl Iterator<Item = Square> {
        (0..N_SQUARES).map(Square)
    }

    // Only for indices already known to be in range, eg from a trailing_zeros scan.
    pub(crate) fn from_index_unchecked(i: usize) -> Square {
        debug_assert!(i < N_SQUARES);
        Square(i)
    }
}

impl TryFrom<i64> for Square {
    type Error = BitboardError;

    fn try_from(index: i64) -> Result<Self> {
        if (0..N_SQUARES as i64).contains(&index) {
            Ok(Square(index as usize))
        } else {
            Err(BitboardError::IndexOutOfRange(index))
        }
    }
}

impl TryFrom<&str> for Square {
    type Error = BitboardError;

    fn try_from(s: &str) -> Result<Self> {
        crate::parse::parse_square(s)
    }
}

impl Ord for Square {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index().cmp(&other.index())
    }
}

impl PartialOrd for Square {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", COLUMN_NAMES[self.column()], self.row() + 1)
    }
}

#[test]
fn test_square_row_and_column() {
    let square = Square::try_from(8i64).unwrap();
    assert_eq!(square.row(), 1);
    assert_eq!(square.column(), 0);

    let square = Square::try_from(63i64).unwrap();
    assert_eq!(square.row(), 7);
    assert_eq!(square.column(), 7);

    assert_eq!(Square::at(3, 4).unwrap().index(), 28);
    assert!(Square::at(8, 0).is_err());
}

#[test]
fn test_square_out_of_range() {
    assert_eq!(Square::try_from(-1i64), Err(BitboardError::IndexOutOfRange(-1)));
    assert_eq!(Square::try_from(64i64), Err(BitboardError::IndexOutOfRange(64)));
}

#[test]
fn test_parse_square() {
    assert_eq!(Square::try_from("a1").unwrap().index(), 0);
    assert_eq!(Square::try_from("B1").unwrap().index(), 1);
    assert_eq!(Square::try_from("a2").unwrap().index(), 8);
    assert_eq!(Square::try_from("e4").unwrap().index(), 28);
    assert_eq!(Square::try_from("h8").unwrap().index(), 63);

    assert!(Square::try_from("i8").is_err());
    assert!(Square::try_from("a9").is_err());
}

#[test]
fn test_display_round_trips_through_parse() {
    for square in Square::all_squares() {
        let name = square.to_string();
        assert_eq!(Square::try_from(name.as_str()).unwrap(), square);
    }
}

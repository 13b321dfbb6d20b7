#[macro_use]
pub mod bitboard;
pub mod constants;
pub mod error;
pub mod logging;
pub mod parse;
pub mod repl;
pub mod square;

use crate::constants::*;
use crate::error::{BitboardError, Result};
use crate::square::*;
use log::trace;
use std::convert::TryFrom;
use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

/*
 * Build a `Result<Bitboard>` with the given bit indices set, eg
 * `bitboard![0, 1, 8]`. Fails on the first index outside 0..=63.
 */
#[macro_export]
macro_rules! bitboard {
    ( $( $index:expr ),* ) => {
        (|| -> $crate::error::Result<$crate::bitboard::Bitboard> {
            #[allow(unused_mut)]
            let mut board = $crate::bitboard::Bitboard::empty();
            $(
                board.set($index)?;
            )*
            Ok(board)
        })()
    };
}

/*
 * Demo board: bits 0, 1 and 8 set on top of `seed`.
 */
pub fn demo(seed: u64) -> Result<Bitboard> {
    Ok(Bitboard::new(seed) | bitboard![0, 1, 8]?)
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bitboard(u64);

impl Bitboard {
    pub fn new(seed: u64) -> Self {
        Bitboard(seed)
    }

    pub fn empty() -> Self {
        Bitboard(0x0)
    }

    pub fn full() -> Self {
        Self(u64::MAX)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// 1 if bit `index` is set, else 0.
    pub fn get(&self, index: i64) -> Result<u8> {
        let square = Square::try_from(index)?;
        Ok(self.is_set(square) as u8)
    }

    /// Set bit `index`, leaving every other bit alone.
    pub fn set(&mut self, index: i64) -> Result<()> {
        let square = Square::try_from(index)?;
        *self = self.with(square);
        trace!("Set bit {} ({}): {:x}", index, square, self);
        Ok(())
    }

    pub fn clear(&mut self, index: i64) -> Result<()> {
        let square = Square::try_from(index)?;
        *self = self.without(square);
        trace!("Cleared bit {} ({}): {:x}", index, square, self);
        Ok(())
    }

    pub fn is_set(&self, square: Square) -> bool {
        (self.0 >> square.index()) & 0b1 == 1
    }

    pub fn with(&self, square: Square) -> Self {
        Bitboard(self.0 | 1u64 << square.index())
    }

    pub fn without(&self, square: Square) -> Self {
        Bitboard(self.0 & !(1u64 << square.index()))
    }

    /*
     * Return all set squares in the bitboard, lowest index first
     */
    pub fn squares(&self) -> SquareIterator {
        SquareIterator::new(self)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn popcnt(&self) -> u32 {
        self.0.count_ones()
    }

    /*
     * All 64 bits in ascending index order, in space separated groups of 8.
     * Index 0 is the first character regardless of grid orientation.
     */
    pub fn to_binary_string(&self) -> String {
        let mut out = String::with_capacity(N_SQUARES + N_ROWS - 1);

        for square in Square::all_squares() {
            if square.index() > 0 && square.column() == 0 {
                out.push(' ');
            }
            out.push(self.symbol(square));
        }

        out
    }

    /*
     * 8 lines, top row (indices 56..63) first, so index 0 lands bottom-left.
     */
    pub fn to_grid_string(&self) -> String {
        self.to_string()
    }

    fn symbol(&self, square: Square) -> char {
        if self.is_set(square) {
            '1'
        } else {
            '0'
        }
    }
}

impl From<u64> for Bitboard {
    fn from(seed: u64) -> Self {
        Bitboard::new(seed)
    }
}

impl TryFrom<i128> for Bitboard {
    type Error = BitboardError;

    fn try_from(seed: i128) -> Result<Self> {
        u64::try_from(seed).map(Bitboard::new).map_err(|_| {
            BitboardError::InvalidValue(format!(
                "Value {} cannot be represented as a 64-bit board, expected 0..={}",
                seed,
                u64::MAX
            ))
        })
    }
}

pub struct SquareIterator {
    bitboard: Bitboard,
}

impl SquareIterator {
    fn new(bitboard: &Bitboard) -> Self {
        SquareIterator {
            bitboard: *bitboard,
        }
    }
}

impl Iterator for SquareIterator {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bitboard.is_empty() {
            None
        } else {
            let trailing_zeros = self.bitboard.0.trailing_zeros() as usize;
            let square = Square::from_index_unchecked(trailing_zeros);
            self.bitboard = self.bitboard.without(square);
            Some(square)
        }
    }
}

impl BitAnd for Bitboard {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl BitAndAssign for Bitboard {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl BitOr for Bitboard {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Bitboard {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl Not for Bitboard {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}

impl BitXor for Bitboard {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self::Output {
        Self(self.0 ^ rhs.0)
    }
}

impl BitXorAssign for Bitboard {
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

impl fmt::LowerHex for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bitboard(")?;
        fmt::LowerHex::fmt(&self.0, f)?; // delegate to u64's implementation
        write!(f, ")")
    }
}

impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..N_ROWS).rev() {
            for column in 0..N_COLUMNS {
                if column > 0 {
                    write!(f, " ")?;
                }
                let square = Square::at(row, column).map_err(|_| fmt::Error)?;
                write!(f, "{}", self.symbol(square))?;
            }
            if row > 0 {
                writeln!(f)?;
            }
        }

        fmt::Result::Ok(())
    }
}

#[cfg(test)]
use itertools::iproduct;

#[cfg(test)]
const DEMO_GRID: &str = "\
0 0 0 0 0 0 0 0
0 0 0 0 0 0 0 0
0 0 0 0 0 0 0 0
0 0 0 0 0 0 0 0
0 0 0 0 0 0 0 0
0 0 0 0 0 0 0 0
1 0 0 0 0 0 0 0
1 1 0 0 0 0 0 0";

#[cfg(test)]
const DEMO_BINARY: &str =
    "11000000 10000000 00000000 00000000 00000000 00000000 00000000 00000000";

#[test]
fn test_fresh_board_is_empty() {
    let board = Bitboard::new(0);
    for n in 0..64 {
        assert_eq!(board.get(n).unwrap(), 0);
    }
    assert_eq!(board, Bitboard::default());
}

#[test]
fn test_set_only_touches_its_own_bit() {
    let seed = 0x0123_4567_89ab_cdef;

    for (n, m) in iproduct!(0..64i64, 0..64i64) {
        let before = Bitboard::new(seed);
        let mut after = before;
        after.set(n).unwrap();

        assert_eq!(after.get(n).unwrap(), 1);
        if m != n {
            assert_eq!(after.get(m).unwrap(), before.get(m).unwrap());
        }
    }
}

#[test]
fn test_set_is_idempotent() {
    for n in 0..64 {
        let mut once = Bitboard::new(0x8000_0000_0000_0001);
        once.set(n).unwrap();

        let mut twice = once;
        twice.set(n).unwrap();

        assert_eq!(once, twice);
    }
}

#[test]
fn test_clear() {
    let mut board = Bitboard::full();
    board.clear(63).unwrap();
    board.clear(0).unwrap();
    assert_eq!(board.value(), 0x7fff_ffff_ffff_fffe);

    board.clear(0).unwrap();
    assert_eq!(board.value(), 0x7fff_ffff_ffff_fffe);
}

macro_rules! out_of_range_test {
    ( name=$name:ident, index=$index:expr ) => {
        paste::item! {
            #[test]
            fn [<test_get_and_set_reject_index_ $name>]() {
                let mut board = Bitboard::new(0xff);
                let original = board;

                assert_eq!(board.get($index), Err(BitboardError::IndexOutOfRange($index)));
                assert_eq!(board.set($index), Err(BitboardError::IndexOutOfRange($index)));
                assert_eq!(board.clear($index), Err(BitboardError::IndexOutOfRange($index)));
                assert_eq!(board, original);
            }
        }
    };
}

out_of_range_test!(name = minus_one, index = -1);
out_of_range_test!(name = sixty_four, index = 64);
out_of_range_test!(name = one_thousand, index = 1000);
out_of_range_test!(name = min, index = i64::MIN);
out_of_range_test!(name = max, index = i64::MAX);

#[test]
fn test_demo_grid() {
    let mut board = Bitboard::new(0);
    board.set(0).unwrap();
    board.set(1).unwrap();
    board.set(8).unwrap();

    assert_eq!(board.to_grid_string(), DEMO_GRID);
    assert_eq!(board.to_string(), DEMO_GRID);
    assert_eq!(demo(0).unwrap(), board);
}

#[test]
fn test_demo_binary_string() {
    let board = bitboard![0, 1, 8].unwrap();
    assert_eq!(board.to_binary_string(), DEMO_BINARY);
}

#[test]
fn test_grid_orientation() {
    let board = bitboard![63].unwrap();
    let grid = board.to_grid_string();
    let lines: Vec<&str> = grid.lines().collect();

    assert_eq!(lines.len(), 8);
    assert_eq!(lines[0], "0 0 0 0 0 0 0 1");
    assert!(lines[1..].iter().all(|line| *line == "0 0 0 0 0 0 0 0"));
}

#[test]
fn test_binary_string_round_trip() {
    for seed in [
        0,
        1,
        0x8000_0000_0000_0000,
        0x0123_4567_89ab_cdef,
        0xdead_beef_0000_ffff,
        u64::MAX,
    ] {
        let board = Bitboard::new(seed);
        let bits: String = board
            .to_binary_string()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        assert_eq!(bits.len(), 64);

        // reinterpret with index 0 as the least significant bit
        let reversed: String = bits.chars().rev().collect();
        let value = u64::from_str_radix(&reversed, 2).unwrap();
        let rebuilt = Bitboard::new(value);

        for n in 0..64 {
            assert_eq!(rebuilt.get(n).unwrap(), board.get(n).unwrap());
        }
    }
}

#[test]
fn test_bitboard_macro_rejects_bad_index() {
    assert_eq!(bitboard![3, 64], Err(BitboardError::IndexOutOfRange(64)));
    assert_eq!(bitboard![].unwrap(), Bitboard::empty());
}

#[test]
fn test_try_from_wide_integer() {
    assert_eq!(Bitboard::try_from(5i128).unwrap(), Bitboard::new(5));
    assert_eq!(
        Bitboard::try_from(u64::MAX as i128).unwrap(),
        Bitboard::full()
    );
    assert!(matches!(
        Bitboard::try_from(-1i128),
        Err(BitboardError::InvalidValue(_))
    ));
    assert!(matches!(
        Bitboard::try_from(u64::MAX as i128 + 1),
        Err(BitboardError::InvalidValue(_))
    ));
}

#[test]
fn test_squares() {
    let board = bitboard![42, 3, 63].unwrap();
    let squares: Vec<usize> = board.squares().map(|s| s.index()).collect();
    assert_eq!(squares, vec![3, 42, 63]);
    assert_eq!(board.popcnt(), 3);
    assert_eq!(Bitboard::empty().squares().next(), None);
}

#[test]
fn test_bit_operations() {
    let a = Bitboard::new(0b1100);
    let b = Bitboard::new(0b1010);

    assert_eq!((a & b).value(), 0b1000);
    assert_eq!((a | b).value(), 0b1110);
    assert_eq!((a ^ b).value(), 0b0110);
    assert_eq!(!Bitboard::empty(), Bitboard::full());
}

#[test]
fn test_print() {
    let board = bitboard![6, 14, 22, 30, 38, 46, 54, 62].unwrap();
    assert_eq!(format!("{:#x}", board), "Bitboard(0x4040404040404040)");
}

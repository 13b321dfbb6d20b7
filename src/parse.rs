use crate::bitboard::Bitboard;
use crate::constants::*;
use crate::error::{BitboardError, Result};
use crate::square::Square;
use log::debug;

use nom::{
    branch::alt,
    bytes::complete::tag_no_case,
    character::complete::{char, digit1, hex_digit1, multispace0, multispace1, one_of},
    combinator::{all_consuming, map, opt, recognize},
    multi::{many1, separated_list1},
    sequence::{delimited, pair, preceded},
    Finish, IResult,
};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Literal<'a> {
    Decimal(&'a str),
    Hex(&'a str),
    Binary(&'a str),
}

impl<'a> Literal<'a> {
    fn digits_and_radix(&self) -> (&'a str, u32) {
        match *self {
            Literal::Decimal(digits) => (digits, 10),
            Literal::Hex(digits) => (digits, 16),
            Literal::Binary(digits) => (digits, 2),
        }
    }
}

/*
 * An unsigned integer literal with an optional leading minus sign, so that
 * negative input can be reported as an invalid value instead of a syntax error.
 */
fn literal_parser(input: &str) -> IResult<&str, (bool, Literal)> {
    let hex = map(preceded(tag_no_case("0x"), hex_digit1), Literal::Hex);
    let binary = map(
        preceded(tag_no_case("0b"), recognize(many1(one_of("01")))),
        Literal::Binary,
    );
    let decimal = map(digit1, Literal::Decimal);

    let (input, sign) = opt(char('-'))(input)?;
    let (input, literal) = alt((hex, binary, decimal))(input)?;

    Ok((input, (sign.is_some(), literal)))
}

/*
 * Parse a board seed: decimal, 0x hex or 0b binary. Fails with
 * `InvalidValue` for negative values or values wider than 64 bits.
 */
pub fn parse_value(input: &str) -> Result<u64> {
    debug!("Parsing value: {}", input);

    let (negative, literal) = all_consuming(delimited(multispace0, literal_parser, multispace0))(
        input,
    )
    .finish()
    .map(|(_, v)| v)
    .map_err(|e| BitboardError::ParseError(format!("Could not parse value '{}': {}", input, e)))?;

    let (digits, radix) = literal.digits_and_radix();
    let magnitude = u64::from_str_radix(digits, radix).map_err(|e| {
        debug!("{:?}", e);
        BitboardError::InvalidValue(format!(
            "Value '{}' does not fit in 64 bits, expected 0..={}",
            input.trim(),
            u64::MAX
        ))
    })?;

    if negative && magnitude != 0 {
        return Err(BitboardError::InvalidValue(format!(
            "Value '{}' is negative, expected 0..={}",
            input.trim(),
            u64::MAX
        )));
    }

    Ok(magnitude)
}

fn signed_integer_parser(input: &str) -> IResult<&str, &str> {
    recognize(pair(opt(char('-')), digit1))(input)
}

pub fn square_parser(input: &str) -> IResult<&str, Square> {
    let (input, column) = one_of("abcdefghABCDEFGH")(input)?;
    let (input, row) = one_of("12345678")(input)?;

    let column = (column.to_ascii_lowercase() as u8 - b'a') as usize;
    let row = (row as u8 - b'1') as usize;

    match Square::at(row, column) {
        Ok(square) => Ok((input, square)),
        Err(_) => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Verify,
        ))),
    }
}

pub fn parse_square(input: &str) -> Result<Square> {
    all_consuming(square_parser)(input.trim())
        .finish()
        .map(|(_, s)| s)
        .map_err(|e| BitboardError::ParseError(format!("Could not parse square '{}': {}", input, e)))
}

/*
 * Parse a bit index, either as a signed integer or a square name like `e4`.
 * The range is not checked here; `Bitboard::get` and `Bitboard::set` report
 * out of range indices themselves.
 */
pub fn parse_index(input: &str) -> Result<i64> {
    let trimmed = input.trim();

    if let Ok((_, square)) = all_consuming(square_parser)(trimmed).finish() {
        return Ok(square.index() as i64);
    }

    let (_, digits) = all_consuming(signed_integer_parser)(trimmed)
        .finish()
        .map_err(|e| BitboardError::ParseError(format!("Could not parse index '{}': {}", input, e)))?;

    digits
        .parse::<i64>()
        .map_err(|_| BitboardError::ParseError(format!("Index '{}' is too large", trimmed)))
}

/*
 * Inverse of `Bitboard::to_binary_string`: whitespace separated groups of
 * 0 and 1, first character is bit index 0. Exactly 64 bits are required.
 */
pub fn parse_binary_string(input: &str) -> Result<Bitboard> {
    let group = recognize(many1(one_of("01")));
    let groups = separated_list1(multispace1, group);

    let (_, groups) = all_consuming(delimited(multispace0, groups, multispace0))(input)
        .finish()
        .map_err(|e: nom::error::Error<&str>| {
            BitboardError::ParseError(format!("Could not parse binary string '{}': {}", input, e))
        })?;

    let bits: Vec<char> = groups.concat().chars().collect();
    if bits.len() != N_SQUARES {
        return Err(BitboardError::InvalidValue(format!(
            "Binary string has {} bits, expected {}",
            bits.len(),
            N_SQUARES
        )));
    }

    let mut board = Bitboard::empty();
    for (index, bit) in bits.iter().enumerate() {
        if *bit == '1' {
            board.set(index as i64)?;
        }
    }

    Ok(board)
}

#[cfg(test)]
fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_parse_value() {
    init();

    assert_eq!(parse_value("0").unwrap(), 0);
    assert_eq!(parse_value("  259 ").unwrap(), 259);
    assert_eq!(parse_value("0x103").unwrap(), 259);
    assert_eq!(parse_value("0XfF").unwrap(), 255);
    assert_eq!(parse_value("0b100000011").unwrap(), 259);
    assert_eq!(parse_value("18446744073709551615").unwrap(), u64::MAX);
    assert_eq!(parse_value("0xffffffffffffffff").unwrap(), u64::MAX);
    assert_eq!(parse_value("-0").unwrap(), 0);
}

#[test]
fn test_parse_value_rejects_unrepresentable() {
    init();

    assert!(matches!(parse_value("-1"), Err(BitboardError::InvalidValue(_))));
    assert!(matches!(parse_value("-0x10"), Err(BitboardError::InvalidValue(_))));
    assert!(matches!(
        parse_value("18446744073709551616"),
        Err(BitboardError::InvalidValue(_))
    ));
    assert!(matches!(
        parse_value("0x10000000000000000"),
        Err(BitboardError::InvalidValue(_))
    ));
}

#[test]
fn test_parse_value_rejects_garbage() {
    init();

    for input in ["", "abc", "12abc", "0b", "0b102", "1 2", "--1"] {
        assert!(
            matches!(parse_value(input), Err(BitboardError::ParseError(_))),
            "expected parse error for {:?}",
            input
        );
    }
}

#[test]
fn test_parse_index() {
    assert_eq!(parse_index("0").unwrap(), 0);
    assert_eq!(parse_index(" 63 ").unwrap(), 63);
    assert_eq!(parse_index("-1").unwrap(), -1);
    assert_eq!(parse_index("1000").unwrap(), 1000);
    assert_eq!(parse_index("a1").unwrap(), 0);
    assert_eq!(parse_index("H8").unwrap(), 63);
    assert_eq!(parse_index("b2").unwrap(), 9);

    assert!(matches!(parse_index("x"), Err(BitboardError::ParseError(_))));
    assert!(matches!(parse_index(""), Err(BitboardError::ParseError(_))));
    assert!(matches!(
        parse_index("99999999999999999999"),
        Err(BitboardError::ParseError(_))
    ));
}

#[test]
fn test_parse_binary_string() {
    let board = parse_binary_string(
        "11000000 10000000 00000000 00000000 00000000 00000000 00000000 00000000",
    )
    .unwrap();
    assert_eq!(board.value(), 0b1_0000_0011);

    let ungrouped = format!("1{}", "0".repeat(62)) + "1";
    assert_eq!(
        parse_binary_string(&ungrouped).unwrap().value(),
        0x8000_0000_0000_0001
    );
}

#[test]
fn test_parse_binary_string_round_trip() {
    for seed in [0, 1, 0x0123_4567_89ab_cdef, 0xf0f0_0000_ffff_0001, u64::MAX] {
        let board = Bitboard::new(seed);
        assert_eq!(parse_binary_string(&board.to_binary_string()).unwrap(), board);
    }
}

#[test]
fn test_parse_binary_string_wrong_length() {
    assert!(matches!(
        parse_binary_string("1100"),
        Err(BitboardError::InvalidValue(_))
    ));
    assert!(matches!(
        parse_binary_string(&"1".repeat(65)),
        Err(BitboardError::InvalidValue(_))
    ));
    assert!(matches!(
        parse_binary_string("1100 2"),
        Err(BitboardError::ParseError(_))
    ));
}

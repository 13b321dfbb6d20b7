use crate::bitboard::Bitboard;
use crate::error::{BitboardError, Result};
use crate::parse::{parse_binary_string, parse_index, parse_value};
use crate::square::Square;
use log::{debug, info};
use std::fmt;
use std::io::{BufRead, Write};

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::space1,
    combinator::{eof, map, rest, value},
    sequence::{preceded, terminated},
    Finish, IResult,
};

const HELP: &str = "\
commands:
  new [VALUE]    start over from VALUE (decimal, 0x hex or 0b binary), default 0
  get INDEX      print bit INDEX (0..=63 or a square like e4)
  set INDEX      set bit INDEX
  clear INDEX    clear bit INDEX
  grid | show    print the board as an 8x8 grid, index 0 bottom-left
  bin            print all 64 bits in index order
  load BITS      replace the board from the output of `bin`
  hex | value    print the board as hex or decimal
  count          number of set bits
  squares        list set squares
  and/or/xor V   combine the board with V
  not            invert every bit
  help | quit";

/*
 * Interactive session over a single board. Each input line is one command;
 * a failing command reports its error and the session carries on.
 */
#[derive(Debug, Clone)]
pub struct Session {
    board: Bitboard,
    prompt: Option<String>,
}

impl Session {
    pub fn new(board: Bitboard) -> Self {
        Session {
            board,
            prompt: None,
        }
    }

    pub fn with_prompt(mut self, prompt: &str) -> Self {
        self.prompt = Some(prompt.to_string());
        self
    }

    pub fn board(&self) -> Bitboard {
        self.board
    }

    /*
     * Main read-eval-print loop. Returns on `quit` or end of input.
     */
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> Result<()> {
        info!("REPL: starting new session with {:x}", self.board);

        loop {
            if let Some(prompt) = &self.prompt {
                write!(output, "{}", prompt)?;
                output.flush()?;
            }

            let mut buffer = String::new();
            if read_line(&mut input, &mut buffer)? == 0 {
                info!("REPL: end of input");
                break;
            }

            let line = buffer.trim();
            if line.is_empty() {
                continue;
            }

            match parse_command(line).and_then(|command| self.execute(command)) {
                Ok(Some(Response::Quit)) => break,
                Ok(Some(response)) => writeln!(output, "{}", response)?,
                Ok(None) => {}
                Err(e) => {
                    debug!("REPL: command '{}' failed: {}", line, e);
                    writeln!(output, "error: {}", e)?;
                }
            }
        }

        output.flush()?;
        Ok(())
    }

    pub fn execute(&mut self, command: Command) -> Result<Option<Response>> {
        info!("REPL: executing {:?}", command);

        let response = match command {
            Command::New(seed) => {
                self.board = Bitboard::new(seed);
                None
            }
            Command::Get(index) => Some(Response::Bit(self.board.get(index)?)),
            Command::Set(index) => {
                self.board.set(index)?;
                None
            }
            Command::Clear(index) => {
                self.board.clear(index)?;
                None
            }
            Command::Load(board) => {
                self.board = board;
                None
            }
            Command::And(value) => {
                self.board &= Bitboard::new(value);
                None
            }
            Command::Or(value) => {
                self.board |= Bitboard::new(value);
                None
            }
            Command::Xor(value) => {
                self.board ^= Bitboard::new(value);
                None
            }
            Command::Not => {
                self.board = !self.board;
                None
            }
            Command::Grid => Some(Response::Grid(self.board)),
            Command::Binary => Some(Response::Binary(self.board)),
            Command::Hex => Some(Response::Hex(self.board)),
            Command::Value => Some(Response::Value(self.board)),
            Command::Count => Some(Response::Count(self.board.popcnt())),
            Command::Squares => Some(Response::Squares(self.board.squares().collect())),
            Command::Help => Some(Response::Help),
            Command::Quit => Some(Response::Quit),
        };

        Ok(response)
    }
}

fn read_line<R: BufRead>(input: &mut R, buffer: &mut String) -> Result<usize> {
    let n = input
        .read_line(buffer)
        .map_err(|e| BitboardError::IOError(format!("IO error: {}", e)))?;
    debug!("REPL: got input {:?}", buffer);
    Ok(n)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Keyword {
    New,
    Get,
    Set,
    Clear,
    Load,
    And,
    Or,
    Xor,
    Not,
    Grid,
    Binary,
    Hex,
    Value,
    Count,
    Squares,
    Help,
    Quit,
}

/*
 * Split a line into its keyword and the (possibly empty) argument text.
 */
fn command_parser(input: &str) -> IResult<&str, (Keyword, &str)> {
    let mut keyword = alt((
        value(Keyword::New, tag("new")),
        value(Keyword::Get, tag("get")),
        value(Keyword::Set, tag("set")),
        value(Keyword::Clear, tag("clear")),
        value(Keyword::Load, tag("load")),
        value(Keyword::And, tag("and")),
        value(Keyword::Or, tag("or")),
        value(Keyword::Xor, tag("xor")),
        value(Keyword::Not, tag("not")),
        value(Keyword::Grid, alt((tag("grid"), tag("show")))),
        value(Keyword::Binary, tag("bin")),
        value(Keyword::Hex, tag("hex")),
        value(Keyword::Value, tag("value")),
        value(Keyword::Count, tag("count")),
        value(Keyword::Squares, tag("squares")),
        value(Keyword::Help, tag("help")),
        value(Keyword::Quit, alt((tag("quit"), tag("exit")))),
    ));

    let arguments = alt((preceded(space1, rest), map(eof, |_| "")));

    let (input, keyword) = keyword(input)?;
    let (input, arguments) = terminated(arguments, eof)(input)?;

    Ok((input, (keyword, arguments)))
}

pub fn parse_command(input: &str) -> Result<Command> {
    let line = input.trim();

    let (_, (keyword, arguments)) = command_parser(line)
        .finish()
        .map_err(|_| BitboardError::ParseError(format!("Unknown command '{}', try 'help'", line)))?;
    let arguments = arguments.trim();

    let command = match keyword {
        Keyword::New if arguments.is_empty() => Command::New(0),
        Keyword::New => Command::New(parse_value(arguments)?),
        Keyword::Get => Command::Get(parse_index(arguments)?),
        Keyword::Set => Command::Set(parse_index(arguments)?),
        Keyword::Clear => Command::Clear(parse_index(arguments)?),
        Keyword::Load => Command::Load(parse_binary_string(arguments)?),
        Keyword::And => Command::And(parse_value(arguments)?),
        Keyword::Or => Command::Or(parse_value(arguments)?),
        Keyword::Xor => Command::Xor(parse_value(arguments)?),
        Keyword::Not => no_arguments(line, arguments, Command::Not)?,
        Keyword::Grid => no_arguments(line, arguments, Command::Grid)?,
        Keyword::Binary => no_arguments(line, arguments, Command::Binary)?,
        Keyword::Hex => no_arguments(line, arguments, Command::Hex)?,
        Keyword::Value => no_arguments(line, arguments, Command::Value)?,
        Keyword::Count => no_arguments(line, arguments, Command::Count)?,
        Keyword::Squares => no_arguments(line, arguments, Command::Squares)?,
        Keyword::Help => no_arguments(line, arguments, Command::Help)?,
        Keyword::Quit => no_arguments(line, arguments, Command::Quit)?,
    };

    debug!("REPL: got command {:?}", command);
    Ok(command)
}

fn no_arguments(line: &str, arguments: &str, command: Command) -> Result<Command> {
    if arguments.is_empty() {
        Ok(command)
    } else {
        Err(BitboardError::ParseError(format!(
            "Command '{}' takes no arguments",
            line
        )))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    New(u64),
    Get(i64),
    Set(i64),
    Clear(i64),
    Load(Bitboard),
    And(u64),
    Or(u64),
    Xor(u64),
    Not,
    Grid,
    Binary,
    Hex,
    Value,
    Count,
    Squares,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Bit(u8),
    Grid(Bitboard),
    Binary(Bitboard),
    Hex(Bitboard),
    Value(Bitboard),
    Count(u32),
    Squares(Vec<Square>),
    Help,
    Quit,
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Bit(bit) => write!(f, "{}", bit),
            Response::Grid(board) => write!(f, "{}", board.to_grid_string()),
            Response::Binary(board) => write!(f, "{}", board.to_binary_string()),
            Response::Hex(board) => write!(f, "{:#018x}", board.value()),
            Response::Value(board) => write!(f, "{}", board.value()),
            Response::Count(count) => write!(f, "{}", count),
            Response::Squares(squares) => {
                let names: Vec<String> = squares
                    .iter()
                    .map(|s| format!("{} ({})", s.index(), s))
                    .collect();
                write!(f, "{}", names.join(" "))
            }
            Response::Help => write!(f, "{}", HELP),
            Response::Quit => Ok(()),
        }
    }
}

#[cfg(test)]
fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[cfg(test)]
fn run_session(script: &str) -> (Bitboard, String) {
    let mut session = Session::new(Bitboard::empty());
    let mut output = Vec::new();
    session.run(script.as_bytes(), &mut output).unwrap();
    (session.board(), String::from_utf8(output).unwrap())
}

#[test]
fn test_parse_command() {
    init();

    assert_eq!(parse_command("new").unwrap(), Command::New(0));
    assert_eq!(parse_command("new 0xff").unwrap(), Command::New(255));
    assert_eq!(parse_command("  get 8 ").unwrap(), Command::Get(8));
    assert_eq!(parse_command("set e4").unwrap(), Command::Set(28));
    assert_eq!(parse_command("clear -1").unwrap(), Command::Clear(-1));
    assert_eq!(parse_command("show").unwrap(), Command::Grid);
    assert_eq!(parse_command("bin").unwrap(), Command::Binary);
    assert_eq!(parse_command("xor 0b11").unwrap(), Command::Xor(3));
    assert_eq!(parse_command("exit").unwrap(), Command::Quit);
}

#[test]
fn test_parse_command_errors() {
    init();

    assert!(matches!(parse_command("frobnicate"), Err(BitboardError::ParseError(_))));
    assert!(matches!(parse_command("setx 1"), Err(BitboardError::ParseError(_))));
    assert!(matches!(parse_command("get"), Err(BitboardError::ParseError(_))));
    assert!(matches!(parse_command("grid 3"), Err(BitboardError::ParseError(_))));
    assert!(matches!(parse_command("new -5"), Err(BitboardError::InvalidValue(_))));
}

#[test]
fn test_session_demo() {
    init();

    let (board, output) = run_session("set 0\nset 1\nset a2\ngrid\nbin\nquit\nset 63\n");

    assert_eq!(board, Bitboard::new(0b1_0000_0011));
    assert_eq!(
        output,
        "\
0 0 0 0 0 0 0 0
0 0 0 0 0 0 0 0
0 0 0 0 0 0 0 0
0 0 0 0 0 0 0 0
0 0 0 0 0 0 0 0
0 0 0 0 0 0 0 0
1 0 0 0 0 0 0 0
1 1 0 0 0 0 0 0
11000000 10000000 00000000 00000000 00000000 00000000 00000000 00000000
"
    );
}

#[test]
fn test_session_reports_errors_and_continues() {
    init();

    let (board, output) = run_session("set 64\nget -1\nnew -3\nset 5\nget 5\n");

    assert_eq!(board, Bitboard::new(1 << 5));
    assert_eq!(
        output.lines().collect::<Vec<&str>>(),
        vec![
            "error: Bit index 64 is out of range, expected 0..=63",
            "error: Bit index -1 is out of range, expected 0..=63",
            "error: Value '-3' is negative, expected 0..=18446744073709551615",
            "1",
        ]
    );
}

#[test]
fn test_session_load_round_trip() {
    init();

    let seed = Bitboard::new(0xdead_beef_cafe_f00d);
    let script = format!("load {}\nhex\nvalue\ncount\n", seed.to_binary_string());
    let (board, output) = run_session(&script);

    let expected = format!("0xdeadbeefcafef00d\n{}\n{}\n", seed.value(), seed.popcnt());

    assert_eq!(board, seed);
    assert_eq!(output, expected);
}

#[test]
fn test_session_bulk_operations() {
    init();

    let (board, output) =
        run_session("new 0b1100\nand 0b1010\nor 1\nsquares\nnot\nxor 0xffffffffffffffff\n");

    assert_eq!(board, Bitboard::new(0b1001));
    assert_eq!(output, "0 (a1) 3 (d1)\n");
}

#[test]
fn test_session_prompt() {
    let mut session = Session::new(Bitboard::empty()).with_prompt("> ");
    let mut output = Vec::new();
    session.run("get 0\n".as_bytes(), &mut output).unwrap();

    assert_eq!(String::from_utf8(output).unwrap(), "> 0\n> ");
}

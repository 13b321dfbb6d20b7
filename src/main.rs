use bitboard_repl::bitboard::{self, Bitboard};
use bitboard_repl::error::Result;
use bitboard_repl::logging;
use bitboard_repl::parse::parse_value;
use bitboard_repl::repl::Session;
use log::{error, info};
use std::io;
use std::process;

const USAGE: &str = "\
usage: bitboard [--demo] [SEED]

  SEED     initial board value (decimal, 0x hex or 0b binary), default 0
  --demo   set bits 0, 1 and 8 on SEED, print the grid and exit

Without --demo an interactive session starts on stdin; type `help` for commands.";

fn main() {
    if let Err(e) = logging::init() {
        eprintln!("warning: {}", e);
    }

    if let Err(e) = run(std::env::args().skip(1).collect()) {
        error!("{}", e);
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(args: Vec<String>) -> Result<()> {
    let mut demo = false;
    let mut seed = 0;

    for arg in &args {
        match arg.as_str() {
            "--demo" => demo = true,
            "-h" | "--help" => {
                println!("{}", USAGE);
                return Ok(());
            }
            other => seed = parse_value(other)?,
        }
    }

    if demo {
        let board = bitboard::demo(seed)?;
        info!("Demo board {:x}", board);
        println!("{}", board.to_grid_string());
        return Ok(());
    }

    let stdin = io::stdin();
    Session::new(Bitboard::new(seed))
        .with_prompt("> ")
        .run(stdin.lock(), io::stdout())
}

use std::io::{BufRead, Write};

use anyhow::{bail, Result};

use crate::tic_tac_toe::{Board, Mark, CELLS};

const QUIT_WORDS: [&str; 3] = ["q", "quit", "exit"];

/// What the player answered at a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reply<T> {
    Value(T),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    TwoPlayer,
    VsComputer,
}

fn is_quit(line: &str) -> bool {
    QUIT_WORDS.contains(&line.to_lowercase().as_str())
}

/// Keep asking until `parse` accepts a line. Rejections are shown to the
/// player; end of input counts as quitting.
pub(crate) fn prompt<R, W, T, P>(input: &mut R, output: &mut W, message: &str, mut parse: P) -> Result<Reply<T>>
where
    R: BufRead,
    W: Write,
    P: FnMut(&str) -> Result<Reply<T>>,
{
    loop {
        write!(output, "{}", message)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(Reply::Quit);
        }

        match parse(line.trim()) {
            Ok(reply) => return Ok(reply),
            Err(err) => writeln!(output, "{}", err)?,
        }
    }
}

pub(crate) fn parse_mode(line: &str) -> Result<Reply<Mode>> {
    match line {
        "1" => Ok(Reply::Value(Mode::TwoPlayer)),
        "2" => Ok(Reply::Value(Mode::VsComputer)),
        _ if is_quit(line) => Ok(Reply::Quit),
        _ => bail!("Invalid choice. Enter 1 or 2."),
    }
}

pub(crate) fn parse_mark(line: &str) -> Result<Reply<Mark>> {
    match line.to_uppercase().as_str() {
        "X" => Ok(Reply::Value(Mark::X)),
        "O" => Ok(Reply::Value(Mark::O)),
        _ => bail!("Please type X or O."),
    }
}

/// Positions are typed 1-9 and returned as board indices 0-8.
pub(crate) fn parse_position(line: &str, board: &Board) -> Result<Reply<usize>> {
    if is_quit(line) {
        return Ok(Reply::Quit);
    }
    let Ok(position) = line.parse::<usize>() else {
        bail!("Please enter a number 1-9 (or 'q' to quit).");
    };
    if !(1..=CELLS).contains(&position) {
        bail!("Invalid position. Choose 1 through 9.");
    }
    if !board.is_empty(position - 1) {
        bail!("That cell is already taken. Choose another.");
    }
    Ok(Reply::Value(position - 1))
}

pub(crate) fn parse_again(line: &str) -> Result<Reply<bool>> {
    match line.to_lowercase().as_str() {
        "y" => Ok(Reply::Value(true)),
        "n" => Ok(Reply::Value(false)),
        _ => bail!("Enter y or n."),
    }
}

use std::fmt;
use anyhow::{Result, bail};

use crate::game::Game;

pub(crate) const CELLS: usize = 9;

/// Every row, column and diagonal, scanned in this order.
pub(crate) const LINES: [[usize; 3]; 8] = [
    [0, 1, 2], [3, 4, 5], [6, 7, 8],
    [0, 3, 6], [1, 4, 7], [2, 5, 8],
    [0, 4, 8], [2, 4, 6],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Mark {
    X,
    O,
}

impl Mark {
    pub(crate) fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Mark::X => write!(f, "X"),
            Mark::O => write!(f, "O"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Spot {
    Empty,
    Filled(Mark),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Ongoing,
    Won(Mark),
    Drawn,
}

/// Row-major 3x3 grid: 0, 1, 2 is the top row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Board {
    spots: [Spot; CELLS],
}

impl Board {
    pub fn new() -> Self {
        Self {
            spots: [Spot::Empty; CELLS],
        }
    }

    pub fn get(&self, index: usize) -> Option<Spot> {
        self.spots.get(index).copied()
    }

    pub fn is_empty(&self, index: usize) -> bool {
        self.get(index) == Some(Spot::Empty)
    }

    pub fn is_full(&self) -> bool {
        self.spots.iter().all(|&spot| spot != Spot::Empty)
    }

    pub fn available_moves(&self) -> Vec<usize> {
        (0..CELLS).filter(|&index| self.is_empty(index)).collect()
    }

    // Callers check the index first; the search only places on empty cells.
    pub fn place(&mut self, index: usize, mark: Mark) {
        self.spots[index] = Spot::Filled(mark);
    }

    pub fn clear(&mut self, index: usize) {
        self.spots[index] = Spot::Empty;
    }
}

/// Classify a board as won, drawn or still in play.
///
/// The first complete line found wins; mark counts are not validated.
pub(crate) fn evaluate(board: &Board) -> Outcome {
    for [a, b, c] in LINES {
        if let Spot::Filled(mark) = board.spots[a] {
            if board.spots[b] == Spot::Filled(mark) && board.spots[c] == Spot::Filled(mark) {
                return Outcome::Won(mark);
            }
        }
    }

    if board.is_full() {
        Outcome::Drawn
    } else {
        Outcome::Ongoing
    }
}

impl fmt::Display for Board {
    // Empty cells show the 1-based number a player types to claim them.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f)?;
        for (row, cells) in self.spots.chunks(3).enumerate() {
            if row > 0 {
                writeln!(f, "---+---+---")?;
            }
            let symbols: Vec<String> = cells
                .iter()
                .enumerate()
                .map(|(col, spot)| match spot {
                    Spot::Empty => (row * 3 + col + 1).to_string(),
                    Spot::Filled(mark) => mark.to_string(),
                })
                .collect();
            writeln!(f, " {} ", symbols.join(" | "))?;
        }
        writeln!(f)
    }
}

/// A match in progress: the board plus whose turn it is.
#[derive(Debug, Clone)]
pub(crate) struct TicTacToe {
    pub board: Board,
    pub current_player: Mark,
}

impl TicTacToe {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current_player: Mark::X,
        }
    }

    pub fn outcome(&self) -> Outcome {
        evaluate(&self.board)
    }
}

impl Game for TicTacToe {
    type Action = usize;
    type Player = Mark;

    fn step(&mut self, action: usize) -> Result<()> {
        if self.done() {
            bail!("Game is already over");
        }
        match self.board.get(action) {
            None => bail!("Position {} is off the board", action),
            Some(Spot::Filled(_)) => bail!("Spot is already filled"),
            Some(Spot::Empty) => {
                self.board.place(action, self.current_player);
                self.current_player = self.current_player.opponent();
                Ok(())
            }
        }
    }

    fn get_available_moves(&self) -> Vec<usize> {
        self.board.available_moves()
    }

    fn current_player(&self) -> Mark {
        self.current_player
    }

    fn done(&self) -> bool {
        self.outcome() != Outcome::Ongoing
    }

    fn check_winner(&self) -> Option<Mark> {
        match self.outcome() {
            Outcome::Won(mark) => Some(mark),
            _ => None,
        }
    }
}

impl fmt::Display for TicTacToe {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.board)
    }
}

/// Build a board from nine `X`, `O` or `.` characters; whitespace is ignored.
#[cfg(test)]
pub(crate) fn board_from(layout: &str) -> Board {
    let spots: Vec<Spot> = layout
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            'X' => Spot::Filled(Mark::X),
            'O' => Spot::Filled(Mark::O),
            _ => Spot::Empty,
        })
        .collect();
    Board {
        spots: spots.try_into().expect("a board has nine cells"),
    }
}

mod console;
mod game;
mod minimax;
mod tic_tac_toe;

use std::env;
use std::io::{self, BufRead, Write};

use anyhow::Context;
use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};

use crate::console::{prompt, Mode, Reply};
use crate::game::Game;
use crate::minimax::{Minimax, RandomTieBreak, TieBreak};
use crate::tic_tac_toe::{Mark, TicTacToe};

/// Seeds the computer's tie-break so games can be replayed.
const SEED_VAR: &str = "TICTACTOE_SEED";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut minimax = Minimax::new(RandomTieBreak::new(tie_break_rng()?));
    let stdin = io::stdin();
    run(&mut stdin.lock(), &mut io::stdout(), &mut minimax)
}

fn tie_break_rng() -> anyhow::Result<StdRng> {
    match env::var(SEED_VAR) {
        Ok(value) => {
            let seed = parse_seed(&value)?;
            info!("seeding tie-break rng with {}", seed);
            Ok(StdRng::seed_from_u64(seed))
        }
        Err(env::VarError::NotPresent) => Ok(StdRng::from_entropy()),
        Err(err) => Err(err).with_context(|| format!("reading {}", SEED_VAR)),
    }
}

fn parse_seed(value: &str) -> anyhow::Result<u64> {
    value
        .trim()
        .parse()
        .with_context(|| format!("{} must be an unsigned integer, got {:?}", SEED_VAR, value))
}

/// Menu, one game, replay question; until the player quits.
fn run<R, W, T>(input: &mut R, output: &mut W, minimax: &mut Minimax<T>) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
    T: TieBreak,
{
    writeln!(output, "Welcome to Tic-Tac-Toe!")?;
    loop {
        writeln!(output, "Modes:")?;
        writeln!(output, " 1. 2-player (human vs human)")?;
        writeln!(output, " 2. Play vs computer (unbeatable)")?;
        let mode = match prompt(input, output, "Choose mode 1 or 2 (or 'q' to quit): ", console::parse_mode)? {
            Reply::Value(mode) => mode,
            Reply::Quit => {
                writeln!(output, "Goodbye!")?;
                return Ok(());
            }
        };
        info!("starting {:?} game", mode);

        let computer = match mode {
            Mode::TwoPlayer => {
                writeln!(output, "2-player mode. Player X goes first.")?;
                None
            }
            Mode::VsComputer => {
                let question = "Do you want to be X (goes first) or O (goes second)? [X/O]: ";
                let human = match prompt(input, output, question, console::parse_mark)? {
                    Reply::Value(mark) => mark,
                    Reply::Quit => {
                        writeln!(output, "Goodbye!")?;
                        return Ok(());
                    }
                };
                writeln!(output, "You are {}. Computer is {}.", human, human.opponent())?;
                Some(human.opponent())
            }
        };

        if !play_game(input, output, minimax, computer)? {
            writeln!(output, "Exiting game. Goodbye!")?;
            return Ok(());
        }

        match prompt(input, output, "Play again? (y/n): ", console::parse_again)? {
            Reply::Value(true) => continue,
            Reply::Value(false) | Reply::Quit => {
                writeln!(output, "Thanks for playing!")?;
                return Ok(());
            }
        }
    }
}

/// Play one game to its end. Returns `false` if the player quit midway.
fn play_game<R, W, T>(input: &mut R, output: &mut W, minimax: &mut Minimax<T>, computer: Option<Mark>) -> anyhow::Result<bool>
where
    R: BufRead,
    W: Write,
    T: TieBreak,
{
    let mut game = TicTacToe::new();
    write!(output, "{}", game)?;

    while !game.done() {
        let mark = game.current_player();
        debug!("{} to move, available {:?}", mark, game.get_available_moves());

        let action = if computer == Some(mark) {
            writeln!(output, "Computer's turn...")?;
            minimax
                .best_move(&game.board, mark, mark.opponent())
                .context("computer has no move on an unfinished board")?
        } else {
            let message = format!("Player {}, enter position (1-9): ", mark);
            match prompt(input, output, &message, |line| console::parse_position(line, &game.board))? {
                Reply::Value(action) => action,
                Reply::Quit => return Ok(false),
            }
        };

        game.step(action)?;
        debug!("{} played {}", mark, action);
        write!(output, "{}", game)?;
    }

    let winner = game.check_winner();
    info!("game over, winner {:?}", winner);
    match (winner, computer) {
        (None, _) => writeln!(output, "It's a tie!")?,
        (Some(winner), Some(computer)) if winner == computer => {
            writeln!(output, "Computer wins. Better luck next time!")?
        }
        (Some(_), Some(_)) => writeln!(output, "Congratulations, you win!")?,
        (Some(winner), None) => writeln!(output, "Player {} wins!", winner)?,
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn first(candidates: &[usize]) -> Option<usize> {
        candidates.first().copied()
    }

    fn play(script: &str) -> String {
        let mut input = Cursor::new(script.to_string());
        let mut output = Vec::new();
        let mut minimax = Minimax::new(first);
        run(&mut input, &mut output, &mut minimax).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_parse_seed() {
        assert_eq!(parse_seed(" 42\n").unwrap(), 42);
        assert!(parse_seed("-1").is_err());
        assert!(parse_seed("seed").is_err());
    }

    #[test]
    fn test_quit_from_menu() {
        let output = play("q\n");
        assert!(output.starts_with("Welcome to Tic-Tac-Toe!\n"));
        assert!(output.ends_with("Goodbye!\n"));
    }

    #[test]
    fn test_two_player_game() {
        let output = play("1\n1\n4\n4\n2\n5\n3\nn\n");
        assert!(output.contains("2-player mode. Player X goes first."));
        assert!(output.contains("That cell is already taken. Choose another."));
        assert!(output.contains("\n X | X | X \n"));
        assert!(output.contains("Player X wins!"));
        assert!(output.ends_with("Thanks for playing!\n"));
    }

    #[test]
    fn test_quit_mid_game() {
        let output = play("1\n5\nquit\n");
        assert!(output.ends_with("Exiting game. Goodbye!\n"));
        assert!(!output.contains("wins"));
    }

    #[test]
    fn test_computer_is_never_beaten() {
        // The human tries cells in order; taken ones are rejected and retried.
        for human in ["X", "O"] {
            let script = format!("2\n{}\n1\n2\n3\n4\n5\n6\n7\n8\n9\nn\n", human);
            let output = play(&script);
            assert!(output.contains("Computer's turn..."));
            assert!(!output.contains("you win"), "{}", output);
            assert!(output.contains("It's a tie!") || output.contains("Computer wins."));
            assert!(output.ends_with("Thanks for playing!\n"));
        }
    }

    #[test]
    fn test_replay_returns_to_menu() {
        let output = play("1\n1\n4\n2\n5\n3\ny\nq\n");
        assert_eq!(output.matches("Modes:").count(), 2);
        assert!(output.ends_with("Goodbye!\n"));
    }
}

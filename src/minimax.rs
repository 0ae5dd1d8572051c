use log::{debug, trace};
use rand::{seq::SliceRandom, Rng};

use crate::tic_tac_toe::{evaluate, Board, Mark, Outcome};

/// Score of a win on the very next ply; each extra ply costs one point.
const WIN_SCORE: i32 = 10;

/// Chooses one cell out of a set of equally good moves.
pub(crate) trait TieBreak {
    fn pick(&mut self, candidates: &[usize]) -> Option<usize>;
}

impl<F> TieBreak for F
where
    F: FnMut(&[usize]) -> Option<usize>,
{
    fn pick(&mut self, candidates: &[usize]) -> Option<usize> {
        self(candidates)
    }
}

/// Uniform choice driven by an injected rng.
pub(crate) struct RandomTieBreak<R> {
    rng: R,
}

impl<R: Rng> RandomTieBreak<R> {
    pub(crate) fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> TieBreak for RandomTieBreak<R> {
    fn pick(&mut self, candidates: &[usize]) -> Option<usize> {
        candidates.choose(&mut self.rng).copied()
    }
}

/// The sides involved in one top-level search, plus how many positions it has visited.
struct SearchContext {
    player: Mark,
    opponent: Mark,
    nodes: usize,
}

impl SearchContext {
    fn new(player: Mark, opponent: Mark) -> Self {
        Self {
            player,
            opponent,
            nodes: 0,
        }
    }

    /// Exhaustive minimax from `player`'s point of view.
    ///
    /// Wins score `10 - depth` and losses `depth - 10`, so faster wins and
    /// slower losses are preferred. Every placement is undone before returning.
    fn score(&mut self, board: &mut Board, depth: i32, maximizing: bool) -> i32 {
        self.nodes += 1;

        match evaluate(board) {
            Outcome::Won(mark) if mark == self.player => return WIN_SCORE - depth,
            Outcome::Won(_) => return -WIN_SCORE + depth,
            Outcome::Drawn => return 0,
            Outcome::Ongoing => {}
        }

        let mark = if maximizing { self.player } else { self.opponent };
        let mut best = if maximizing { i32::MIN } else { i32::MAX };
        for action in board.available_moves() {
            board.place(action, mark);
            let score = self.score(board, depth + 1, !maximizing);
            board.clear(action);
            best = if maximizing { best.max(score) } else { best.min(score) };
        }
        best
    }
}

pub(crate) struct Minimax<T> {
    tie_break: T,
}

impl<T: TieBreak> Minimax<T> {
    pub(crate) fn new(tie_break: T) -> Self {
        Self { tie_break }
    }

    /// Pick an optimal cell for `computer` to play on `board`.
    ///
    /// Every move reaching the best score is collected and the tie-break
    /// picks among them. Returns `None` when the board is already decided,
    /// since there is no move to make. `board` itself is never modified.
    pub(crate) fn best_move(&mut self, board: &Board, computer: Mark, human: Mark) -> Option<usize> {
        if evaluate(board) != Outcome::Ongoing {
            debug!("no move to search, board is terminal");
            return None;
        }

        let mut scratch = board.clone();
        let mut context = SearchContext::new(computer, human);
        let mut best_score = i32::MIN;
        let mut candidates = Vec::new();

        for action in board.available_moves() {
            scratch.place(action, computer);
            let score = context.score(&mut scratch, 0, false);
            scratch.clear(action);
            trace!("{} at {} scores {}", computer, action, score);

            if score > best_score {
                best_score = score;
                candidates.clear();
                candidates.push(action);
            } else if score == best_score {
                candidates.push(action);
            }
        }

        let choice = self.tie_break.pick(&candidates);
        debug!(
            "{} searched {} positions: best score {} from {:?}, chose {:?}",
            computer, context.nodes, best_score, candidates, choice
        );
        choice
    }
}

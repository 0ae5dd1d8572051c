use std::fmt;

/// A turn-based game as seen by the console loop.
pub(crate) trait Game: Clone + fmt::Display {
    type Action: fmt::Debug + Copy + PartialEq;
    type Player: PartialEq + fmt::Debug + Copy;

    /// Apply `action` for the player to move and pass the turn.
    fn step(&mut self, action: Self::Action) -> anyhow::Result<()>;

    fn get_available_moves(&self) -> Vec<Self::Action>;

    fn current_player(&self) -> Self::Player;

    fn done(&self) -> bool;

    fn check_winner(&self) -> Option<Self::Player>;
}

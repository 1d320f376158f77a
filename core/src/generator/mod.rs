use crate::*;
pub use job::*;
pub use shuffle::*;

mod job;
mod shuffle;

/// Fixed starting tile, always mine-free on generated boards.
pub const SAFE_ORIGIN: Coord2 = (0, 0);

pub trait BoardGenerator {
    /// Re-initializes `board` to the configured size and lays out a fresh set of
    /// mines with neighbor counts computed.
    fn fill(&mut self, config: &GameConfig, board: &mut Board);
}

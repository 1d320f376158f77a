use thiserror::Error;

use crate::{CellCount, Coord, Coord2};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Board width {0} outside 1..=32")]
    InvalidWidth(Coord),
    #[error("Board height {0} outside 1..=32")]
    InvalidHeight(Coord),
    #[error("Difficulty index {0} outside 0..=2")]
    InvalidDifficulty(u8),
    #[error("Invalid coordinates {0:?}")]
    InvalidCoords(Coord2),
    #[error("Too many mines")]
    TooManyMines,
    #[error("Board size {board:?} does not match configured size {config:?}")]
    BoardShapeMismatch { board: Coord2, config: Coord2 },
    #[error("Cursor {0:?} is outside the board")]
    CursorOutOfBounds(Coord2),
    #[error("Board declares {declared} mines but holds {actual}")]
    MineCountMismatch {
        declared: CellCount,
        actual: CellCount,
    },
    #[error("Tile at {0:?} is both revealed and flagged")]
    RevealedFlagConflict(Coord2),
    #[error("Tile at {0:?} stores a wrong neighbor count")]
    NeighborCountMismatch(Coord2),
    #[error("Mine at {0:?} is revealed while the game is still running")]
    RevealedMineWhilePlaying(Coord2),
    #[error("tiles_left is {actual}, expected {expected}")]
    TilesLeftMismatch {
        expected: CellCount,
        actual: CellCount,
    },
    #[error("flags_left is {actual}, expected {expected}")]
    FlagsLeftMismatch {
        expected: CellCount,
        actual: CellCount,
    },
    #[error("mines_left is {actual}, expected {expected}")]
    MinesLeftMismatch {
        expected: CellCount,
        actual: CellCount,
    },
    #[error("Game is marked as won but the board is not cleared")]
    WonWithoutClearedBoard,
}

pub type Result<T> = core::result::Result<T, GameError>;

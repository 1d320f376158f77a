#![no_std]

extern crate alloc;

pub use board::*;
pub use cell::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use profile::*;
pub use random::*;
pub use solver::{SolveReport, SolveStop};
pub use types::*;

mod board;
mod cell;
mod config;
mod engine;
mod error;
mod generator;
mod profile;
mod random;
pub mod solver;
mod types;

pub const BOARD_MAX_WIDTH: Coord = 32;
pub const BOARD_MAX_HEIGHT: Coord = 32;
pub const BOARD_MAX_TILES: CellCount = mult(BOARD_MAX_WIDTH, BOARD_MAX_HEIGHT);

//! Deduction-only verifier.
//!
//! Starting from [`SAFE_ORIGIN`], the verifier opens the board the way a player
//! would and then repeatedly applies the two single-tile rules to every
//! numbered edge tile:
//!
//! - a clue whose flags already account for all its mines clears the rest of
//!   its hidden neighbors;
//! - a clue with exactly as many hidden neighbors as missing mines flags all of
//!   them.
//!
//! A board is solvable when every mine ends up flagged without guessing.

use alloc::collections::VecDeque;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Why the verifier stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStop {
    /// Every mine was flagged by deduction.
    Solved,
    /// A full pass over the edge tiles made no progress.
    Stuck,
    /// A deduction disagreed with the actual layout.
    Contradiction,
    /// No edge tiles left while mines remain unaccounted for.
    Exhausted,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveReport {
    pub stop: SolveStop,
    pub passes: u32,
    pub revealed: CellCount,
    pub flagged: CellCount,
}

impl SolveReport {
    pub const fn is_solvable(&self) -> bool {
        matches!(self.stop, SolveStop::Solved)
    }
}

/// Checks `board` on a scratch copy; the caller's board is untouched.
pub fn is_solvable(board: &Board) -> bool {
    analyze(board).is_solvable()
}

/// Runs the verifier on a scratch copy of `board` and reports how it went.
pub fn analyze(board: &Board) -> SolveReport {
    let mut scratch = board.clone();
    solve_in_place(&mut scratch)
}

/// Runs the verifier directly on `board`, leaving its reveal and flag marks behind.
pub fn solve_in_place(board: &mut Board) -> SolveReport {
    let report = Verifier::new(board).run();
    log::debug!(
        "verifier stopped with {:?} after {} passes ({} revealed, {} flagged)",
        report.stop,
        report.passes,
        report.revealed,
        report.flagged
    );
    report
}

enum PassOutcome {
    Progress,
    Stuck,
    Solved,
    Contradiction,
}

struct Verifier<'a> {
    board: &'a mut Board,
    edges: VecDeque<Coord2>,
    visited: VisitedSet,
    mines_left: CellCount,
    revealed: CellCount,
    flagged: CellCount,
}

impl<'a> Verifier<'a> {
    fn new(board: &'a mut Board) -> Self {
        let mines_left = board.mine_count();
        Self {
            board,
            edges: VecDeque::new(),
            visited: VisitedSet::new(),
            mines_left,
            revealed: 0,
            flagged: 0,
        }
    }

    fn run(mut self) -> SolveReport {
        if self.board.contains(SAFE_ORIGIN) {
            self.open(SAFE_ORIGIN);
        }

        let mut passes = 0;
        let stop = loop {
            if self.mines_left == 0 {
                break SolveStop::Solved;
            }
            if self.edges.is_empty() {
                break SolveStop::Exhausted;
            }

            passes += 1;
            match self.pass() {
                PassOutcome::Progress => {
                    log::trace!(
                        "pass {}: {} edges queued, {} mines left",
                        passes,
                        self.edges.len(),
                        self.mines_left
                    );
                }
                PassOutcome::Stuck => break SolveStop::Stuck,
                PassOutcome::Solved => break SolveStop::Solved,
                PassOutcome::Contradiction => break SolveStop::Contradiction,
            }
        };

        SolveReport {
            stop,
            passes,
            revealed: self.revealed,
            flagged: self.flagged,
        }
    }

    /// Flood-opens `start`, queueing every numbered tile it uncovers as an edge.
    fn open(&mut self, start: Coord2) {
        let edges = &mut self.edges;
        let revealed = self
            .board
            .reveal_flood_with(start, &mut self.visited, |coords, cell| {
                if cell.neighbor_mines() > 0 {
                    edges.push_back(coords);
                }
            });
        self.revealed += revealed;
    }

    /// Visits each edge queued at the start of the pass exactly once.
    fn pass(&mut self) -> PassOutcome {
        let mut progress = false;

        for _ in 0..self.edges.len() {
            let Some(coords) = self.edges.pop_front() else {
                break;
            };

            let clue = self.board[coords].neighbor_mines();
            if clue == 0 {
                continue;
            }

            let flagged = self.board.count_neighbors(coords, Cell::is_flagged);
            let hidden: SmallVec<[Coord2; 8]> = self
                .board
                .iter_neighbors(coords)
                .filter(|&pos| self.board[pos].is_hidden())
                .collect();

            if flagged > clue {
                return PassOutcome::Contradiction;
            }

            let missing = clue - flagged;
            if missing == 0 {
                for pos in hidden {
                    self.open(pos);
                }
                progress = true;
            } else if hidden.len() == usize::from(missing) {
                for pos in hidden {
                    if !self.board[pos].is_mine() || self.mines_left == 0 {
                        return PassOutcome::Contradiction;
                    }
                    self.board.toggle_flag(pos);
                    self.flagged += 1;
                    self.mines_left -= 1;
                }

                if self.mines_left == 0 {
                    return PassOutcome::Solved;
                }
                progress = true;
            } else if !hidden.is_empty() {
                self.edges.push_back(coords);
            }
        }

        if progress {
            PassOutcome::Progress
        } else {
            PassOutcome::Stuck
        }
    }
}

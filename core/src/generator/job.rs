use serde::{Deserialize, Serialize};

use super::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationStatus {
    /// Nothing in progress, either never started, cancelled or already finished.
    #[default]
    Idle,
    Running,
    /// A candidate passed the gate and is waiting for [`GenerationJob::finish`].
    Ready,
}

impl GenerationStatus {
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Resumable board generation.
///
/// Each [`step`](Self::step) draws a bounded number of candidates so a caller's
/// event loop never blocks on an unlucky solvability gate. Dropping the job
/// cancels it.
#[derive(Clone, Debug)]
pub struct GenerationJob {
    config: GameConfig,
    candidate: Board,
    has_latest_candidate: bool,
    candidate_solvable: bool,
    attempts_total: u32,
    status: GenerationStatus,
}

impl GenerationJob {
    pub fn begin(config: GameConfig) -> Result<Self> {
        config.validate()?;
        log::debug!(
            "Generating {}x{} board with {} mines (solvable: {})",
            config.width,
            config.height,
            config.mine_count(),
            config.ensure_solvable
        );

        Ok(Self {
            config,
            candidate: Board::new(config.size()),
            has_latest_candidate: false,
            candidate_solvable: false,
            attempts_total: 0,
            status: GenerationStatus::Running,
        })
    }

    /// Draws up to `max_attempts` candidates, stopping at the first one accepted.
    pub fn step<G>(&mut self, generator: &mut G, max_attempts: u32) -> GenerationStatus
    where
        G: BoardGenerator + ?Sized,
    {
        if !self.status.is_running() {
            return self.status;
        }

        for _ in 0..max_attempts {
            generator.fill(&self.config, &mut self.candidate);
            self.attempts_total = self.attempts_total.saturating_add(1);
            self.has_latest_candidate = true;
            self.candidate_solvable =
                !self.config.ensure_solvable || crate::solver::is_solvable(&self.candidate);

            if self.candidate_solvable {
                log::debug!("Candidate accepted after {} attempts", self.attempts_total);
                self.status = GenerationStatus::Ready;
                break;
            }
        }

        self.status
    }

    /// Installs the accepted candidate into `state` together with the job's config.
    ///
    /// With `allow_unsolved_fallback` the latest candidate is taken even if it
    /// failed the gate, as long as one was drawn at all. Returns
    /// [`ActionResult::Changed`] when a board was installed, [`ActionResult::Noop`]
    /// otherwise.
    pub fn finish(&mut self, state: &mut GameState, allow_unsolved_fallback: bool) -> ActionResult {
        match self.status {
            GenerationStatus::Ready => {}
            GenerationStatus::Running if allow_unsolved_fallback && self.has_latest_candidate => {
                log::warn!(
                    "Accepting unverified board after {} attempts",
                    self.attempts_total
                );
            }
            _ => return ActionResult::Noop,
        }

        let board = core::mem::replace(&mut self.candidate, Board::new(self.config.size()));
        state.install(self.config, board);
        self.cancel();
        ActionResult::Changed
    }

    /// Abandons the job; attempt statistics are kept.
    pub fn cancel(&mut self) {
        self.status = GenerationStatus::Idle;
        self.has_latest_candidate = false;
        self.candidate_solvable = false;
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn status(&self) -> GenerationStatus {
        self.status
    }

    pub fn attempts_total(&self) -> u32 {
        self.attempts_total
    }

    pub fn has_latest_candidate(&self) -> bool {
        self.has_latest_candidate
    }

    pub fn is_candidate_solvable(&self) -> bool {
        self.candidate_solvable
    }

    /// Most recently drawn candidate, if any.
    pub fn candidate(&self) -> Option<&Board> {
        self.has_latest_candidate.then_some(&self.candidate)
    }
}

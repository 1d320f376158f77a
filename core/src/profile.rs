use core::fmt;
use core::time::Duration;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::*;

/// Column names matching [`ProfileReport`]'s `Display` output.
pub const CSV_HEADER: &str = "total_iter,s_rate,run_time(ms),avs(ms)";

/// Candidates drawn per generation step while profiling.
const PROFILE_BATCH: u32 = 32;

/// Outcome of a batch generation run.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfileReport {
    pub iterations: u32,
    /// Boards the verifier accepted.
    pub successes: u32,
    /// Candidates drawn in total, including ones the solvability gate threw away.
    pub attempts: u64,
    pub elapsed: Duration,
}

impl ProfileReport {
    pub fn success_rate(&self) -> f64 {
        if self.iterations == 0 {
            return 0.0;
        }
        f64::from(self.successes) / f64::from(self.iterations)
    }

    pub fn total_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }

    pub fn average_ms(&self) -> f64 {
        if self.iterations == 0 {
            return 0.0;
        }
        self.total_ms() / f64::from(self.iterations)
    }
}

/// One CSV row, without a trailing newline.
impl fmt::Display for ProfileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{:.5},{:.5},{:.5}",
            self.iterations,
            self.success_rate(),
            self.total_ms(),
            self.average_ms()
        )
    }
}

/// Generates `iterations` boards the way a new game would and runs the
/// verifier on each.
///
/// With `ensure_solvable` set every board goes through the solvability gate
/// first, so the run measures gated generation time. Without it the success
/// rate is the share of raw candidates that can be solved without guessing.
pub fn run_profile<G>(config: &GameConfig, iterations: u32, generator: &mut G) -> Result<ProfileReport>
where
    G: BoardGenerator + ?Sized,
{
    config.validate()?;

    let mut successes = 0;
    let mut attempts = 0;
    let started = Instant::now();

    for _ in 0..iterations {
        let mut job = GenerationJob::begin(*config)?;
        while job.step(generator, PROFILE_BATCH).is_running() {}

        attempts += u64::from(job.attempts_total());
        if job.candidate().is_some_and(solver::is_solvable) {
            successes += 1;
        }
    }

    let report = ProfileReport {
        iterations,
        successes,
        attempts,
        elapsed: started.elapsed(),
    };
    log::debug!(
        "Profiled {}x{} difficulty {}: {}",
        config.width,
        config.height,
        config.difficulty,
        report
    );
    Ok(report)
}

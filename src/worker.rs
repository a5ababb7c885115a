use super::*;

/// Grace period after a vardiff retarget during which shares are still
/// scored against the worker's previous difficulty, so work already in
/// flight on the old target is not rejected.
pub const VARDIFF_GRACE_SECS: u64 = 15;

/// Per-connection state the stratum layer hands in with every submission.
/// The job borrows it per call and never stores it.
#[derive(Clone, Debug)]
pub struct WorkerContext {
    pub extranonce1: Extranonce,
    pub difficulty: f64,
    pub previous_difficulty: Option<f64>,
    /// Unix seconds of the last vardiff retarget, if any.
    pub vardiff_updated_at: Option<u64>,
    pub version_rolling_mask: Option<Version>,
}

impl WorkerContext {
    pub fn new(extranonce1: Extranonce, difficulty: f64) -> Self {
        Self {
            extranonce1,
            difficulty,
            previous_difficulty: None,
            vardiff_updated_at: None,
            version_rolling_mask: None,
        }
    }

    /// The previous difficulty, only while the retarget grace period
    /// lasts.
    pub fn recent_previous_difficulty(&self, now: u64) -> Option<f64> {
        let previous = self.previous_difficulty?;
        let updated_at = self.vardiff_updated_at?;

        (now.saturating_sub(updated_at) <= VARDIFF_GRACE_SECS).then_some(previous)
    }
}

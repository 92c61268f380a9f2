//! Per-track timing corrections
//!
//! Some tracks are known to play back differently from what their script
//! alone suggests. They are listed here by name instead of being detected
//! structurally.

/// A correction applied to a single, named track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingCorrection {
    /// The loop segment plays twice as long after the first loop.
    /// Total and loop-start durations are both extended by one loop segment.
    RepeatLoopSegment,
}

/// Known corrections, keyed by normalized track name
const TIMING_EXCEPTIONS: &[(&str, TimingCorrection)] = &[
    // Route 1 changes its timing once it loops. Cause in the engine is
    // unknown, so this stays limited to this one track.
    ("mus_route1", TimingCorrection::RepeatLoopSegment),
];

/// Look up the timing correction for a track, if any
pub fn timing_correction(name: &str) -> Option<TimingCorrection> {
    TIMING_EXCEPTIONS
        .iter()
        .find(|(track, _)| *track == name)
        .map(|&(_, correction)| correction)
}

impl TimingCorrection {
    /// Apply to `(total, loop_start)` seconds
    pub fn apply(self, total: f64, loop_start: f64) -> (f64, f64) {
        match self {
            TimingCorrection::RepeatLoopSegment => {
                let segment = total - loop_start;
                (total + segment, loop_start + segment)
            }
        }
    }
}

//! Reduction of an analysis pass to per-track metadata

pub mod exceptions;

pub use exceptions::{timing_correction, TimingCorrection};

use crate::diagnostic::Diagnostic;
use crate::report::IndexTable;
use crate::script::Analysis;
use serde::Serialize;
use std::fmt;

/// How track length is reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DurationMode {
    /// Raw tick counts
    #[default]
    Ticks,
    /// Seconds, integrated over tempo changes
    Seconds,
}

/// A track length or position
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Length {
    Ticks(i64),
    Seconds(f64),
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Ticks(ticks) => write!(f, "{}", ticks),
            Length::Seconds(seconds) => write!(f, "{}", seconds),
        }
    }
}

/// Summary of one track
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackMetadata {
    /// External index from the index table
    pub index: Option<i64>,
    /// Normalized track name
    pub name: String,
    /// Last tempo set in the track
    pub tempo: Option<i64>,
    pub length: Length,
    pub looping: bool,
    /// Only set for looping tracks with a loop label
    pub loop_start: Option<Length>,
    pub stereo: bool,
}

/// Metadata plus every anomaly found for the track
#[derive(Debug, Clone)]
pub struct Report {
    pub metadata: TrackMetadata,
    pub diagnostics: Vec<Diagnostic>,
}

/// Turn the raw analysis of a script into its metadata row
pub fn reduce(
    name: &str,
    analysis: Analysis,
    mode: DurationMode,
    indices: Option<&IndexTable>,
) -> Report {
    let Analysis {
        tally,
        stereo,
        mut diagnostics,
    } = analysis;

    let (length, loop_start) = match mode {
        DurationMode::Ticks => {
            let loop_start = tally
                .loop_start
                .filter(|_| tally.looping)
                .map(Length::Ticks);
            (Length::Ticks(tally.ticks), loop_start)
        }
        DurationMode::Seconds => {
            let untimed = tally.buckets.untimed_ticks();
            if untimed > 0 {
                diagnostics.push(Diagnostic::UntimedTicks { ticks: untimed });
            }

            let mut total = tally.buckets.seconds();
            let mut loop_start = tally
                .loop_buckets
                .as_ref()
                .filter(|_| tally.looping)
                .map(|buckets| buckets.seconds());

            if let (Some(correction), Some(start)) = (timing_correction(name), loop_start) {
                let (corrected_total, corrected_start) = correction.apply(total, start);
                total = corrected_total;
                loop_start = Some(corrected_start);
            }

            (Length::Seconds(total), loop_start.map(Length::Seconds))
        }
    };

    let index = indices.and_then(|table| {
        let index = table.get(name);
        if index.is_none() {
            diagnostics.push(Diagnostic::IndexNotFound);
        }
        index
    });

    if tally.ticks == 0 {
        diagnostics.push(Diagnostic::ZeroLength);
    }

    if tally.tempo.is_none() {
        diagnostics.push(Diagnostic::MissingTempo);
    }

    Report {
        metadata: TrackMetadata {
            index,
            name: name.to_string(),
            tempo: tally.tempo,
            length,
            looping: tally.looping,
            loop_start,
            stereo,
        },
        diagnostics,
    }
}

//! Report output (CSV rows or a JSON document)

pub mod index;

pub use index::IndexTable;

use crate::error::Result;
use crate::metadata::{DurationMode, TrackMetadata};
use std::io::Write;

/// Written for any unset numeric field
pub const UNSET: &str = "-1";

/// Column names for the given duration mode
pub fn header(mode: DurationMode) -> [&'static str; 7] {
    let length = match mode {
        DurationMode::Ticks => "Tick Length",
        DurationMode::Seconds => "Duration",
    };
    [
        "Index",
        "Filename",
        "Tempo",
        length,
        "Looping",
        "Loop Start",
        "Stereo",
    ]
}

/// CSV writer, one row per track
pub struct ReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReportWriter<W> {
    /// Create the writer and emit the header row
    pub fn new(output: W, mode: DurationMode) -> Result<Self> {
        let mut writer = csv::Writer::from_writer(output);
        writer.write_record(header(mode))?;
        Ok(Self { writer })
    }

    pub fn write(&mut self, track: &TrackMetadata) -> Result<()> {
        self.writer.write_record(row(track))?;
        Ok(())
    }

    /// Flush remaining rows to the output
    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Render one track as CSV fields
pub fn row(track: &TrackMetadata) -> [String; 7] {
    [
        optional(track.index),
        track.name.clone(),
        optional(track.tempo),
        track.length.to_string(),
        flag(track.looping),
        optional(track.loop_start),
        flag(track.stereo),
    ]
}

/// Serialize all tracks as a JSON array
pub fn write_json<W: Write>(mut output: W, tracks: &[TrackMetadata], pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut output, tracks)?;
    } else {
        serde_json::to_writer(&mut output, tracks)?;
    }
    output.write_all(b"\n")?;
    Ok(())
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| UNSET.to_string(), |v| v.to_string())
}

fn flag(value: bool) -> String {
    let text = if value { "TRUE" } else { "FALSE" };
    text.to_string()
}

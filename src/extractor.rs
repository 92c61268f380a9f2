//! Per-script metadata extraction

use crate::error::Result;
use crate::metadata::{self, DurationMode, Report, TrackMetadata};
use crate::report::IndexTable;
use crate::script::Script;
use crate::source;
use log::{debug, warn};
use std::path::Path;

/// Extracts track metadata from sound scripts
///
/// The index table is read-only and shared by every script processed.
#[derive(Debug, Default)]
pub struct Extractor {
    /// How lengths are reported
    pub mode: DurationMode,
    /// Optional name to index table
    pub indices: Option<IndexTable>,
}

impl Extractor {
    pub fn new(mode: DurationMode) -> Self {
        Self {
            mode,
            indices: None,
        }
    }

    pub fn with_indices(mut self, indices: IndexTable) -> Self {
        self.indices = Some(indices);
        self
    }

    /// Analyze and reduce a single script
    ///
    /// Diagnostics are logged at `warn` level and kept in the report.
    pub fn extract(&self, script: &Script) -> Report {
        let report = metadata::reduce(
            &script.name,
            script.analyze(),
            self.mode,
            self.indices.as_ref(),
        );

        for diagnostic in &report.diagnostics {
            warn!("{}: {}", display_name(script), diagnostic);
        }

        report
    }

    /// Extract every script under `root`
    ///
    /// Nothing is returned unless the whole walk succeeds.
    pub fn extract_dir(&self, root: &Path) -> Result<Vec<TrackMetadata>> {
        let mut tracks = Vec::new();

        for script in source::scripts(root)? {
            let script = script?;
            debug!("Processing {}", script.path.display());
            tracks.push(self.extract(&script).metadata);
        }

        debug!("Processed {} scripts", tracks.len());
        Ok(tracks)
    }
}

fn display_name(script: &Script) -> String {
    if script.path.as_os_str().is_empty() {
        script.name.clone()
    } else {
        script.path.display().to_string()
    }
}

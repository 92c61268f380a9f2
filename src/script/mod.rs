//! Sound script model and analysis passes

pub mod accumulator;
pub mod command;
pub mod pattern;
pub mod stereo;
pub mod tempo;

pub use accumulator::{Accumulator, Tally};
pub use command::Command;
pub use pattern::PatternTable;
pub use tempo::TempoBuckets;

use crate::diagnostic::Diagnostic;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// File extension of sound scripts
pub const SCRIPT_EXTENSION: &str = "s";

/// A loaded sound script
#[derive(Debug, Clone)]
pub struct Script {
    /// Lowercased file stem
    pub name: String,
    /// Where the script was read from (empty for in-memory scripts)
    pub path: PathBuf,
    /// Raw script text
    pub data: Vec<u8>,
}

impl Script {
    pub fn new(name: &str, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: normalize_name(name),
            path: PathBuf::new(),
            data: data.into(),
        }
    }

    /// Read a script from disk, naming it after the file stem
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read '{}': {}", path.display(), e),
            ))
        })?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy())
            .unwrap_or_default();

        Ok(Self {
            name: normalize_name(&stem),
            path: path.to_path_buf(),
            data,
        })
    }

    /// Run both passes over the script
    pub fn analyze(&self) -> Analysis {
        let (tally, diagnostics) = Accumulator::run(command::tokenize(&self.data));
        let stereo = stereo::is_stereo(&self.data);

        Analysis {
            tally,
            stereo,
            diagnostics,
        }
    }
}

/// Raw analysis result, before reduction to metadata
#[derive(Debug, Clone)]
pub struct Analysis {
    pub tally: Tally,
    pub stereo: bool,
    pub diagnostics: Vec<Diagnostic>,
}

/// Track names are matched case-insensitively
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
}

/// Whether a path has the sound script extension
pub fn is_script_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SCRIPT_EXTENSION)
}

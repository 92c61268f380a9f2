//! Stereo detection
//!
//! Runs over the whole file independently of the primary pass, since
//! panning commands can appear after an early `FINE`/`GOTO`.

use super::command::{contains_pan, lines};

/// Whether any line of the script contains a `PAN`/`PAM` command
pub fn is_stereo(data: &[u8]) -> bool {
    lines(data).any(|line| contains_pan(&line))
}

//! Structural anomalies found while analyzing a script
//!
//! None of these stop processing. They are collected per track and logged
//! at `warn` level by the extractor.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A pattern label appeared while another pattern was still open
    NestedPatternLabel { open: String, found: String },
    /// `PEND` without an open pattern label
    PatternEndWithoutLabel,
    /// `PATT` target was not recorded (yet) when the call was reached
    UnresolvedPattern { label: String },
    /// Ticks were counted before the `_1:` start label
    TicksBeforeStart { ticks: i64 },
    /// `GOTO` reached without a preceding `_B1:` loop label
    LoopJumpWithoutMark,
    /// An opcode whose operand could not be read
    MalformedOperand { line: String },
    /// Track length exceeded the tick counter and was capped
    TickOverflow,
    /// Ticks that could not be converted to seconds
    UntimedTicks { ticks: i64 },
    /// No `TEMPO` command before the end of the track
    MissingTempo,
    /// Track has a total length of 0
    ZeroLength,
    /// An index table was supplied but has no entry for this track
    IndexNotFound,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NestedPatternLabel { open, found } => write!(
                f,
                "Found a new label \"{}\", when already processing \"{}\"",
                found, open
            ),
            Diagnostic::PatternEndWithoutLabel => write!(f, "PEND but no label"),
            Diagnostic::UnresolvedPattern { label } => {
                write!(f, "Read in label \"{}\", but it wasn't found", label)
            }
            Diagnostic::TicksBeforeStart { ticks } => {
                write!(f, "{} ticks counted before the start label", ticks)
            }
            Diagnostic::LoopJumpWithoutMark => write!(f, "GOTO found, but no loop label"),
            Diagnostic::MalformedOperand { line } => {
                write!(f, "Could not read operand in \"{}\"", line.trim())
            }
            Diagnostic::TickOverflow => write!(f, "Tick count overflowed and was capped"),
            Diagnostic::UntimedTicks { ticks } => {
                write!(f, "{} ticks have no usable tempo and were not timed", ticks)
            }
            Diagnostic::MissingTempo => write!(f, "Tempo not found"),
            Diagnostic::ZeroLength => write!(f, "Length of 0"),
            Diagnostic::IndexNotFound => write!(f, "Index not found"),
        }
    }
}

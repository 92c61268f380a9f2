//! Line splitting and command classification

use std::borrow::Cow;

// Both whitespace conventions emitted by the song converters are accepted.
const TEMPO_DECIMAL: &str = "\t.byte\tTEMPO , ";
const TEMPO_HEX: &str = "\t.byte TEMPO, 0x";
const BYTE_TAB: &str = "\t.byte\t";
const BYTE_SPACE: &str = "\t.byte ";
const WORD_TAB: &str = "\t .word\t";
const WORD_SPACE: &str = "\t .word ";

/// A classified script line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `TEMPO` with the stored tempo value
    SetTempo(i64),
    /// `Wxx` wait in ticks
    Wait(i64),
    /// Label ending in `_B1:`, the target of `GOTO`
    LoopMark,
    /// Label ending in `_1:`, the track entry point
    StartMark,
    /// Any other label (kept verbatim, including the colon)
    PatternLabel(String),
    /// `PEND` - return from pattern
    PatternEnd,
    /// `PATT` - call pattern, target on the following `.word` line
    PatternCall,
    /// `.word` operand (label without colon)
    AddressWord(String),
    /// Panning command (`PAN`/`PAM`)
    StereoMark,
    /// `FINE` - end of track
    EndTrack,
    /// `GOTO` - loop back
    LoopJump,
    /// Known opcode whose operand could not be read
    Malformed(String),
    /// Anything else
    Other,
}

impl Command {
    /// Classify a single line (without its line terminator)
    pub fn classify(line: &str) -> Command {
        if let Some(operand) = line.strip_prefix(TEMPO_DECIMAL) {
            // Decimal form stores the doubled value
            return match read_leading(operand, 10) {
                Some(value) => Command::SetTempo(value / 2),
                None => Command::Malformed(line.to_string()),
            };
        }

        if let Some(operand) = line.strip_prefix(TEMPO_HEX) {
            return match read_leading(operand, 16) {
                Some(value) => Command::SetTempo(value),
                None => Command::Malformed(line.to_string()),
            };
        }

        if let Some(operand) = byte_operand(line, "W") {
            return match read_leading(operand, 10) {
                Some(value) => Command::Wait(value),
                None => Command::Malformed(line.to_string()),
            };
        }

        if line.ends_with("_B1:") {
            return Command::LoopMark;
        }

        if line.ends_with("_1:") {
            return Command::StartMark;
        }

        if line.ends_with(':') {
            return Command::PatternLabel(line.to_string());
        }

        if byte_operand(line, "PEND").is_some() {
            return Command::PatternEnd;
        }

        if byte_operand(line, "PATT").is_some() {
            return Command::PatternCall;
        }

        if let Some(label) = line
            .strip_prefix(WORD_TAB)
            .or_else(|| line.strip_prefix(WORD_SPACE))
        {
            return Command::AddressWord(label.to_string());
        }

        if contains_pan(line) {
            return Command::StereoMark;
        }

        if byte_operand(line, "FINE").is_some() {
            return Command::EndTrack;
        }

        if byte_operand(line, "GOTO").is_some() {
            return Command::LoopJump;
        }

        Command::Other
    }
}

/// Split raw script bytes on line feeds
///
/// A trailing carriage return is dropped from each line. A final line
/// without a terminator is still produced.
pub fn lines(data: &[u8]) -> impl Iterator<Item = Cow<'_, str>> {
    let data = data.strip_suffix(b"\n").unwrap_or(data);
    data.split(|&b| b == b'\n').filter_map(move |raw| {
        if data.is_empty() {
            return None;
        }
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        Some(String::from_utf8_lossy(raw))
    })
}

/// Tokenize a whole script into commands
pub fn tokenize(data: &[u8]) -> impl Iterator<Item = Command> + '_ {
    lines(data).map(|line| Command::classify(&line))
}

/// Whether the line carries a panning command
pub(crate) fn contains_pan(line: &str) -> bool {
    line.contains("PAN") || line.contains("PAM")
}

/// Text after `.byte <opcode>`, accepting either separator
fn byte_operand<'a>(line: &'a str, opcode: &str) -> Option<&'a str> {
    line.strip_prefix(BYTE_TAB)
        .or_else(|| line.strip_prefix(BYTE_SPACE))
        .and_then(|rest| rest.strip_prefix(opcode))
}

/// Read a leading integer, ignoring anything after the digits
fn read_leading(s: &str, radix: u32) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };

    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_digit(radix))
        .map(|(i, _)| i)
        .unwrap_or(digits.len());

    if end == 0 {
        return None;
    }

    i64::from_str_radix(&digits[..end], radix)
        .ok()
        .map(|value| sign * value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tempo_decimal_is_halved() {
        assert_eq!(
            Command::classify("\t.byte\tTEMPO , 150*mus_route1_tbs/2"),
            Command::SetTempo(75)
        );
    }

    #[test]
    fn test_tempo_hex() {
        assert_eq!(Command::classify("\t.byte TEMPO, 0x4B"), Command::SetTempo(75));
    }

    #[test]
    fn test_wait_both_separators() {
        assert_eq!(Command::classify("\t.byte\tW24"), Command::Wait(24));
        assert_eq!(Command::classify("\t.byte W12"), Command::Wait(12));
    }

    #[test]
    fn test_labels() {
        assert_eq!(Command::classify("mus_test_1_B1:"), Command::LoopMark);
        assert_eq!(Command::classify("mus_test_1:"), Command::StartMark);
        assert_eq!(
            Command::classify("mus_test_1_000:"),
            Command::PatternLabel("mus_test_1_000:".to_string())
        );
    }

    #[test]
    fn test_pattern_commands() {
        assert_eq!(Command::classify("\t.byte\tPEND"), Command::PatternEnd);
        assert_eq!(Command::classify("\t.byte PATT"), Command::PatternCall);
        assert_eq!(
            Command::classify("\t .word\tmus_test_1_000"),
            Command::AddressWord("mus_test_1_000".to_string())
        );
    }

    #[test]
    fn test_track_end_and_loop() {
        assert_eq!(Command::classify("\t.byte\tFINE"), Command::EndTrack);
        assert_eq!(Command::classify("\t.byte GOTO"), Command::LoopJump);
    }

    #[test]
    fn test_pan_anywhere_in_line() {
        assert_eq!(Command::classify("\t.byte\t\tPAN   , c_v+16"), Command::StereoMark);
        assert_eq!(Command::classify("\t.byte\tPAM"), Command::StereoMark);
    }

    #[test]
    fn test_bad_operand() {
        assert!(matches!(Command::classify("\t.byte\tWxx"), Command::Malformed(_)));
    }

    #[test]
    fn test_other() {
        assert_eq!(Command::classify("\t.byte\tKEYSH , mus_test_key+0"), Command::Other);
        assert_eq!(Command::classify(""), Command::Other);
    }

    #[test]
    fn test_lines_crlf_and_unterminated() {
        let collected: Vec<_> = lines(b"a\r\nb\nc").collect();
        assert_eq!(collected, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_lines_empty_input() {
        assert_eq!(lines(b"").count(), 0);
        assert_eq!(lines(b"\n").count(), 0);
    }
}

//! Single forward pass over a track's commands
//!
//! Tracks tempo, total ticks (flat and per tempo), the loop point and
//! PATT/PEND pattern calls. The pass stops at the first `FINE` or `GOTO`.

use super::command::Command;
use super::pattern::PatternTable;
use super::tempo::TempoBuckets;
use crate::diagnostic::Diagnostic;

/// Result of the primary pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tally {
    /// Last tempo seen
    pub tempo: Option<i64>,
    /// Total ticks up to the terminating command
    pub ticks: i64,
    /// Ticks at the `_B1:` loop label
    pub loop_start: Option<i64>,
    /// Terminated by `GOTO`
    pub looping: bool,
    /// Total ticks split by tempo
    pub buckets: TempoBuckets,
    /// Snapshot of `buckets` taken at the loop label
    pub loop_buckets: Option<TempoBuckets>,
}

/// Pattern recording state
#[derive(Debug, Clone, PartialEq, Eq)]
enum PatternState {
    Idle,
    Recording { label: String, ticks: i64 },
}

/// The accumulator state machine
pub struct Accumulator {
    tally: Tally,
    patterns: PatternTable,
    state: PatternState,
    awaiting_call_address: bool,
    finished: bool,
    overflowed: bool,
    diagnostics: Vec<Diagnostic>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self {
            tally: Tally::default(),
            patterns: PatternTable::new(),
            state: PatternState::Idle,
            awaiting_call_address: false,
            finished: false,
            overflowed: false,
            diagnostics: Vec::new(),
        }
    }

    /// Run the pass over a command stream
    pub fn run<I>(commands: I) -> (Tally, Vec<Diagnostic>)
    where
        I: IntoIterator<Item = Command>,
    {
        let mut acc = Self::new();
        for command in commands {
            if !acc.feed(command) {
                break;
            }
        }
        acc.finish()
    }

    /// Whether a terminating command has been seen
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Process one command; returns `false` once the track has ended
    pub fn feed(&mut self, command: Command) -> bool {
        if self.finished {
            return false;
        }

        match command {
            Command::SetTempo(tempo) => {
                self.tally.tempo = Some(tempo);
            }
            Command::Wait(ticks) => {
                self.add_ticks(ticks);
            }
            Command::LoopMark => {
                self.tally.loop_start = Some(self.tally.ticks);
                self.tally.loop_buckets = Some(self.tally.buckets.clone());
            }
            Command::StartMark => {
                if self.tally.ticks > 0 {
                    self.diagnostics.push(Diagnostic::TicksBeforeStart {
                        ticks: self.tally.ticks,
                    });
                }
            }
            Command::PatternLabel(label) => {
                if let PatternState::Recording { label: open, .. } = &self.state {
                    self.diagnostics.push(Diagnostic::NestedPatternLabel {
                        open: open.clone(),
                        found: label.clone(),
                    });
                }
                self.state = PatternState::Recording { label, ticks: 0 };
            }
            Command::PatternEnd => {
                match std::mem::replace(&mut self.state, PatternState::Idle) {
                    PatternState::Recording { label, ticks } => {
                        self.patterns.record_length(label, ticks);
                    }
                    PatternState::Idle => {
                        self.diagnostics.push(Diagnostic::PatternEndWithoutLabel);
                    }
                }
            }
            Command::PatternCall => {
                self.awaiting_call_address = true;
            }
            Command::AddressWord(target) => {
                if self.awaiting_call_address {
                    self.awaiting_call_address = false;
                    self.resolve_call(target);
                }
            }
            Command::EndTrack => {
                self.tally.looping = false;
                self.finished = true;
            }
            Command::LoopJump => {
                self.tally.looping = true;
                self.finished = true;
                if self.tally.loop_start.is_none() {
                    self.diagnostics.push(Diagnostic::LoopJumpWithoutMark);
                }
            }
            Command::Malformed(line) => {
                self.diagnostics.push(Diagnostic::MalformedOperand { line });
            }
            Command::StereoMark | Command::Other => {}
        }

        !self.finished
    }

    pub fn finish(self) -> (Tally, Vec<Diagnostic>) {
        (self.tally, self.diagnostics)
    }

    fn resolve_call(&mut self, target: String) {
        let mut label = target;
        label.push(':');

        match self.patterns.lookup(&label) {
            Some(length) => self.add_ticks(length),
            None => self.diagnostics.push(Diagnostic::UnresolvedPattern { label }),
        }
    }

    fn add_ticks(&mut self, ticks: i64) {
        if self.tally.ticks.checked_add(ticks).is_none() && !self.overflowed {
            self.overflowed = true;
            self.diagnostics.push(Diagnostic::TickOverflow);
        }
        // Totals saturate instead of wrapping
        self.tally.ticks = self.tally.ticks.saturating_add(ticks);
        self.tally.buckets.add(self.tally.tempo, ticks);

        if let PatternState::Recording { ticks: local, .. } = &mut self.state {
            *local = local.saturating_add(ticks);
        }
    }
}

impl Default for Accumulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Command::*;

    fn label(s: &str) -> Command {
        PatternLabel(s.to_string())
    }

    fn word(s: &str) -> Command {
        AddressWord(s.to_string())
    }

    #[test]
    fn test_plain_waits() {
        let (tally, diags) = Accumulator::run(vec![
            SetTempo(60),
            StartMark,
            Wait(24),
            Wait(12),
            EndTrack,
            Wait(96),
        ]);
        assert_eq!(tally.ticks, 36);
        assert_eq!(tally.tempo, Some(60));
        assert!(!tally.looping);
        assert_eq!(tally.loop_start, None);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_loop_scenario() {
        let (tally, _) = Accumulator::run(vec![
            SetTempo(75),
            Wait(10),
            Wait(10),
            Wait(10),
            LoopMark,
            Wait(10),
            Wait(10),
            LoopJump,
        ]);
        assert_eq!(tally.ticks, 50);
        assert_eq!(tally.loop_start, Some(30));
        assert!(tally.looping);
        assert_eq!(tally.loop_buckets.unwrap().ticks_at(75), 30);
        assert_eq!(tally.buckets.ticks_at(75), 50);
    }

    #[test]
    fn test_pattern_called_twice() {
        let (tally, diags) = Accumulator::run(vec![
            label("mus_a_1_000:"),
            Wait(8),
            Wait(12),
            PatternEnd,
            PatternCall,
            word("mus_a_1_000"),
            PatternCall,
            word("mus_a_1_000"),
            EndTrack,
        ]);
        // 20 while recording the body, then 2 x 20 from the calls
        assert_eq!(tally.ticks, 60);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_call_inside_pattern_counts_towards_its_length() {
        let (tally, _) = Accumulator::run(vec![
            label("mus_a_1_000:"),
            Wait(10),
            PatternEnd,
            label("mus_a_1_001:"),
            PatternCall,
            word("mus_a_1_000"),
            Wait(5),
            PatternEnd,
            PatternCall,
            word("mus_a_1_001"),
            EndTrack,
        ]);
        // 10 + (10 + 5) + 15
        assert_eq!(tally.ticks, 40);
    }

    #[test]
    fn test_forward_reference_is_not_resolved() {
        let (tally, diags) = Accumulator::run(vec![
            PatternCall,
            word("mus_a_1_000"),
            label("mus_a_1_000:"),
            Wait(20),
            PatternEnd,
            EndTrack,
        ]);
        assert_eq!(tally.ticks, 20);
        assert_eq!(
            diags,
            vec![Diagnostic::UnresolvedPattern {
                label: "mus_a_1_000:".to_string()
            }]
        );
    }

    #[test]
    fn test_nested_label_replaces_open_pattern() {
        let (tally, diags) = Accumulator::run(vec![
            label("mus_a_1_000:"),
            Wait(4),
            label("mus_a_1_001:"),
            Wait(6),
            PatternEnd,
            PatternCall,
            word("mus_a_1_001"),
            PatternCall,
            word("mus_a_1_000"),
            EndTrack,
        ]);
        assert_eq!(tally.ticks, 16);
        assert_eq!(diags.len(), 2);
        assert!(matches!(diags[0], Diagnostic::NestedPatternLabel { .. }));
        assert!(matches!(diags[1], Diagnostic::UnresolvedPattern { .. }));
    }

    #[test]
    fn test_address_word_without_call_is_ignored() {
        let (tally, diags) = Accumulator::run(vec![
            label("mus_a_1_000:"),
            Wait(4),
            PatternEnd,
            word("mus_a_1_000"),
            EndTrack,
        ]);
        assert_eq!(tally.ticks, 4);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_goto_without_loop_mark() {
        let (tally, diags) = Accumulator::run(vec![Wait(4), LoopJump]);
        assert!(tally.looping);
        assert_eq!(tally.loop_start, None);
        assert_eq!(diags, vec![Diagnostic::LoopJumpWithoutMark]);
    }

    #[test]
    fn test_ticks_before_start_label() {
        let (_, diags) = Accumulator::run(vec![Wait(4), StartMark, EndTrack]);
        assert_eq!(diags, vec![Diagnostic::TicksBeforeStart { ticks: 4 }]);
    }

    #[test]
    fn test_pend_without_label() {
        let (_, diags) = Accumulator::run(vec![PatternEnd, EndTrack]);
        assert_eq!(diags, vec![Diagnostic::PatternEndWithoutLabel]);
    }

    #[test]
    fn test_tempo_change_splits_buckets() {
        let (tally, _) = Accumulator::run(vec![
            SetTempo(120),
            Wait(48),
            SetTempo(60),
            Wait(24),
            LoopJump,
        ]);
        assert_eq!(tally.tempo, Some(60));
        assert_eq!(tally.buckets.ticks_at(120), 48);
        assert_eq!(tally.buckets.ticks_at(60), 24);
    }

    #[test]
    fn test_nested_doubling_saturates() {
        let mut commands = vec![SetTempo(75), label("mus_a_1_000:"), Wait(96), PatternEnd];
        for n in 1..64 {
            commands.push(label(&format!("mus_a_1_{:03}:", n)));
            for _ in 0..2 {
                commands.push(PatternCall);
                commands.push(word(&format!("mus_a_1_{:03}", n - 1)));
            }
            commands.push(PatternEnd);
        }
        commands.push(PatternCall);
        commands.push(word("mus_a_1_063"));
        commands.push(EndTrack);

        let (tally, diags) = Accumulator::run(commands);
        assert_eq!(tally.ticks, i64::MAX);
        assert_eq!(tally.buckets.ticks_at(75), i64::MAX);
        assert_eq!(diags, vec![Diagnostic::TickOverflow]);
    }

    #[test]
    fn test_feed_stops_after_end() {
        let mut acc = Accumulator::new();
        assert!(acc.feed(Wait(3)));
        assert!(!acc.feed(EndTrack));
        assert!(acc.is_finished());
        assert!(!acc.feed(Wait(3)));
        let (tally, _) = acc.finish();
        assert_eq!(tally.ticks, 3);
    }
}

//! Pattern (PATT/PEND) length bookkeeping

use std::collections::HashMap;

/// Tick length of each recorded pattern, keyed by its label as written
/// (including the trailing colon)
#[derive(Debug, Default)]
pub struct PatternTable {
    lengths: HashMap<String, i64>,
}

impl PatternTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the length of a pattern
    pub fn record_length(&mut self, label: impl Into<String>, ticks: i64) {
        self.lengths.insert(label.into(), ticks);
    }

    pub fn lookup(&self, label: &str) -> Option<i64> {
        self.lengths.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overwrite() {
        let mut table = PatternTable::new();
        table.record_length("mus_a_1_000:", 20);
        table.record_length("mus_a_1_000:", 12);
        assert_eq!(table.lookup("mus_a_1_000:"), Some(12));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let mut table = PatternTable::new();
        table.record_length("mus_a_1_000:", 20);
        assert_eq!(table.lookup("MUS_A_1_000:"), None);
        assert_eq!(table.lookup("mus_a_1_000"), None);
    }
}

//! Track name to index lookup table

use crate::error::{Error, Result};
use crate::script::normalize_name;
use log::warn;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// Case-insensitive name to index mapping, read from a `Name,Index` table
#[derive(Debug, Clone, Default)]
pub struct IndexTable {
    indices: HashMap<String, i64>,
}

impl IndexTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the table from a file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::MissingPath(path.to_path_buf()));
        }
        if !path.is_file() {
            return Err(Error::NotAFile(path.to_path_buf()));
        }

        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Parse the table; the first row is a header and is skipped
    pub fn from_reader<R: Read>(input: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(input);

        let mut table = Self::new();
        // Names are not required to be valid UTF-8
        for record in reader.byte_records() {
            let record = record?;
            let name = String::from_utf8_lossy(record.get(0).unwrap_or(b""));
            let value = String::from_utf8_lossy(record.get(1).unwrap_or(b""));

            match parse_index(&value) {
                Some(index) if !name.is_empty() => table.insert(&name, index),
                _ => warn!("Skipping malformed index row: {:?}", record),
            }
        }

        Ok(table)
    }

    pub fn insert(&mut self, name: &str, index: i64) {
        self.indices.insert(normalize_name(name), index);
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.indices.get(&normalize_name(name)).copied()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Leading integer of a field ("12", "-3", "7 (unused)")
fn parse_index(field: &str) -> Option<i64> {
    let end = field
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(field.len());
    field[..end].parse().ok()
}

//! Tag name shortcuts
//!
//! Maps short aliases usable in the terse form to canonical XML element names
//! and back. The short → full map is the primary store; full → short is its
//! inverse, built once when the table is constructed.

use crate::error::TableError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static SHORTCUT_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z][A-Za-z0-9_]*):([A-Za-z][A-Za-z0-9_]*)$").unwrap());

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameShortcutTable {
    short_to_full: HashMap<String, String>,
    full_to_short: HashMap<String, String>,
}

impl NameShortcutTable {
    /// Build a table from a short → full map.
    pub fn new(short_to_full: HashMap<String, String>) -> Self {
        let full_to_short = short_to_full
            .iter()
            .map(|(short, full)| (full.clone(), short.clone()))
            .collect();
        Self {
            short_to_full,
            full_to_short,
        }
    }

    /// Build a table from `(full, short)` pairs.
    pub fn from_pairs<I, F, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (F, S)>,
        F: Into<String>,
        S: Into<String>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(full, short)| (short.into(), full.into()))
                .collect(),
        )
    }

    /// Parse a shortcut file: one `full:short` pair per line.
    ///
    /// Blank lines and `//` comment lines are skipped. A short or full name that
    /// appears twice breaks the one-to-one mapping and is rejected.
    pub fn parse(text: &str) -> Result<Self, TableError> {
        let mut short_to_full = HashMap::new();
        let mut seen_full: HashMap<String, usize> = HashMap::new();

        for (index, raw_line) in text.lines().enumerate() {
            let line_number = index + 1;
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with("//") {
                continue;
            }

            let captures = SHORTCUT_LINE
                .captures(line)
                .ok_or_else(|| TableError::MalformedLine {
                    line: line_number,
                    text: line.to_string(),
                })?;
            let full = captures[1].to_string();
            let short = captures[2].to_string();

            if short_to_full.contains_key(&short) {
                return Err(TableError::DuplicateShortcut {
                    line: line_number,
                    name: short,
                });
            }
            if seen_full.insert(full.clone(), line_number).is_some() {
                return Err(TableError::DuplicateShortcut {
                    line: line_number,
                    name: full,
                });
            }
            short_to_full.insert(short, full);
        }

        Ok(Self::new(short_to_full))
    }

    /// Canonical name for `short`, if it is a registered alias.
    pub fn to_full(&self, short: &str) -> Option<&str> {
        self.short_to_full.get(short).map(String::as_str)
    }

    /// Registered alias for `full`, if any.
    pub fn to_short(&self, full: &str) -> Option<&str> {
        self.full_to_short.get(full).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.short_to_full.len()
    }

    pub fn is_empty(&self) -> bool {
        self.short_to_full.is_empty()
    }
}

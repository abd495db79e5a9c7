//! Anonymous attribute rules
//!
//! For each canonical tag, the ordered list of attribute names that may be given
//! positionally in the terse form.

use crate::error::TableError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static RULE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9_]*):([A-Za-z][A-Za-z0-9_]*(?:,[A-Za-z][A-Za-z0-9_]*)*)$")
        .unwrap()
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnonAttributeTable {
    rules: HashMap<String, Vec<String>>,
}

impl AnonAttributeTable {
    pub fn new(rules: HashMap<String, Vec<String>>) -> Self {
        Self { rules }
    }

    /// Build a table from `(tag, names)` rules.
    pub fn from_rules<I, T, N, S>(rules: I) -> Self
    where
        I: IntoIterator<Item = (T, N)>,
        T: Into<String>,
        N: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            rules
                .into_iter()
                .map(|(tag, names)| (tag.into(), names.into_iter().map(Into::into).collect()))
                .collect(),
        )
    }

    /// Parse a rule file: one `tag:name1,name2,...` rule per line.
    ///
    /// Blank lines and `//` comment lines are skipped. A name listed twice for
    /// the same tag is rejected; a later rule for a tag replaces an earlier one.
    pub fn parse(text: &str) -> Result<Self, TableError> {
        let mut rules = HashMap::new();

        for (index, raw_line) in text.lines().enumerate() {
            let line_number = index + 1;
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with("//") {
                continue;
            }

            let captures = RULE_LINE
                .captures(line)
                .ok_or_else(|| TableError::MalformedLine {
                    line: line_number,
                    text: line.to_string(),
                })?;
            let tag = captures[1].to_string();

            let mut names: Vec<String> = Vec::new();
            for name in captures[2].split(',') {
                if names.iter().any(|existing| existing == name) {
                    return Err(TableError::DuplicateImpliedName {
                        line: line_number,
                        tag,
                        name: name.to_string(),
                    });
                }
                names.push(name.to_string());
            }

            rules.insert(tag, names);
        }

        Ok(Self::new(rules))
    }

    /// The positional name list for `tag`, or `None` when the tag has no rule.
    pub fn implied_names(&self, tag: &str) -> Option<&[String]> {
        self.rules.get(tag).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

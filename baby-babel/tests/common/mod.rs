//! Shared helpers for the integration tests.

use baby_babel::tables::{AnonAttributeTable, NameShortcutTable, Tables};

pub fn fixture(name: &str) -> String {
    let path = format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("fixture {path} should exist: {e}"))
}

/// The tables loaded from the fixture table files.
pub fn fixture_tables() -> Tables {
    let names = NameShortcutTable::parse(&fixture("tagNameShortcuts.txt"))
        .expect("shortcut fixture should parse");
    let implied = AnonAttributeTable::parse(&fixture("anonAttributes.txt"))
        .expect("anonymous attribute fixture should parse");
    Tables::new(names, implied)
}

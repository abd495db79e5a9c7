//! Lookup tables shared read-only by both converters.

mod implied;
mod shortcuts;

pub use implied::AnonAttributeTable;
pub use shortcuts::NameShortcutTable;

/// Both tables, as one conversion run consumes them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tables {
    pub names: NameShortcutTable,
    pub implied: AnonAttributeTable,
}

impl Tables {
    pub fn new(names: NameShortcutTable, implied: AnonAttributeTable) -> Self {
        Self { names, implied }
    }
}

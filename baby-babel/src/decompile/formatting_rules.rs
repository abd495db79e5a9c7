use serde::{Deserialize, Serialize};

/// Layout settings for decompiled BabyScript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecompileRules {
    /// String repeated once per nesting level (usually 4 spaces)
    pub indent_string: String,

    /// Whether runs of blank lines between XML elements are kept
    pub preserve_blank_lines: bool,
}

impl Default for DecompileRules {
    fn default() -> Self {
        Self {
            indent_string: "    ".to_string(),
            preserve_blank_lines: true,
        }
    }
}

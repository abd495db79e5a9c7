//! Conversion registry
//!
//! Conversions are registered and retrieved by name, or detected from an input
//! file's extension.

use crate::conversion::Conversion;
use crate::error::ConvertError;
use std::collections::HashMap;

pub struct ConversionRegistry {
    conversions: HashMap<String, Box<dyn Conversion>>,
}

impl ConversionRegistry {
    pub fn new() -> Self {
        ConversionRegistry {
            conversions: HashMap::new(),
        }
    }

    /// Register a conversion, replacing any existing one with the same name.
    pub fn register<C: Conversion + 'static>(&mut self, conversion: C) {
        self.conversions
            .insert(conversion.name().to_string(), Box::new(conversion));
    }

    pub fn get(&self, name: &str) -> Result<&dyn Conversion, ConvertError> {
        self.conversions
            .get(name)
            .map(|c| c.as_ref())
            .ok_or_else(|| ConvertError::ConversionNotFound(name.to_string()))
    }

    /// All registered conversion names (sorted)
    pub fn list_conversions(&self) -> Vec<String> {
        let mut names: Vec<_> = self.conversions.keys().cloned().collect();
        names.sort();
        names
    }

    /// Name of the conversion that claims `filename`'s extension, if any.
    ///
    /// Extensions compare case-insensitively.
    pub fn detect_from_filename(&self, filename: &str) -> Option<String> {
        let extension = std::path::Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())?
            .to_ascii_lowercase();

        self.conversions
            .values()
            .find(|conversion| conversion.source_extensions().contains(&extension.as_str()))
            .map(|conversion| conversion.name().to_string())
    }

    /// Registry with `compile` and `decompile` using their default rules.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(crate::compile::Compile::default());
        registry.register(crate::decompile::Decompile::default());
        registry
    }
}

impl Default for ConversionRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

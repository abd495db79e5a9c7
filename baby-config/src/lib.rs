//! Shared configuration loader for the BabyScript tools.
//!
//! `defaults/babyscript.default.toml` is embedded into every binary so that docs
//! and runtime behavior stay in sync. Applications layer user-specific files on
//! top of those defaults via [`Loader`] before deserializing into [`BabyConfig`].

use baby_babel::error::TableError;
use baby_babel::tables::{AnonAttributeTable, NameShortcutTable, Tables};
use baby_babel::{CompileRules, DecompileRules};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_TOML: &str = include_str!("../defaults/babyscript.default.toml");

/// Top-level configuration consumed by BabyScript applications.
#[derive(Debug, Clone, Deserialize)]
pub struct BabyConfig {
    pub tables: TablesConfig,
    pub compile: CompileConfig,
    pub decompile: DecompileConfig,
}

/// Where the two table files live.
#[derive(Debug, Clone, Deserialize)]
pub struct TablesConfig {
    pub name_shortcuts: PathBuf,
    pub anon_attributes: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompileConfig {
    pub indent_size: usize,
    pub xml_declaration: bool,
}

impl From<&CompileConfig> for CompileRules {
    fn from(config: &CompileConfig) -> Self {
        CompileRules {
            indent_size: config.indent_size,
            xml_declaration: config.xml_declaration,
        }
    }
}

/// Mirrors the knobs exposed by the decompiler.
#[derive(Debug, Clone, Deserialize)]
pub struct DecompileConfig {
    pub indent_string: String,
    pub preserve_blank_lines: bool,
}

impl From<&DecompileConfig> for DecompileRules {
    fn from(config: &DecompileConfig) -> Self {
        DecompileRules {
            indent_string: config.indent_string.clone(),
            preserve_blank_lines: config.preserve_blank_lines,
        }
    }
}

/// Errors raised while building the configuration or reading the tables.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to open {kind} config {}: {source}", .path.display())]
    Io {
        kind: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to process {kind} config {}: {source}", .path.display())]
    Table {
        kind: &'static str,
        path: PathBuf,
        source: TableError,
    },
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<BabyConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<BabyConfig, ConfigError> {
    Loader::new().build()
}

/// Read and parse both table files.
pub fn load_tables(config: &TablesConfig) -> Result<Tables, LoadError> {
    let implied = read_table(
        "anonymous attribute",
        &config.anon_attributes,
        AnonAttributeTable::parse,
    )?;
    let names = read_table(
        "name shortcut",
        &config.name_shortcuts,
        NameShortcutTable::parse,
    )?;
    Ok(Tables::new(names, implied))
}

fn read_table<T>(
    kind: &'static str,
    path: &Path,
    parse: impl FnOnce(&str) -> Result<T, TableError>,
) -> Result<T, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        kind,
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text).map_err(|source| LoadError::Table {
        kind,
        path: path.to_path_buf(),
        source,
    })
}

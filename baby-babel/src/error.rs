//! Error types for conversion and table loading

use thiserror::Error;

/// Errors that can end a conversion.
///
/// Semantic and syntax failures have already been reported to the diagnostic
/// sink with their locations by the time one of these is returned; the error
/// itself only carries the file-level summary.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// No conversion registered under this name
    #[error("Conversion '{0}' not found")]
    ConversionNotFound(String),
    /// The terse source had syntax errors, so nothing was compiled
    #[error("{file}: Aborting write due to syntax error(s) ({count} found)")]
    SyntaxErrors { file: String, count: usize },
    /// Compilation hit a fatal semantic error and stopped emitting XML
    #[error("{file}: Aborting write due to semantic error(s)")]
    SemanticErrors { file: String },
    /// The XML reader or writer failed
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Output bytes were not valid UTF-8
    #[error("Output is not valid UTF-8")]
    InvalidUtf8,
}

/// Errors raised while reading a table file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("invalid formatting on line {line}: {text}")]
    MalformedLine { line: usize, text: String },
    #[error("line {line}: tag {tag} defines duplicate name {name}")]
    DuplicateImpliedName {
        line: usize,
        tag: String,
        name: String,
    },
    #[error("line {line}: {name} already has a shortcut mapping")]
    DuplicateShortcut { line: usize, name: String },
}

//! BabyScript ⇄ XML conversion
//!
//!     BabyScript is a terse notation for XML-based scripts. This crate converts both ways:
//!     compile (BabyScript → XML) and decompile (XML → BabyScript), driven by two lookup
//!     tables that the caller loads once and shares read-only.
//!
//!     This is a pure lib: it never prints, never exits and never reads files. Everything a
//!     conversion has to say goes to a DiagnosticSink; the outcome is a Result.
//!
//!     The file structure :
//!     .
//!     ├── conversion.rs           # Conversion trait definition
//!     ├── registry.rs             # ConversionRegistry, lookup by name or extension
//!     ├── diagnostics.rs          # Diagnostic, DiagnosticSink
//!     ├── error.rs
//!     ├── model.rs                # Element tree produced by the parser
//!     ├── tables                  # NameShortcutTable, AnonAttributeTable
//!     ├── syntax                  # logos lexer, parser, expression validator
//!     ├── compile                 # forward converter + XmlSink on quick-xml
//!     └── decompile               # reverse converter + XmlSource on quick-xml
//!
//! Tables
//!
//!     NameShortcutTable maps short aliases to canonical tag names and back; it is a bijection.
//!     AnonAttributeTable lists, per canonical tag, the attribute names that may be written
//!     positionally, in order. Both parse from simple line-based text files.
//!
//! Core Algorithms
//!
//!     Compile walks the parsed tree. Each anonymous attribute takes the next unused name from
//!     the tag's rule; running out of names, or having no rule at all, is a fatal semantic
//!     error that stops all further output.
//!
//!     Decompile marks attributes positional by walking the tag's rule in order and stopping at
//!     the first name the element does not have. Positional attributes are written first, in
//!     rule order, then the named ones in document order. The two algorithms are not mirror
//!     images; a round trip preserves attribute values, not formatting.
//!
//! Testing
//!     tests
//!     ├── lib.rs
//!     ├── common              # fixture loading
//!     ├── fixtures            # table files, intro.baby, intro.xml
//!     ├── compile
//!     ├── decompile
//!     └── round_trip
//!
pub mod compile;
pub mod conversion;
pub mod decompile;
pub mod diagnostics;
pub mod error;
pub mod model;
pub mod registry;
pub mod syntax;
pub mod tables;

pub use compile::{Compile, CompileRules};
pub use conversion::Conversion;
pub use decompile::{Decompile, DecompileRules};
pub use diagnostics::{Diagnostic, DiagnosticSink, Severity};
pub use error::{ConvertError, TableError};
pub use registry::ConversionRegistry;
pub use tables::{AnonAttributeTable, NameShortcutTable, Tables};

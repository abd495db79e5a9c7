//! Conversion trait definition
//!
//! Both directions implement [`Conversion`], so callers can pick one by name or
//! by input file extension and run it without knowing which way it goes.

use crate::diagnostics::DiagnosticSink;
use crate::error::ConvertError;
use crate::tables::Tables;

/// One direction of the BabyScript ⇄ XML conversion.
///
/// Implementations hold only immutable settings; all scratch state lives in
/// the per-call converter, so one value can serve concurrent calls.
///
/// # Examples
///
/// ```ignore
/// let tables = Tables::default();
/// let mut diagnostics = Vec::new();
/// let xml = Compile::default().convert("level.baby", "door;", &tables, &mut diagnostics)?;
/// ```
pub trait Conversion: Send + Sync {
    /// Name used to select this conversion ("compile", "decompile")
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// Input file extensions this conversion claims, without the leading dot.
    fn source_extensions(&self) -> &[&str] {
        &[]
    }

    /// Extension of the files this conversion produces.
    fn target_extension(&self) -> &str;

    /// Convert `source`, read from `file_name`, reporting located problems to
    /// `diagnostics`.
    ///
    /// Returns the converted text, or the file-level error that stopped it.
    fn convert(
        &self,
        file_name: &str,
        source: &str,
        tables: &Tables,
        diagnostics: &mut dyn DiagnosticSink,
    ) -> Result<String, ConvertError>;
}

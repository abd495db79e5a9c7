//! Compile: BabyScript → XML
//!
//! The forward converter walks a parsed [`Document`](crate::model::Document)
//! depth first and drives an [`XmlSink`]. Short tag names are expanded through
//! the name table and anonymous attributes take their names, in order, from the
//! element's implied-name rule.
//!
//! The first semantic error is reported at the element where it happened and
//! makes the rest of the walk a no-op; the caller gets
//! [`ConvertError::SemanticErrors`] and should not trust whatever was written.

mod sink;

pub use sink::{XmlSink, XmlWriterSink};

use crate::conversion::Conversion;
use crate::diagnostics::{Diagnostic, DiagnosticSink, Severity};
use crate::error::ConvertError;
use crate::model::{Element, Node, ParseResult};
use crate::syntax;
use crate::tables::Tables;
use std::collections::VecDeque;
use tracing::debug;

/// Output settings for compiled XML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRules {
    /// Spaces per nesting level; zero writes the document on one line
    pub indent_size: usize,
    pub xml_declaration: bool,
}

impl Default for CompileRules {
    fn default() -> Self {
        Self {
            indent_size: 2,
            xml_declaration: true,
        }
    }
}

/// Remove one layer of wrapping double quotes.
///
/// Only a value at least two characters long whose first and last characters
/// are both `"` is unwrapped: `"` stays `"`, `""` becomes empty.
pub fn strip_literal_quotes(value: &str) -> &str {
    if value.len() > 1 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Convert a parsed document into XML events on `sink`.
///
/// Refuses to start when `parsed` carries syntax errors.
pub fn compile_document<S, D>(
    file_name: &str,
    parsed: &ParseResult,
    tables: &Tables,
    sink: &mut S,
    diagnostics: &mut D,
) -> Result<(), ConvertError>
where
    S: XmlSink + ?Sized,
    D: DiagnosticSink + ?Sized,
{
    if !parsed.is_ok() {
        return Err(ConvertError::SyntaxErrors {
            file: file_name.to_string(),
            count: parsed.error_count(),
        });
    }

    let mut converter = ForwardConverter {
        file_name,
        tables,
        sink: &mut *sink,
        diagnostics,
        failed: false,
    };
    for node in &parsed.document.children {
        converter.visit(node)?;
    }

    if converter.failed {
        return Err(ConvertError::SemanticErrors {
            file: file_name.to_string(),
        });
    }
    sink.flush()
}

struct ForwardConverter<'a, S: ?Sized, D: ?Sized> {
    file_name: &'a str,
    tables: &'a Tables,
    sink: &'a mut S,
    diagnostics: &'a mut D,
    /// Sticky: once set, nothing more is written.
    failed: bool,
}

impl<S, D> ForwardConverter<'_, S, D>
where
    S: XmlSink + ?Sized,
    D: DiagnosticSink + ?Sized,
{
    fn visit(&mut self, node: &Node) -> Result<(), ConvertError> {
        if self.failed {
            return Ok(());
        }
        match node {
            Node::Comment(comment) => self.sink.comment(&comment.text),
            Node::Element(element) => self.visit_element(element),
        }
    }

    fn visit_element(&mut self, element: &Element) -> Result<(), ConvertError> {
        let tables = self.tables;
        let name = tables.names.to_full(&element.tag).unwrap_or(&element.tag);
        self.sink.start_element(name)?;

        if element.is_assignment {
            for attribute in &element.attributes {
                if let Some(attribute_name) = &attribute.name {
                    self.sink.attribute(attribute_name, &attribute.value)?;
                }
            }
        } else {
            let rule = tables.implied.implied_names(name);
            let mut available: VecDeque<&str> =
                rule.into_iter().flatten().map(String::as_str).collect();
            let mut emitted: Vec<&str> = Vec::with_capacity(element.attributes.len());

            for attribute in &element.attributes {
                let attribute_name = match (&attribute.name, rule) {
                    (Some(explicit), _) => explicit.as_str(),
                    (None, None) => {
                        self.fail(
                            element,
                            "has an anonymous attribute but the config has no rule for it",
                        );
                        return Ok(());
                    }
                    (None, Some(_)) => match available.pop_front() {
                        Some(implied) => implied,
                        None => {
                            self.fail(
                                element,
                                "has more anonymous attributes than the config specifies for it",
                            );
                            return Ok(());
                        }
                    },
                };
                if emitted.contains(&attribute_name) {
                    self.fail(element, &format!("has duplicate attribute {attribute_name}"));
                    return Ok(());
                }
                emitted.push(attribute_name);
                debug!(
                    element = name,
                    attribute = attribute_name,
                    anonymous = attribute.is_anonymous(),
                    "resolved attribute"
                );
                self.sink
                    .attribute(attribute_name, strip_literal_quotes(&attribute.value))?;
            }
        }

        for child in &element.children {
            self.visit(child)?;
        }
        if self.failed {
            return Ok(());
        }
        self.sink.end_element()
    }

    fn fail(&mut self, element: &Element, problem: &str) {
        self.failed = true;
        self.diagnostics.report(Diagnostic::at(
            self.file_name,
            element.position.line,
            element.position.column,
            Severity::Error,
            format!("{} {}", element.tag, problem),
        ));
    }
}

/// BabyScript source to XML text.
#[derive(Debug, Clone, Default)]
pub struct Compile {
    rules: CompileRules,
}

impl Compile {
    pub fn new(rules: CompileRules) -> Self {
        Self { rules }
    }
}

impl Conversion for Compile {
    fn name(&self) -> &str {
        "compile"
    }

    fn description(&self) -> &str {
        "BabyScript to XML"
    }

    fn source_extensions(&self) -> &[&str] {
        &["baby", "txt"]
    }

    fn target_extension(&self) -> &str {
        "xml"
    }

    fn convert(
        &self,
        file_name: &str,
        source: &str,
        tables: &Tables,
        diagnostics: &mut dyn DiagnosticSink,
    ) -> Result<String, ConvertError> {
        let parsed = syntax::parse(source);
        for error in &parsed.errors {
            diagnostics.report(Diagnostic::at(
                file_name,
                error.position.line,
                error.position.column,
                Severity::Error,
                error.message.clone(),
            ));
        }

        let mut sink = XmlWriterSink::new(
            Vec::new(),
            self.rules.indent_size,
            self.rules.xml_declaration,
        )?;
        compile_document(file_name, &parsed, tables, &mut sink, diagnostics)?;

        let mut bytes = sink.into_inner();
        if !bytes.is_empty() && !bytes.ends_with(b"\n") {
            bytes.push(b'\n');
        }
        String::from_utf8(bytes).map_err(|_| ConvertError::InvalidUtf8)
    }
}

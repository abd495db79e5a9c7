//! Decompile: XML → BabyScript
//!
//! A single pass over the XML node stream. Canonical tag names are shortened
//! through the name table, and attributes that match a prefix of the tag's
//! implied-name rule are written positionally. Values that would not parse as
//! an expression are wrapped in quotes and reported as warnings; nothing in
//! this direction aborts the run except malformed XML.

mod formatting_rules;
mod source;

pub use formatting_rules::DecompileRules;
pub use source::{XmlNode, XmlReaderSource, XmlSource};

use crate::conversion::Conversion;
use crate::diagnostics::{Diagnostic, DiagnosticSink, Severity};
use crate::error::ConvertError;
use crate::model::{ASSIGNMENT_EXACT_ATTR, ASSIGNMENT_NAME_ATTR, SET_VALUE_TAG};
use crate::syntax::validate_expression;
use crate::tables::Tables;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

static NEWLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n|\r|\n").unwrap());

/// Attribute captured into the trailing comment instead of being rendered.
pub const COMMENT_ATTR: &str = "comment";

/// Read every node from `source` and render it as BabyScript.
pub fn decompile_source<X, D>(
    file_name: &str,
    source: &mut X,
    tables: &Tables,
    rules: &DecompileRules,
    diagnostics: &mut D,
) -> Result<String, ConvertError>
where
    X: XmlSource + ?Sized,
    D: DiagnosticSink + ?Sized,
{
    let mut converter = ReverseConverter {
        file_name,
        tables,
        rules,
        diagnostics,
        output: String::new(),
        indent_level: 0,
        pending_comment: None,
    };
    while let Some(node) = source.next_node()? {
        converter.visit(node);
    }
    Ok(converter.output)
}

struct ReverseConverter<'a, D: ?Sized> {
    file_name: &'a str,
    tables: &'a Tables,
    rules: &'a DecompileRules,
    diagnostics: &'a mut D,
    output: String,
    indent_level: usize,
    /// Value of a `comment` attribute, written at the end of the element's line
    pending_comment: Option<String>,
}

/// One attribute on its way to the terse form.
struct PendingAttribute {
    name: String,
    value: String,
    anonymous: bool,
}

impl<D: DiagnosticSink + ?Sized> ReverseConverter<'_, D> {
    fn visit(&mut self, node: XmlNode) {
        match node {
            XmlNode::StartElement {
                name,
                attributes,
                self_closing,
                line,
            } => self.start_element(&name, attributes, self_closing, line),
            XmlNode::EndElement { .. } => {
                self.indent_level = self.indent_level.saturating_sub(1);
                self.write_line("}");
            }
            XmlNode::Comment(text) => {
                for line in NEWLINE.split(&text) {
                    self.write_line(&format!("//{line}"));
                }
            }
            XmlNode::Text(text) => self.text(&text),
        }
    }

    fn indent(&self) -> String {
        self.rules.indent_string.repeat(self.indent_level)
    }

    fn write_line(&mut self, text: &str) {
        let indent = self.indent();
        self.output.push_str(&indent);
        self.output.push_str(text);
        self.output.push('\n');
    }

    /// Append the pending comment, if any, and end the line.
    fn finish_line(&mut self) {
        if let Some(comment) = self.pending_comment.take() {
            self.output.push(' ');
            self.output.push_str(&trailing_comment(&comment));
        }
        self.output.push('\n');
    }

    fn start_element(
        &mut self,
        name: &str,
        attributes: Vec<(String, String)>,
        self_closing: bool,
        line: usize,
    ) {
        let indent = self.indent();
        self.output.push_str(&indent);

        let attributes = match assignment_shorthand(name, attributes, self_closing) {
            Ok(Assignment {
                name,
                exact,
                comment,
            }) => {
                self.pending_comment = comment;
                self.output.push_str(&format!("{name} = {exact};"));
                self.finish_line();
                return;
            }
            Err(attributes) => attributes,
        };

        let tables = self.tables;
        let short_name = tables.names.to_short(name).unwrap_or(name);
        self.output.push_str(short_name);

        if !attributes.is_empty() {
            self.output.push('(');
            let rendered = self.render_attributes(name, attributes, line);
            self.output.push_str(&rendered);
            self.output.push(')');
        }
        if self_closing {
            self.output.push(';');
        }
        self.finish_line();

        if !self_closing {
            self.write_line("{");
            self.indent_level += 1;
        }
    }

    fn render_attributes(
        &mut self,
        tag: &str,
        attributes: Vec<(String, String)>,
        line: usize,
    ) -> String {
        let mut collected = Vec::new();
        for (name, value) in attributes {
            if name == COMMENT_ATTR {
                self.pending_comment = Some(value);
                continue;
            }
            collected.push(PendingAttribute {
                name: name.replace(':', ""),
                value,
                anonymous: false,
            });
        }

        // Positional only while the rule's names are present without a gap.
        let mut anonymous_order = Vec::new();
        let tables = self.tables;
        if let Some(implied) = tables.implied.implied_names(tag) {
            for implied_name in implied {
                let mut found = false;
                for (index, attribute) in collected.iter_mut().enumerate() {
                    if attribute.name == *implied_name {
                        found = true;
                        if !attribute.anonymous {
                            attribute.anonymous = true;
                            anonymous_order.push(index);
                        }
                    }
                }
                if !found {
                    break;
                }
            }
        }
        debug!(
            tag,
            anonymous = anonymous_order.len(),
            named = collected.len() - anonymous_order.len(),
            "classified attributes"
        );

        let ordered = anonymous_order
            .iter()
            .map(|&index| &collected[index])
            .chain(collected.iter().filter(|attribute| !attribute.anonymous));

        let mut parts = Vec::with_capacity(collected.len());
        for attribute in ordered {
            let value = self.render_value(&attribute.value, line);
            if attribute.anonymous {
                parts.push(value);
            } else {
                parts.push(format!("{}:{}", attribute.name, value));
            }
        }
        parts.join(", ")
    }

    /// The value as written, or quoted when it is not a valid expression.
    fn render_value(&mut self, value: &str, line: usize) -> String {
        if validate_expression(value) == 0 {
            return value.to_string();
        }

        warn!(file = self.file_name, line, value, "wrapping invalid expression in quotes");
        self.diagnostics.report(Diagnostic::at_line(
            self.file_name,
            line,
            Severity::Warning,
            format!("{value} isn't a valid expression, got to wrap it"),
        ));
        format!("\"{value}\"")
    }

    fn text(&mut self, text: &str) {
        if !text.trim().is_empty() {
            debug!(file = self.file_name, "dropping character data");
            return;
        }
        if !self.rules.preserve_blank_lines {
            return;
        }
        let breaks = NEWLINE.find_iter(text).count();
        for _ in 1..breaks {
            self.output.push('\n');
        }
    }
}

struct Assignment {
    name: String,
    exact: String,
    comment: Option<String>,
}

/// Recognise a `set_value` element that can be written as `name = exact;`.
///
/// Hands the attributes back unchanged when the element does not qualify.
fn assignment_shorthand(
    tag: &str,
    attributes: Vec<(String, String)>,
    self_closing: bool,
) -> Result<Assignment, Vec<(String, String)>> {
    if tag != SET_VALUE_TAG || !self_closing {
        return Err(attributes);
    }

    let mut name = None;
    let mut exact = None;
    let mut comment = None;
    for (key, value) in &attributes {
        match key.as_str() {
            ASSIGNMENT_NAME_ATTR => name = Some(value.clone()),
            ASSIGNMENT_EXACT_ATTR => exact = Some(value.clone()),
            COMMENT_ATTR => comment = Some(value.clone()),
            _ => return Err(attributes),
        }
    }

    match (name, exact) {
        (Some(name), Some(exact)) => Ok(Assignment {
            name,
            exact,
            comment,
        }),
        _ => Err(attributes),
    }
}

/// Render a captured `comment` attribute as a trailing terse comment.
fn trailing_comment(text: &str) -> String {
    if NEWLINE.is_match(text) {
        format!("/* {} */", text.replace("*/", "* /"))
    } else {
        format!("// {text}")
    }
}

/// XML text to BabyScript.
#[derive(Debug, Clone, Default)]
pub struct Decompile {
    rules: DecompileRules,
}

impl Decompile {
    pub fn new(rules: DecompileRules) -> Self {
        Self { rules }
    }
}

impl Conversion for Decompile {
    fn name(&self) -> &str {
        "decompile"
    }

    fn description(&self) -> &str {
        "XML to BabyScript"
    }

    fn source_extensions(&self) -> &[&str] {
        &["xml"]
    }

    fn target_extension(&self) -> &str {
        "txt"
    }

    fn convert(
        &self,
        file_name: &str,
        source: &str,
        tables: &Tables,
        diagnostics: &mut dyn DiagnosticSink,
    ) -> Result<String, ConvertError> {
        let mut reader = XmlReaderSource::new(source);
        decompile_source(file_name, &mut reader, tables, &self.rules, diagnostics)
    }
}

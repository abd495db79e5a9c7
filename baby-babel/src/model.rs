//! Element tree shared by the parser and both converters.
//!
//! The parser produces a [`Document`] of [`Node`]s; the compile direction walks it
//! to emit XML. Attribute values are kept as the raw source text of their
//! expression, so a quoted string still carries its quotes here.

use serde::Serialize;

/// Tag name used for assignment shorthand elements (`name = value;`).
pub const SET_VALUE_TAG: &str = "set_value";

/// Attribute names carried by an assignment shorthand element.
pub const ASSIGNMENT_NAME_ATTR: &str = "name";
pub const ASSIGNMENT_EXACT_ATTR: &str = "exact";

/// A 1-based line/column pair in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A single attribute. `name == None` marks an anonymous (positional) attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: Option<String>,
    pub value: String,
}

impl Attribute {
    pub fn named(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: value.into(),
        }
    }

    pub fn anonymous(value: impl Into<String>) -> Self {
        Self {
            name: None,
            value: value.into(),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.name.is_none()
    }
}

/// An element as written in the terse form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
    /// Written as `name = value;` rather than as a tag.
    pub is_assignment: bool,
    pub position: Position,
}

impl Element {
    pub fn new(tag: impl Into<String>, attributes: Vec<Attribute>, children: Vec<Node>) -> Self {
        Self {
            tag: tag.into(),
            attributes,
            children,
            is_assignment: false,
            position: Position::default(),
        }
    }

    /// Builds the `set_value` element for `name = exact;`.
    pub fn assignment(name: impl Into<String>, exact: impl Into<String>) -> Self {
        Self {
            tag: SET_VALUE_TAG.to_string(),
            attributes: vec![
                Attribute::named(ASSIGNMENT_NAME_ATTR, name),
                Attribute::named(ASSIGNMENT_EXACT_ATTR, exact),
            ],
            children: Vec::new(),
            is_assignment: true,
            position: Position::default(),
        }
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }
}

/// A comment node; `text` is everything between the comment delimiters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub text: String,
    pub position: Position,
}


#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Element(Element),
    Comment(Comment),
}

/// The top-level node list of one terse source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    pub children: Vec<Node>,
}

impl Document {
    pub fn with_content(children: Vec<Node>) -> Self {
        Self { children }
    }
}

/// A syntax error reported by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxError {
    pub position: Position,
    pub message: String,
}

/// Output of the parser: the (possibly partial) tree plus every syntax error seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    pub document: Document,
    pub errors: Vec<SyntaxError>,
}

impl ParseResult {
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

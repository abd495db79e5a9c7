//! BabyScript syntax
//!
//! Tokens come from a logos lexer; a hand-written recursive descent parser turns
//! them into a [`Document`](crate::model::Document) and keeps going after an
//! error so that one run reports as many problems as it can.

mod expression;
mod line_index;
mod parser;
mod tokens;

pub use expression::validate_expression;
pub use line_index::LineIndex;
pub use parser::parse;
pub use tokens::{tokenize_with_locations, Token};

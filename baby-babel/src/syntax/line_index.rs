use crate::model::Position;

/// Maps byte offsets in a source text to 1-based line/column positions.
///
/// Columns count characters, not bytes.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(offset, _)| offset + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    /// Position of `offset`. Offsets past the end clamp to the end of the text.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.source.len());
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let line_start = self.line_starts[line];
        let column = self
            .source
            .get(line_start..offset)
            .map_or(offset - line_start, |prefix| prefix.chars().count());
        Position::new(line + 1, column + 1)
    }

    pub fn line(&self, offset: usize) -> usize {
        self.position(offset).line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_character_is_line_one_column_one() {
        let index = LineIndex::new("abc");
        assert_eq!(index.position(0), Position::new(1, 1));
        assert_eq!(index.position(2), Position::new(1, 3));
    }

    #[test]
    fn offsets_after_newlines_move_to_next_line() {
        let source = "a;\n  b;\n\nc;";
        let index = LineIndex::new(source);
        assert_eq!(index.position(source.find('b').unwrap()), Position::new(2, 3));
        assert_eq!(index.position(source.find('c').unwrap()), Position::new(4, 1));
    }

    #[test]
    fn columns_count_characters() {
        let source = "é b";
        let index = LineIndex::new(source);
        assert_eq!(index.position(source.find('b').unwrap()), Position::new(1, 3));
    }

    #[test]
    fn end_of_input_is_a_valid_position() {
        let source = "a\n";
        let index = LineIndex::new(source);
        assert_eq!(index.position(source.len()), Position::new(2, 1));
        assert_eq!(index.position(source.len() + 10), Position::new(2, 1));
    }
}

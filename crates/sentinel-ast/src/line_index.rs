//! Byte-offset to line/column lookups, backed by a cached newline table.

/// A 1-based line/column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// Caches the byte offset of every newline in a file so that
/// `offset -> (line, column)` lookups are `O(log n)` via binary search,
/// instead of rescanning the file on every query (§4.1).
#[derive(Debug, Clone)]
pub struct LineIndex {
    newline_offsets: Vec<usize>,
}

impl LineIndex {
    pub fn new(content: &[u8]) -> Self {
        let newline_offsets = content
            .iter()
            .enumerate()
            .filter_map(|(i, &b)| (b == b'\n').then_some(i))
            .collect();
        Self { newline_offsets }
    }

    /// Returns the 1-based line and column for a byte offset into the file.
    pub fn position_for(&self, offset: usize) -> Position {
        // Number of newlines strictly before `offset` gives the 0-based line index.
        let line_idx = match self.newline_offsets.binary_search(&offset) {
            Ok(i) => i,     // offset lands exactly on a newline: still that line
            Err(i) => i,
        };
        let line_start = if line_idx == 0 {
            0
        } else {
            self.newline_offsets[line_idx - 1] + 1
        };
        Position {
            line: line_idx + 1,
            column: offset.saturating_sub(line_start),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_line_and_column_across_lines() {
        let content = b"abc\ndef\nghi";
        let idx = LineIndex::new(content);
        assert_eq!(idx.position_for(0), Position { line: 1, column: 0 });
        assert_eq!(idx.position_for(4), Position { line: 2, column: 0 });
        assert_eq!(idx.position_for(9), Position { line: 3, column: 1 });
    }

    #[test]
    fn handles_empty_file() {
        let idx = LineIndex::new(b"");
        assert_eq!(idx.position_for(0), Position { line: 1, column: 0 });
    }
}

//! Byte ranges over source text and translation to line/column positions.
//!
//! Everything inside the workspace speaks byte offsets. Editors speak
//! zero-based lines and UTF-16 columns; [`LineIndex`] converts between the
//! two for one immutable snapshot of the text.

use serde::{Deserialize, Serialize};

/// Half-open byte range `start..end` into a source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "inverted range {start}..{end}");
        TextRange { start, end }
    }

    /// Zero-width range, used for insertions.
    pub fn empty(at: usize) -> Self {
        TextRange { start: at, end: at }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True when the two ranges share at least one byte, or when an
    /// insertion point falls strictly inside the other range.
    pub fn overlaps(&self, other: TextRange) -> bool {
        if self.is_empty() && other.is_empty() {
            return false;
        }
        if self.is_empty() {
            return other.start < self.start && self.start < other.end;
        }
        if other.is_empty() {
            return self.start < other.start && other.start < self.end;
        }
        self.start < other.end && other.start < self.end
    }

    pub fn slice<'t>(&self, text: &'t str) -> &'t str {
        &text[self.start..self.end]
    }
}

/// Zero-based line and UTF-16 column, the coordinates editors display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LinePosition {
    pub line: u32,
    pub character: u32,
}

impl LinePosition {
    pub fn new(line: u32, character: u32) -> Self {
        LinePosition { line, character }
    }
}

/// Line start table for one text snapshot.
pub struct LineIndex<'t> {
    text: &'t str,
    line_starts: Vec<usize>,
}

impl<'t> LineIndex<'t> {
    pub fn new(text: &'t str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        LineIndex { text, line_starts }
    }

    /// Translate a byte offset. Offsets past the end clamp to the end;
    /// offsets inside a multi-byte character snap back to its start.
    pub fn position(&self, offset: usize) -> LinePosition {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let start = self.line_starts[line];
        let character: usize = self.text[start..offset]
            .chars()
            .map(char::len_utf16)
            .sum();
        LinePosition::new(line as u32, character as u32)
    }

    /// Translate a line/column back to a byte offset. Columns past the end
    /// of the line clamp to the line end (before its newline).
    pub fn offset(&self, position: LinePosition) -> usize {
        let line = position.line as usize;
        if line >= self.line_starts.len() {
            return self.text.len();
        }
        let start = self.line_starts[line];
        let end = self
            .line_starts
            .get(line + 1)
            .map(|next| next - 1)
            .unwrap_or(self.text.len());
        let mut units = 0u32;
        for (i, c) in self.text[start..end].char_indices() {
            if units >= position.character {
                return start + i;
            }
            units += c.len_utf16() as u32;
        }
        end
    }

    pub fn range(&self, range: TextRange) -> (LinePosition, LinePosition) {
        (self.position(range.start), self.position(range.end))
    }
}

/// Byte offset of the first character of the line containing `offset`.
pub fn line_start(text: &str, offset: usize) -> usize {
    text[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

/// The line break `text` uses, judged by its first line: `"\r\n"` or `"\n"`.
pub fn line_ending(text: &str) -> &'static str {
    match text.find('\n') {
        Some(at) if text[..at].ends_with('\r') => "\r\n",
        _ => "\n",
    }
}

/// Leading spaces and tabs of the line containing `offset`.
pub fn indentation_at(text: &str, offset: usize) -> &str {
    let start = line_start(text, offset);
    let rest = &text[start..];
    let width = rest
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(rest.len());
    &rest[..width]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_counts_lines_and_utf16_columns() {
        let text = "ab\nc\u{00e9}d\n\u{1F600}x";
        let index = LineIndex::new(text);
        assert_eq!(index.position(0), LinePosition::new(0, 0));
        assert_eq!(index.position(3), LinePosition::new(1, 0));
        // 'é' is two bytes but one UTF-16 unit
        assert_eq!(index.position(6), LinePosition::new(1, 2));
        // the emoji is four bytes and two UTF-16 units
        let x = text.find('x').unwrap();
        assert_eq!(index.position(x), LinePosition::new(2, 2));
    }

    #[test]
    fn offset_inverts_position() {
        let text = "contract A {\n    uint256 a;\n}\n";
        let index = LineIndex::new(text);
        for offset in 0..=text.len() {
            assert_eq!(index.offset(index.position(offset)), offset);
        }
    }

    #[test]
    fn offset_clamps_past_line_end() {
        let text = "ab\ncd";
        let index = LineIndex::new(text);
        assert_eq!(index.offset(LinePosition::new(0, 99)), 2);
        assert_eq!(index.offset(LinePosition::new(9, 0)), text.len());
    }

    #[test]
    fn overlapping_ranges() {
        let a = TextRange::new(2, 6);
        assert!(a.overlaps(TextRange::new(5, 9)));
        assert!(!a.overlaps(TextRange::new(6, 9)));
        assert!(a.overlaps(TextRange::empty(4)));
        assert!(!a.overlaps(TextRange::empty(6)));
        assert!(!TextRange::empty(3).overlaps(TextRange::empty(3)));
    }

    #[test]
    fn indentation_of_line() {
        let text = "a\n    \tb = 1;\n";
        let b = text.find('b').unwrap();
        assert_eq!(indentation_at(text, b), "    \t");
        assert_eq!(line_start(text, b), 2);
        assert_eq!(indentation_at(text, 0), "");
    }

    #[test]
    fn line_ending_follows_first_line() {
        assert_eq!(line_ending("a\r\nb\nc"), "\r\n");
        assert_eq!(line_ending("a\nb\r\n"), "\n");
        assert_eq!(line_ending("single line"), "\n");
    }
}

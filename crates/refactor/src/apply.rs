use namespacer_core::TextRange;

use crate::error::RefactorError;
use crate::model::EditOperation;

/// Apply a batch of edits, all computed against `text`, in one pass.
///
/// Ranges must lie on character boundaries and must not overlap. Several
/// insertions at one offset are allowed and land in the order supplied;
/// an insertion at the start of a replaced range lands before it.
pub fn apply_edits(text: &str, edits: &[EditOperation]) -> Result<String, RefactorError> {
    for edit in edits {
        check_range(text, edit.range)?;
    }

    let mut ordered: Vec<&EditOperation> = edits.iter().collect();
    ordered.sort_by_key(|edit| (edit.range.start, edit.range.end));

    // the range reaching furthest so far
    let mut previous: Option<TextRange> = None;
    for edit in &ordered {
        if let Some(prev) = previous {
            if prev.overlaps(edit.range) {
                return Err(RefactorError::OverlappingEdits {
                    first: prev,
                    second: edit.range,
                });
            }
        }
        if previous.is_none_or(|prev| edit.range.end >= prev.end) {
            previous = Some(edit.range);
        }
    }

    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    for edit in ordered {
        out.push_str(&text[copied..edit.range.start]);
        out.push_str(&edit.replacement);
        copied = edit.range.end;
    }
    out.push_str(&text[copied..]);
    Ok(out)
}

/// `range` must lie inside `text` with both ends on character boundaries.
pub(crate) fn check_range(text: &str, range: TextRange) -> Result<(), RefactorError> {
    if range.start > range.end
        || range.end > text.len()
        || !text.is_char_boundary(range.start)
        || !text.is_char_boundary(range.end)
    {
        return Err(RefactorError::EditOutOfBounds {
            range,
            len: text.len(),
        });
    }
    Ok(())
}

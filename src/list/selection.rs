//! Keeps the caret out of marker interiors.

use ropey::Rope;

use super::line::marker_at;
use crate::editor::Selection;

/// The caret position `selection` should snap to, if it needs correcting.
///
/// A caret strictly inside `(markerStart, markerEnd)` moves to `markerStart`.
/// The caret may rest at `markerStart`, at or after `markerEnd`, or anywhere
/// in the indent before the marker. Ranged selections are left alone.
pub fn corrected_selection(rope: &Rope, selection: Selection) -> Option<Selection> {
    if !selection.is_caret() {
        return None;
    }
    let caret = selection.start;
    let span = marker_at(rope, caret).span()?;
    (span.start < caret && caret < span.end).then_some(Selection::caret(span.start))
}

//! The contract between the list engine and whatever owns the text.
//!
//! The engine never stores text of its own. It reads the host's rope and
//! attributes, and asks the host to replace ranges and move the selection.

use std::ops::Range;

use ropey::Rope;
use serde::Serialize;

use super::attrs::AttributeSet;

/// A caret (empty) or a non-empty range of char offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// A zero-length selection at `offset`.
    pub const fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// A selection spanning `range`; reversed bounds are swapped.
    pub const fn new(start: usize, end: usize) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    pub const fn is_caret(&self) -> bool {
        self.start == self.end
    }

    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Range<usize>> for Selection {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// A uniformly styled run of text to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledText {
    pub text: String,
    pub attrs: AttributeSet,
}

impl StyledText {
    pub fn new(text: impl Into<String>, attrs: AttributeSet) -> Self {
        Self {
            text: text.into(),
            attrs,
        }
    }

    /// Unstyled text, used for deletions (`""`) and plain insertions.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, AttributeSet::empty())
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Identity of a registered edit observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub u64);

/// Services a text host makes available to the list engine.
///
/// All offsets are char offsets. Implementations must clamp out-of-range
/// offsets rather than panic.
pub trait TextHost {
    /// Read access to the current text.
    fn rope(&self) -> &Rope;

    fn len_chars(&self) -> usize {
        self.rope().len_chars()
    }

    /// Attributes of the character at `offset`, or empty if there is none.
    fn attributes_at(&self, offset: usize) -> AttributeSet;

    /// Style applied to the next typed character.
    fn typing_attributes(&self) -> AttributeSet;

    fn set_typing_attributes(&mut self, attrs: AttributeSet);

    /// Open a grouped edit. Groups nest; observers are notified once the
    /// outermost group ends.
    fn begin_grouped_edit(&mut self);

    fn end_grouped_edit(&mut self);

    /// Replace the chars in `range` with `text`.
    fn replace_range(&mut self, range: Range<usize>, text: &StyledText);

    /// Rewrite the attributes of every styled run inside `range`.
    fn update_attributes(&mut self, range: Range<usize>, update: &mut dyn FnMut(&mut AttributeSet));

    fn selection(&self) -> Selection;

    fn set_selection(&mut self, selection: Selection);

    /// The observer currently receiving edit intents, if any.
    fn active_observer(&self) -> Option<ObserverId>;

    /// Make `id` the observer receiving edit intents.
    fn install_observer(&mut self, id: ObserverId);
}

/// Run `edit` inside one grouped edit on `host`.
pub fn grouped<H, R>(host: &mut H, edit: impl FnOnce(&mut H) -> R) -> R
where
    H: TextHost + ?Sized,
{
    host.begin_grouped_edit();
    let result = edit(host);
    host.end_grouped_edit();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_new_orders_bounds() {
        let sel = Selection::new(7, 3);
        assert_eq!(sel.start, 3);
        assert_eq!(sel.end, 7);
        assert_eq!(sel.len(), 4);
        assert!(!sel.is_caret());
    }

    #[test]
    fn test_caret_is_empty_selection() {
        let sel = Selection::caret(4);
        assert!(sel.is_caret());
        assert_eq!(sel.range(), 4..4);
    }

    #[test]
    fn test_styled_text_len_counts_chars() {
        let text = StyledText::plain("\n• ");
        assert_eq!(text.len(), 3);
        assert!(!text.is_empty());
        assert!(StyledText::plain("").is_empty());
    }
}

use std::ops::Range;

use ropey::Rope;

use super::attrs::{AttributeRuns, AttributeSet, Run};
use super::host::{ObserverId, Selection, StyledText, TextHost};

/// A styled text buffer backed by a rope data structure.
///
/// Characters live in the rope; their styling lives in run-length attribute
/// storage kept the same length as the rope. The buffer also owns the
/// selection, the typing attributes and the edit-observer registration, which
/// makes it a complete [`TextHost`] for the list engine.
pub struct StyledBuffer {
    rope: Rope,
    attrs: AttributeRuns,
    selection: Selection,
    typing: AttributeSet,
    group_depth: usize,
    pending_change: bool,
    revision: u64,
    observer: Option<ObserverId>,
}

impl StyledBuffer {
    /// Create a new unstyled buffer from a string.
    pub fn from_text(text: &str) -> Self {
        Self::from_styled(text, AttributeSet::empty())
    }

    /// Create a buffer whose every character carries `attrs`.
    ///
    /// `attrs` also become the initial typing attributes.
    pub fn from_styled(text: &str, attrs: AttributeSet) -> Self {
        let rope = Rope::from_str(text);
        let len = rope.len_chars();
        Self {
            rope,
            attrs: AttributeRuns::uniform(len, attrs.clone()),
            selection: Selection::caret(0),
            typing: attrs,
            group_depth: 0,
            pending_change: false,
            revision: 0,
            observer: None,
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// Number of completed changes. A grouped edit counts once.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether a grouped edit is currently open.
    pub const fn in_grouped_edit(&self) -> bool {
        self.group_depth > 0
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// The styled runs covering the whole buffer.
    pub fn runs(&self) -> &[Run] {
        self.attrs.runs()
    }

    /// Default handling for an accepted edit: replace `range` with `text`
    /// styled by the typing attributes and put the caret after it.
    pub fn apply_edit(&mut self, range: Range<usize>, text: &str) {
        let range = self.clamp_range(range);
        let insert = StyledText::new(text, self.typing.clone());
        let caret = range.start + insert.len();
        self.replace_range(range, &insert);
        self.set_selection(Selection::caret(caret));
    }

    fn clamp_range(&self, range: Range<usize>) -> Range<usize> {
        let len = self.rope.len_chars();
        let start = range.start.min(len);
        start..range.end.clamp(start, len)
    }

    fn note_change(&mut self) {
        if self.group_depth == 0 {
            self.revision += 1;
        } else {
            self.pending_change = true;
        }
    }
}

/// Where an offset lands after `range` is replaced by `inserted` chars.
const fn map_offset(offset: usize, range: &Range<usize>, inserted: usize) -> usize {
    if offset >= range.end {
        offset - (range.end - range.start) + inserted
    } else if offset > range.start {
        range.start + inserted
    } else {
        offset
    }
}

impl TextHost for StyledBuffer {
    fn rope(&self) -> &Rope {
        &self.rope
    }

    fn attributes_at(&self, offset: usize) -> AttributeSet {
        self.attrs.at(offset).cloned().unwrap_or_default()
    }

    fn typing_attributes(&self) -> AttributeSet {
        self.typing.clone()
    }

    fn set_typing_attributes(&mut self, attrs: AttributeSet) {
        self.typing = attrs;
    }

    fn begin_grouped_edit(&mut self) {
        self.group_depth += 1;
    }

    fn end_grouped_edit(&mut self) {
        self.group_depth = self.group_depth.saturating_sub(1);
        if self.group_depth == 0 && self.pending_change {
            self.pending_change = false;
            self.revision += 1;
            tracing::trace!(revision = self.revision, "grouped edit committed");
        }
    }

    fn replace_range(&mut self, range: Range<usize>, text: &StyledText) {
        let range = self.clamp_range(range);
        if range.is_empty() && text.is_empty() {
            return;
        }
        let inserted = text.len();
        self.rope.remove(range.clone());
        self.rope.insert(range.start, &text.text);
        self.attrs.replace(range.clone(), inserted, &text.attrs);
        self.selection = Selection::new(
            map_offset(self.selection.start, &range, inserted),
            map_offset(self.selection.end, &range, inserted),
        );
        self.note_change();
    }

    fn update_attributes(&mut self, range: Range<usize>, update: &mut dyn FnMut(&mut AttributeSet)) {
        let range = self.clamp_range(range);
        if range.is_empty() {
            return;
        }
        self.attrs.update(range, update);
        self.note_change();
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn set_selection(&mut self, selection: Selection) {
        let len = self.rope.len_chars();
        self.selection = Selection::new(selection.start.min(len), selection.end.min(len));
        if self.selection.start > 0 {
            if let Some(attrs) = self.attrs.at(self.selection.start - 1) {
                self.typing = attrs.clone();
            }
        }
    }

    fn active_observer(&self) -> Option<ObserverId> {
        self.observer
    }

    fn install_observer(&mut self, id: ObserverId) {
        self.observer = Some(id);
    }
}

impl std::fmt::Debug for StyledBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyledBuffer")
            .field(
                "rope",
                &format_args!("Rope({} lines)", self.rope.len_lines()),
            )
            .field("runs", &self.attrs.runs().len())
            .field("selection", &self.selection)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

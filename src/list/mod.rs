//! List-aware editing engine.
//!
//! Sits between an input source and a [`TextHost`]:
//! - [`ListEditor::should_apply`] decides on every proposed edit, keeping
//!   list markers whole and continuing or leaving lists on Enter
//! - [`ListEditor::on_selection_changed`] keeps the caret out of markers
//! - [`ListEditor::toggle_unordered_list`] and
//!   [`ListEditor::toggle_ordered_list`] apply or remove markers across
//!   the selected lines
//!
//! Markers are never stored: every decision re-reads them from the text.

mod intercept;
mod line;
mod observer;
mod resolve;
mod selection;
mod toggle;

pub use intercept::{
    BackspaceAtMarker, EditIntent, EditPolicy, EnterContinuation, Interceptor,
    MarkerInteriorGuard, Verdict,
};
pub use line::{
    BULLET, Line, Marker, UNORDERED_SYMBOLS, indent_len, indent_text, is_blank_from, line_at,
    lines_covering, marker_at, marker_on, previous_line,
};
pub use observer::{DEFAULT_GUARD_FRAMES, GuardTick, ObserverGuard};
pub use resolve::attributes_for_insertion;
pub use selection::corrected_selection;
pub use toggle::{ToggleOutcome, toggle_ordered_list, toggle_unordered_list};

use tracing::trace;

use crate::editor::{ObserverId, Selection, TextHost};

/// The editor's answer to a proposed edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The host should apply the (possibly rewritten) intent itself.
    Accept,
    /// The host must treat the intent as a no-op.
    Reject,
    /// The editor already applied the edit; the host must not.
    HandledInternally,
}

/// An observer that receives whatever the list policies leave undecided.
pub trait EditDelegate {
    /// Accept or reject an edit no list policy claimed.
    fn should_change(&mut self, _intent: &EditIntent, _host: &dyn TextHost) -> bool {
        true
    }

    fn selection_changed(&mut self, _host: &dyn TextHost) {}
}

/// The list editing engine registered with a host.
pub struct ListEditor {
    id: ObserverId,
    interceptor: Interceptor,
    delegate: Option<Box<dyn EditDelegate>>,
}

impl ListEditor {
    /// An editor with the default policy pipeline and no delegate.
    pub fn new(id: ObserverId) -> Self {
        Self {
            id,
            interceptor: Interceptor::default(),
            delegate: None,
        }
    }

    /// Forward undecided edits and selection changes to `delegate`.
    #[must_use]
    pub fn with_delegate(mut self, delegate: impl EditDelegate + 'static) -> Self {
        self.delegate = Some(Box::new(delegate));
        self
    }

    /// Replace the policy pipeline.
    #[must_use]
    pub fn with_interceptor(mut self, interceptor: Interceptor) -> Self {
        self.interceptor = interceptor;
        self
    }

    pub const fn id(&self) -> ObserverId {
        self.id
    }

    pub const fn interceptor(&self) -> &Interceptor {
        &self.interceptor
    }

    /// Decide on a proposed edit.
    ///
    /// On [`Decision::Accept`] the host applies `intent`, which a policy may
    /// have shifted to stay valid after an edit of its own.
    pub fn should_apply(&mut self, intent: &mut EditIntent, host: &mut dyn TextHost) -> Decision {
        match self.interceptor.evaluate(intent, host) {
            Verdict::Accept => Decision::Accept,
            Verdict::Reject => Decision::Reject,
            Verdict::Handled => Decision::HandledInternally,
            Verdict::Pass => match self.delegate.as_mut() {
                Some(delegate) => {
                    if delegate.should_change(intent, host) {
                        Decision::Accept
                    } else {
                        Decision::Reject
                    }
                }
                None => Decision::Accept,
            },
        }
    }

    /// React to a selection change, snapping a caret out of a marker.
    ///
    /// Returns the corrected selection when one was applied.
    pub fn on_selection_changed(&mut self, host: &mut dyn TextHost) -> Option<Selection> {
        let corrected = corrected_selection(host.rope(), host.selection());
        if let Some(selection) = corrected {
            trace!(caret = selection.start, "caret moved out of marker");
            host.set_selection(selection);
        }
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.selection_changed(host);
        }
        corrected
    }

    /// Toggle `"• "` markers across the selected lines.
    pub fn toggle_unordered_list(&self, host: &mut dyn TextHost) -> ToggleOutcome {
        toggle_unordered_list(host)
    }

    /// Toggle numbered markers across the selected lines.
    pub fn toggle_ordered_list(&self, host: &mut dyn TextHost) -> ToggleOutcome {
        toggle_ordered_list(host)
    }

    /// Whether the host currently routes edits to this editor.
    pub fn is_active_observer(&self, host: &dyn TextHost) -> bool {
        host.active_observer() == Some(self.id)
    }

    /// Register with the host unless already registered.
    ///
    /// Returns `true` if the registration had to be restored.
    pub fn reinstall(&self, host: &mut dyn TextHost) -> bool {
        if self.is_active_observer(host) {
            return false;
        }
        host.install_observer(self.id);
        true
    }
}

impl std::fmt::Debug for ListEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListEditor")
            .field("id", &self.id)
            .field("interceptor", &self.interceptor)
            .field("delegate", &self.delegate.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use proptest::prelude::*;

    use super::*;
    use crate::editor::StyledBuffer;

    fn editor() -> ListEditor {
        ListEditor::new(ObserverId(7))
    }

    struct Readonly;

    impl EditDelegate for Readonly {
        fn should_change(&mut self, _intent: &EditIntent, _host: &dyn TextHost) -> bool {
            false
        }
    }

    struct CountSelections(Rc<Cell<usize>>);

    impl EditDelegate for CountSelections {
        fn selection_changed(&mut self, _host: &dyn TextHost) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_undecided_edit_is_accepted_without_delegate() {
        let mut buf = StyledBuffer::from_text("abc");
        let mut intent = EditIntent::new(3..3, "d");
        assert_eq!(editor().should_apply(&mut intent, &mut buf), Decision::Accept);
    }

    #[test]
    fn test_undecided_edit_goes_to_delegate() {
        let mut buf = StyledBuffer::from_text("abc");
        let mut editor = editor().with_delegate(Readonly);
        let mut intent = EditIntent::new(3..3, "d");
        assert_eq!(editor.should_apply(&mut intent, &mut buf), Decision::Reject);
    }

    struct CountChanges(Rc<Cell<usize>>);

    impl EditDelegate for CountChanges {
        fn should_change(&mut self, _intent: &EditIntent, _host: &dyn TextHost) -> bool {
            self.0.set(self.0.get() + 1);
            true
        }
    }

    #[test]
    fn test_delegate_approval_accepts_and_sees_every_undecided_edit() {
        let count = Rc::new(Cell::new(0));
        let mut editor = editor().with_delegate(CountChanges(Rc::clone(&count)));
        let mut buf = StyledBuffer::from_text("abc");
        for _ in 0..2 {
            let mut intent = EditIntent::new(3..3, "d");
            assert_eq!(editor.should_apply(&mut intent, &mut buf), Decision::Accept);
        }
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_list_policies_decide_before_delegate() {
        let mut buf = StyledBuffer::from_text("• item");
        buf.set_selection(Selection::caret(6));
        let mut editor = editor().with_delegate(Readonly);
        let mut intent = EditIntent::new(6..6, "\n");
        assert_eq!(
            editor.should_apply(&mut intent, &mut buf),
            Decision::HandledInternally
        );
        assert_eq!(buf.text(), "• item\n• ");
    }

    #[test]
    fn test_selection_change_snaps_and_notifies_delegate() {
        let count = Rc::new(Cell::new(0));
        let mut editor = editor().with_delegate(CountSelections(Rc::clone(&count)));
        let mut buf = StyledBuffer::from_text("• item");
        buf.set_selection(Selection::caret(1));
        assert_eq!(editor.on_selection_changed(&mut buf), Some(Selection::caret(0)));
        assert_eq!(buf.selection(), Selection::caret(0));

        buf.set_selection(Selection::caret(4));
        assert_eq!(editor.on_selection_changed(&mut buf), None);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_registration_round_trip() {
        let editor = editor();
        let mut buf = StyledBuffer::empty();
        assert!(!editor.is_active_observer(&buf));
        assert!(editor.reinstall(&mut buf));
        assert!(editor.is_active_observer(&buf));
        assert!(!editor.reinstall(&mut buf));
    }

    fn list_line() -> impl Strategy<Value = String> {
        (
            "[ \t]{0,3}",
            prop_oneof![
                Just("• ".to_string()),
                Just("- ".to_string()),
                Just("* ".to_string()),
                (0u32..1000, prop_oneof![Just('.'), Just(')')]).prop_map(|(n, d)| format!("{n}{d} ")),
            ],
            // A populated item, so a backspace at the marker end is refused
            // rather than clearing an empty item.
            "[a-z][a-z ]{0,7}",
        )
            .prop_map(|(indent, marker, body)| format!("{indent}{marker}{body}"))
    }

    proptest! {
        #[test]
        fn edits_starting_inside_a_marker_are_rejected(
            before in "[a-z]{0,6}",
            line in list_line(),
            offset_seed in 0usize..64,
            text in "[a-z\n]{0,2}",
            len in 0usize..3,
        ) {
            let source = format!("{before}\n{line}");
            let mut buf = StyledBuffer::from_text(&source);
            let line_start = before.chars().count() + 1;
            let span = marker_at(buf.rope(), line_start).span().unwrap();
            prop_assume!(span.len() > 1);
            let start = span.start + 1 + offset_seed % (span.len() - 1);
            let end = (start + len).min(buf.rope().len_chars());
            let mut intent = EditIntent::new(start..end, text);
            let before_text = buf.text();
            prop_assert_eq!(editor().should_apply(&mut intent, &mut buf), Decision::Reject);
            prop_assert_eq!(buf.text(), before_text);
        }
    }
}

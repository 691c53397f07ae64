use crate::editor::{ObserverId, Selection, StyledBuffer, TextHost};
use crate::list::{Decision, EditDelegate, EditIntent, GuardTick, ListEditor, ToggleOutcome};

use super::{EDITOR_OBSERVER, Session, SessionEvent};

fn session_at(text: &str, caret: usize) -> Session {
    let mut session = Session::new(StyledBuffer::from_text(text));
    session.select(Selection::caret(caret));
    session.take_events();
    session
}

#[test]
fn test_new_session_registers_editor() {
    let session = Session::new(StyledBuffer::from_text("x"));
    assert!(session.editor().is_active_observer(session.buffer()));
    assert_eq!(session.buffer().active_observer(), Some(EDITOR_OBSERVER));
}

#[test]
fn test_enter_continues_bullet_and_reports_changes() {
    let mut session = session_at("• a", 3);
    assert_eq!(session.enter(), Decision::HandledInternally);
    assert_eq!(
        session.take_events(),
        vec![
            SessionEvent::TextChanged("• a\n• ".to_string()),
            SessionEvent::SelectionChanged(Selection::caret(6)),
        ]
    );
}

#[test]
fn test_enter_continues_numbering() {
    let mut session = session_at("1. first", 8);
    session.enter();
    assert_eq!(session.text(), "1. first\n2. ");
    assert_eq!(session.selection(), Selection::caret(12));
}

#[test]
fn test_enter_keeps_indent() {
    let mut session = session_at("  - x", 5);
    session.enter();
    assert_eq!(session.text(), "  - x\n  • ");
    assert_eq!(session.selection(), Selection::caret(10));
}

#[test]
fn test_enter_mid_item_splits_into_two_items() {
    let mut session = session_at("• ab", 3);
    session.enter();
    assert_eq!(session.text(), "• a\n• b");
    assert_eq!(session.selection(), Selection::caret(6));
}

#[test]
fn test_enter_on_empty_item_leaves_list() {
    let mut session = session_at("• a\n• ", 6);
    assert_eq!(session.enter(), Decision::Accept);
    assert_eq!(session.text(), "• a\n\n");
    assert_eq!(session.selection(), Selection::caret(5));
    let events = session.take_events();
    assert_eq!(events[0], SessionEvent::TextChanged("• a\n\n".to_string()));
}

#[test]
fn test_enter_on_plain_line_is_default_newline() {
    let mut session = session_at("plain", 5);
    assert_eq!(session.enter(), Decision::Accept);
    assert_eq!(session.text(), "plain\n");
    assert_eq!(session.selection(), Selection::caret(6));
}

#[test]
fn test_backspace_on_empty_item_drops_marker() {
    let mut session = session_at("• a\n• ", 6);
    assert_eq!(session.backspace(), Decision::HandledInternally);
    assert_eq!(session.text(), "• a\n");
    assert_eq!(session.selection(), Selection::caret(4));
}

#[test]
fn test_backspace_into_populated_marker_is_refused() {
    let mut session = session_at("• a", 2);
    assert_eq!(session.backspace(), Decision::Reject);
    assert_eq!(session.text(), "• a");
    assert!(session.take_events().is_empty());
}

#[test]
fn test_backspace_at_buffer_start_does_nothing() {
    let mut session = session_at("abc", 0);
    assert_eq!(session.backspace(), Decision::Reject);
    assert_eq!(session.buffer().revision(), 0);
}

#[test]
fn test_backspace_deletes_ranged_selection() {
    let mut session = session_at("hello world", 0);
    session.select(Selection::new(0, 6));
    assert_eq!(session.backspace(), Decision::Accept);
    assert_eq!(session.text(), "world");
    assert_eq!(session.selection(), Selection::caret(0));
}

#[test]
fn test_caret_inside_marker_snaps_to_marker_start() {
    let mut session = session_at("x\n• a", 0);
    assert_eq!(session.select(Selection::caret(3)), Selection::caret(2));
    assert_eq!(
        session.take_events(),
        vec![SessionEvent::SelectionChanged(Selection::caret(2))]
    );
}

#[test]
fn test_snap_back_to_same_caret_is_silent() {
    let mut session = session_at("• abc", 0);
    session.select(Selection::caret(1));
    assert_eq!(session.selection(), Selection::caret(0));
    assert!(session.take_events().is_empty());
}

#[test]
fn test_typing_over_marker_interior_is_rejected() {
    let mut session = session_at("• abc", 0);
    session.select(Selection::new(1, 3));
    assert_eq!(session.type_text("z"), Decision::Reject);
    assert_eq!(session.text(), "• abc");
}

#[test]
fn test_typing_in_content_is_accepted() {
    let mut session = session_at("• abc", 5);
    assert_eq!(session.type_text("d"), Decision::Accept);
    assert_eq!(session.text(), "• abcd");
    assert_eq!(session.selection(), Selection::caret(6));
}

#[test]
fn test_displaced_editor_sees_no_edits() {
    let mut session = session_at("1. ab", 5);
    session.host_mut().install_observer(ObserverId(42));
    assert_eq!(session.enter(), Decision::Accept);
    assert_eq!(session.text(), "1. ab\n");
}

#[test]
fn test_frame_reinstalls_displaced_editor() {
    let mut session = session_at("1. ab", 5);
    session.host_mut().install_observer(ObserverId(42));
    assert_eq!(session.frame(), GuardTick::Reinstalled);
    assert_eq!(session.enter(), Decision::HandledInternally);
    assert_eq!(session.text(), "1. ab\n2. ");
}

#[test]
fn test_guard_expires_after_its_frames() {
    let mut session = Session::new(StyledBuffer::empty()).with_guard_frames(1);
    assert_eq!(session.frame(), GuardTick::Held);
    session.host_mut().install_observer(ObserverId(42));
    assert_eq!(session.frame(), GuardTick::Expired);
    assert!(!session.editor().is_active_observer(session.buffer()));
}

#[test]
fn test_toggle_reports_one_text_change() {
    let mut session = session_at("a\nb", 0);
    session.select(Selection::new(0, 3));
    session.take_events();
    assert_eq!(session.toggle_ordered_list(), ToggleOutcome::Added { lines: 2 });
    assert_eq!(
        session.take_events(),
        vec![
            SessionEvent::TextChanged("1. a\n2. b".to_string()),
            SessionEvent::SelectionChanged(Selection::new(3, 9)),
        ]
    );
}

#[test]
fn test_bold_caret_applies_to_next_typed_text() {
    let mut session = session_at("ab", 2);
    session.toggle_bold();
    assert!(session.take_events().is_empty());
    session.type_text("c");
    assert!(session.buffer().attributes_at(2).is_bold());
    assert!(!session.buffer().attributes_at(1).is_bold());
}

#[test]
fn test_link_on_range_is_a_text_change() {
    let mut session = session_at("see docs", 0);
    session.select(Selection::new(4, 8));
    session.take_events();
    assert!(session.set_link("https://d.example"));
    assert_eq!(
        session.take_events(),
        vec![SessionEvent::TextChanged("see docs".to_string())]
    );
    session.remove_link();
    assert_eq!(session.buffer().attributes_at(4).link, None);
}

struct Readonly;

impl EditDelegate for Readonly {
    fn should_change(&mut self, _intent: &EditIntent, _host: &dyn TextHost) -> bool {
        false
    }
}

#[test]
fn test_delegate_can_veto_plain_edits() {
    let editor = ListEditor::new(EDITOR_OBSERVER).with_delegate(Readonly);
    let mut session = Session::with_editor(StyledBuffer::from_text("• a"), editor);
    session.select(Selection::caret(3));
    assert_eq!(session.type_text("b"), Decision::Reject);
    assert_eq!(session.enter(), Decision::HandledInternally);
    assert_eq!(session.text(), "• a\n• ");
}

#[test]
fn test_snapshot_serializes() {
    let session = session_at("• a", 3);
    let value = serde_json::to_value(session.snapshot()).unwrap();
    assert_eq!(value["text"], "• a");
    assert_eq!(value["selection"]["start"], 3);
    assert_eq!(value["runs"][0]["len"], 3);
    assert_eq!(value["revision"], 0);
}

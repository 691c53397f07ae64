//! Input-source side of the editor: turns keystrokes and commands into
//! edit intents, lets the list editor decide, and applies default handling.
//!
//! Every change to the text or selection is recorded as a [`SessionEvent`]
//! so an embedding layer can forward it (e.g. as a `textChange` callback).

#[cfg(test)]
mod tests;

use serde::Serialize;
use tracing::debug;

use crate::editor::{ObserverId, Run, Selection, StyledBuffer, TextHost};
use crate::format;
use crate::list::{
    DEFAULT_GUARD_FRAMES, Decision, EditIntent, GuardTick, ListEditor, ObserverGuard,
    ToggleOutcome,
};

/// Observer id the session registers its editor under.
pub const EDITOR_OBSERVER: ObserverId = ObserverId(1);

/// Something an embedding layer should hear about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The text changed; carries the full new text.
    TextChanged(String),
    SelectionChanged(Selection),
}

/// Serializable view of the session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub text: String,
    pub selection: Selection,
    pub runs: Vec<Run>,
    pub revision: u64,
}

/// A styled buffer wired to a list editor.
#[derive(Debug)]
pub struct Session {
    buffer: StyledBuffer,
    editor: ListEditor,
    guard: ObserverGuard,
    events: Vec<SessionEvent>,
    last_revision: u64,
    last_selection: Selection,
}

impl Session {
    /// Create a session over `buffer` with a default list editor.
    pub fn new(buffer: StyledBuffer) -> Self {
        Self::with_editor(buffer, ListEditor::new(EDITOR_OBSERVER))
    }

    /// Create a session over `buffer` driven by `editor`.
    pub fn with_editor(mut buffer: StyledBuffer, editor: ListEditor) -> Self {
        editor.reinstall(&mut buffer);
        let last_revision = buffer.revision();
        let last_selection = buffer.selection();
        Self {
            buffer,
            editor,
            guard: ObserverGuard::new(DEFAULT_GUARD_FRAMES),
            events: Vec::new(),
            last_revision,
            last_selection,
        }
    }

    /// Set how many frames the observer guard stays active.
    #[must_use]
    pub fn with_guard_frames(mut self, frames: u32) -> Self {
        self.guard.restart(frames);
        self
    }

    pub const fn buffer(&self) -> &StyledBuffer {
        &self.buffer
    }

    /// Direct host access, bypassing the editor.
    pub const fn host_mut(&mut self) -> &mut StyledBuffer {
        &mut self.buffer
    }

    pub const fn editor(&self) -> &ListEditor {
        &self.editor
    }

    pub fn text(&self) -> String {
        self.buffer.text()
    }

    pub fn selection(&self) -> Selection {
        self.buffer.selection()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            text: self.buffer.text(),
            selection: self.buffer.selection(),
            runs: self.buffer.runs().to_vec(),
            revision: self.buffer.revision(),
        }
    }

    /// Drain the events recorded since the last call.
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Type `text` over the current selection.
    pub fn type_text(&mut self, text: &str) -> Decision {
        let intent = EditIntent::typing(self.buffer.selection(), text);
        self.submit(intent)
    }

    /// Press Enter.
    pub fn enter(&mut self) -> Decision {
        self.type_text("\n")
    }

    /// Press Backspace. A caret at the start of the buffer does nothing.
    pub fn backspace(&mut self) -> Decision {
        let selection = self.buffer.selection();
        let intent = if selection.is_caret() {
            if selection.start == 0 {
                return Decision::Reject;
            }
            EditIntent::backspace(selection.start)
        } else {
            EditIntent::new(selection.range(), "")
        };
        self.submit(intent)
    }

    /// Move the selection, as a click or arrow key would.
    pub fn select(&mut self, selection: Selection) -> Selection {
        self.buffer.set_selection(selection);
        self.selection_changed();
        self.buffer.selection()
    }

    pub fn toggle_unordered_list(&mut self) -> ToggleOutcome {
        let outcome = self.editor.toggle_unordered_list(&mut self.buffer);
        self.publish();
        outcome
    }

    pub fn toggle_ordered_list(&mut self) -> ToggleOutcome {
        let outcome = self.editor.toggle_ordered_list(&mut self.buffer);
        self.publish();
        outcome
    }

    pub fn toggle_bold(&mut self) {
        format::toggle_bold(&mut self.buffer);
        self.publish();
    }

    pub fn set_link(&mut self, url: &str) -> bool {
        let applied = format::set_link(&mut self.buffer, url);
        self.publish();
        applied
    }

    pub fn remove_link(&mut self) {
        format::remove_link(&mut self.buffer);
        self.publish();
    }

    /// Advance one input frame, letting the observer guard check in.
    pub fn frame(&mut self) -> GuardTick {
        self.guard.tick(&self.editor, &mut self.buffer)
    }

    fn submit(&mut self, mut intent: EditIntent) -> Decision {
        if !self.editor.is_active_observer(&self.buffer) {
            // Someone else owns the host's edits; only default handling runs.
            debug!(range = ?intent.range, "edit bypassed list editor");
            self.buffer.apply_edit(intent.range, &intent.text);
            self.publish();
            return Decision::Accept;
        }

        let decision = self.editor.should_apply(&mut intent, &mut self.buffer);
        crate::perf::log_event(
            "session.decision",
            format!("range={:?} text={:?} decision={decision:?}", intent.range, intent.text),
        );
        if decision == Decision::Accept {
            self.buffer.apply_edit(intent.range, &intent.text);
        }
        self.publish();
        decision
    }

    /// Record text and selection changes since the last publish.
    fn publish(&mut self) {
        if self.buffer.revision() != self.last_revision {
            self.last_revision = self.buffer.revision();
            self.events.push(SessionEvent::TextChanged(self.buffer.text()));
        }
        self.selection_changed();
    }

    fn selection_changed(&mut self) {
        if self.buffer.selection() == self.last_selection {
            return;
        }
        self.editor.on_selection_changed(&mut self.buffer);
        let selection = self.buffer.selection();
        if selection != self.last_selection {
            self.last_selection = selection;
            self.events.push(SessionEvent::SelectionChanged(selection));
        }
    }
}

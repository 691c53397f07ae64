//! Short-lived watchdog that keeps the list editor registered as the
//! host's edit observer.
//!
//! Some hosts reassign their observer shortly after setup. The guard is
//! ticked once per input frame and re-installs the editor whenever it finds
//! itself displaced, until its frame budget runs out.

use tracing::debug;

use super::ListEditor;
use crate::editor::TextHost;

/// Frames a guard stays active by default (about half a second at 60 fps).
pub const DEFAULT_GUARD_FRAMES: u32 = 30;

/// Result of one guard tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardTick {
    /// The editor was displaced and has been installed again.
    Reinstalled,
    /// The editor was still the active observer.
    Held,
    /// The frame budget is spent; the guard no longer checks.
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserverGuard {
    frames_left: u32,
}

impl ObserverGuard {
    pub const fn new(frames: u32) -> Self {
        Self {
            frames_left: frames,
        }
    }

    pub const fn frames_left(&self) -> u32 {
        self.frames_left
    }

    pub const fn is_running(&self) -> bool {
        self.frames_left > 0
    }

    /// Restart the guard with a fresh frame budget.
    pub const fn restart(&mut self, frames: u32) {
        self.frames_left = frames;
    }

    /// Check the registration once, re-installing `editor` if needed.
    pub fn tick(&mut self, editor: &ListEditor, host: &mut dyn TextHost) -> GuardTick {
        if self.frames_left == 0 {
            return GuardTick::Expired;
        }
        self.frames_left -= 1;
        if editor.reinstall(host) {
            debug!(frames_left = self.frames_left, "edit observer reinstalled");
            GuardTick::Reinstalled
        } else {
            GuardTick::Held
        }
    }
}

impl Default for ObserverGuard {
    fn default() -> Self {
        Self::new(DEFAULT_GUARD_FRAMES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{ObserverId, StyledBuffer};

    #[test]
    fn test_guard_holds_while_registered() {
        let editor = ListEditor::new(ObserverId(1));
        let mut buf = StyledBuffer::empty();
        editor.reinstall(&mut buf);
        let mut guard = ObserverGuard::new(2);
        assert_eq!(guard.tick(&editor, &mut buf), GuardTick::Held);
        assert_eq!(guard.frames_left(), 1);
    }

    #[test]
    fn test_guard_reinstalls_displaced_editor() {
        let editor = ListEditor::new(ObserverId(1));
        let mut buf = StyledBuffer::empty();
        editor.reinstall(&mut buf);
        buf.install_observer(ObserverId(99));

        let mut guard = ObserverGuard::default();
        assert_eq!(guard.tick(&editor, &mut buf), GuardTick::Reinstalled);
        assert!(editor.is_active_observer(&buf));
    }

    #[test]
    fn test_guard_expires_after_budget() {
        let editor = ListEditor::new(ObserverId(1));
        let mut buf = StyledBuffer::empty();
        let mut guard = ObserverGuard::new(1);
        assert_eq!(guard.tick(&editor, &mut buf), GuardTick::Reinstalled);
        assert!(!guard.is_running());

        buf.install_observer(ObserverId(2));
        assert_eq!(guard.tick(&editor, &mut buf), GuardTick::Expired);
        assert!(!editor.is_active_observer(&buf));

        guard.restart(3);
        assert_eq!(guard.tick(&editor, &mut buf), GuardTick::Reinstalled);
    }
}

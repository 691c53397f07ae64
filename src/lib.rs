// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. list::ListEditor)
    clippy::module_name_repetitions
)]

//! # Richlist
//!
//! A list-aware editing engine for styled plain text.
//!
//! Lists live in the text itself: a line starting with `"• "`, `"- "`,
//! `"* "` or `"12. "` is a list item. The engine:
//! - Continues lists on Enter and leaves them on Enter in an empty item
//! - Keeps edits and the caret out of marker interiors
//! - Removes the marker of an empty item on Backspace
//! - Toggles bullets or numbering across the selected lines
//!
//! ## Architecture
//!
//! The engine never owns the text. It talks to a [`editor::TextHost`], which
//! stores characters, styling and selection, and answers every proposed edit
//! with a [`list::Decision`]. [`session::Session`] plays the input source.
//!
//! ## Modules
//!
//! - [`editor`]: Styled buffer and the host contract
//! - [`list`]: Marker detection, edit policies, toggles
//! - [`format`]: Bold and link commands
//! - [`session`]: Input source wiring and change events
//! - [`script`]: Text scripts for the command-line harness
//! - [`config`]: Saved command-line defaults
//! - [`perf`]: Timing and debug event log

pub mod config;
pub mod editor;
pub mod format;
pub mod list;
pub mod perf;
pub mod script;
pub mod session;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::editor::{AttributeSet, Selection, StyledBuffer, TextHost};
    pub use crate::list::{Decision, EditIntent, ListEditor, Marker, ToggleOutcome};
    pub use crate::session::{Session, SessionEvent};
}

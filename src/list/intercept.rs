//! Edit interception: an ordered pipeline of named policies.
//!
//! Each policy looks at a proposed edit and either passes, or settles it by
//! accepting, rejecting, or applying it itself. The first policy that does
//! not pass decides.

use std::ops::Range;

use tracing::debug;

use super::line::{BULLET, Marker, indent_text, is_blank_from, line_at, marker_at, marker_on};
use super::resolve::attributes_for_insertion;
use crate::editor::{Selection, StyledText, TextHost, grouped};

/// A proposed replacement of `range` with `text`, not yet applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditIntent {
    pub range: Range<usize>,
    pub text: String,
}

impl EditIntent {
    /// An intent replacing `range`; reversed bounds are swapped.
    pub fn new(range: Range<usize>, text: impl Into<String>) -> Self {
        let range = if range.start > range.end {
            range.end..range.start
        } else {
            range
        };
        Self {
            range,
            text: text.into(),
        }
    }

    /// Typing `text` over `selection`.
    pub fn typing(selection: Selection, text: impl Into<String>) -> Self {
        Self::new(selection.range(), text)
    }

    /// A single-char backspace with the caret at `caret`.
    pub const fn backspace(caret: usize) -> Self {
        Self {
            range: caret.saturating_sub(1)..caret,
            text: String::new(),
        }
    }

    pub fn is_backspace(&self) -> bool {
        self.text.is_empty() && self.range.len() == 1
    }

    pub fn is_newline(&self) -> bool {
        self.text == "\n"
    }
}

/// What a single policy concluded about an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Not this policy's business; ask the next one.
    Pass,
    /// Let the host apply the edit.
    Accept,
    /// Drop the edit.
    Reject,
    /// The policy already applied the edit (or its replacement).
    Handled,
}

/// A named step of the interception pipeline.
pub trait EditPolicy {
    fn name(&self) -> &'static str;

    /// Decide on `intent`. A policy may mutate `host`; when it mutates and
    /// still passes, it must rewrite `intent` so it stays valid against the
    /// new text.
    fn evaluate(&self, intent: &mut EditIntent, host: &mut dyn TextHost) -> Verdict;
}

/// Delete the whole marker span in one grouped edit and park the caret at
/// the start of the line.
fn remove_marker(host: &mut dyn TextHost, span: Range<usize>, line_start: usize) {
    grouped(host, |host| host.replace_range(span, &StyledText::plain("")));
    host.set_selection(Selection::caret(line_start));
}

/// Backspace next to a marker.
///
/// Right after the marker: an empty item loses its marker, a populated one
/// keeps it and the backspace is dropped. Right before the marker of an
/// empty item: the marker goes instead of the character before it.
#[derive(Debug, Clone, Copy, Default)]
pub struct BackspaceAtMarker;

impl EditPolicy for BackspaceAtMarker {
    fn name(&self) -> &'static str {
        "backspace-at-marker"
    }

    fn evaluate(&self, intent: &mut EditIntent, host: &mut dyn TextHost) -> Verdict {
        if !intent.is_backspace() {
            return Verdict::Pass;
        }
        let caret = intent.range.end;
        let rope = host.rope();
        let line = line_at(rope, caret);
        let Some(span) = marker_on(rope, &line).span() else {
            return Verdict::Pass;
        };
        let blank = is_blank_from(rope, &line, span.end);

        if caret == span.end {
            if !blank {
                return Verdict::Reject;
            }
            remove_marker(host, span, line.start);
            return Verdict::Handled;
        }
        if caret == span.start && blank {
            remove_marker(host, span, line.start);
            return Verdict::Handled;
        }
        Verdict::Pass
    }
}

/// Rejects any edit starting inside `[markerStart, markerEnd)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerInteriorGuard;

impl EditPolicy for MarkerInteriorGuard {
    fn name(&self) -> &'static str {
        "marker-interior-guard"
    }

    fn evaluate(&self, intent: &mut EditIntent, host: &mut dyn TextHost) -> Verdict {
        let start = intent.range.start;
        if marker_at(host.rope(), start).covers(start) {
            Verdict::Reject
        } else {
            Verdict::Pass
        }
    }
}

/// Enter on a list line continues the list, or leaves it when the item is
/// empty and the caret sits at the end of the line.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnterContinuation;

impl EditPolicy for EnterContinuation {
    fn name(&self) -> &'static str {
        "enter-continuation"
    }

    fn evaluate(&self, intent: &mut EditIntent, host: &mut dyn TextHost) -> Verdict {
        if !intent.is_newline() {
            return Verdict::Pass;
        }
        let rope = host.rope();
        let line = line_at(rope, intent.range.start);
        let (span, next) = match marker_on(rope, &line) {
            Marker::Ordered { span, number, .. } => {
                (span, format!("{}. ", number.saturating_add(1)))
            }
            Marker::Unordered { span, .. } => (span, format!("{BULLET} ")),
            Marker::None => return Verdict::Pass,
        };

        if is_blank_from(rope, &line, span.end) && intent.range.start >= line.contents_end {
            // Leave the list: strip the marker and let the newline through,
            // shifted left by what was removed.
            let removed = span.len();
            grouped(host, |host| host.replace_range(span, &StyledText::plain("")));
            intent.range = intent.range.start.saturating_sub(removed)
                ..intent.range.end.saturating_sub(removed);
            debug!(line = line.start, "list exit");
            return Verdict::Pass;
        }

        let indent = indent_text(rope, &line);
        let attrs = attributes_for_insertion(host, intent.range.start);
        let insert = StyledText::new(format!("\n{indent}{next}"), attrs);
        let caret = intent.range.start + insert.len();
        grouped(host, |host| host.replace_range(intent.range.clone(), &insert));
        host.set_selection(Selection::caret(caret));
        debug!(line = line.start, marker = %next.trim_end(), "list continued");
        Verdict::Handled
    }
}

/// The ordered policy pipeline.
pub struct Interceptor {
    policies: Vec<Box<dyn EditPolicy>>,
}

impl Interceptor {
    /// A pipeline running `policies` in order.
    pub fn new(policies: Vec<Box<dyn EditPolicy>>) -> Self {
        Self { policies }
    }

    /// Append a policy after the existing ones.
    #[must_use]
    pub fn with_policy(mut self, policy: impl EditPolicy + 'static) -> Self {
        self.policies.push(Box::new(policy));
        self
    }

    pub fn policy_names(&self) -> Vec<&'static str> {
        self.policies.iter().map(|policy| policy.name()).collect()
    }

    /// Run the pipeline; `Pass` means every policy passed.
    pub fn evaluate(&self, intent: &mut EditIntent, host: &mut dyn TextHost) -> Verdict {
        for policy in &self.policies {
            let verdict = policy.evaluate(intent, host);
            if verdict != Verdict::Pass {
                debug!(policy = policy.name(), ?verdict, range = ?intent.range, "edit intercepted");
                return verdict;
            }
        }
        Verdict::Pass
    }
}

impl Default for Interceptor {
    /// Backspace-at-marker, then the interior guard, then Enter handling.
    fn default() -> Self {
        Self::new(vec![
            Box::new(BackspaceAtMarker),
            Box::new(MarkerInteriorGuard),
            Box::new(EnterContinuation),
        ])
    }
}

impl std::fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interceptor")
            .field("policies", &self.policy_names())
            .finish()
    }
}

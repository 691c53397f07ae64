//! Bulk list toggles over the lines touched by the selection.
//!
//! Target lines are identified once, against the unmutated text. Mutation
//! then walks them bottom to top so an edit never shifts the offsets of a
//! line still waiting to be processed.

use std::ops::Range;

use tracing::debug;

use super::line::{BULLET, Line, Marker, indent_len, line_at, lines_covering, marker_on};
use super::resolve::attributes_for_insertion;
use crate::editor::{StyledText, TextHost, grouped};

/// What a toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Every target line now carries the marker.
    Added { lines: usize },
    /// The marker was removed from every target line.
    Removed { lines: usize },
    /// The selection resolved to no lines; nothing changed.
    NoLines,
}

fn remove<H: TextHost + ?Sized>(host: &mut H, span: Range<usize>) {
    host.replace_range(span, &StyledText::plain(""));
}

/// Insert `marker` at `at`, styled like the text it lands in front of.
fn insert<H: TextHost + ?Sized>(host: &mut H, at: usize, marker: &str) {
    let attrs = attributes_for_insertion(host, at);
    host.replace_range(at..at, &StyledText::new(marker, attrs));
}

/// The line that started at `start` before any edits to it.
fn current_line<H: TextHost + ?Sized>(host: &H, start: usize) -> (Line, Marker) {
    let line = line_at(host.rope(), start);
    let marker = marker_on(host.rope(), &line);
    (line, marker)
}

/// Toggle unordered (`"• "`) markers on the selected lines.
///
/// If every target line already carries an unordered marker they are all
/// removed. Otherwise every target line ends up starting with exactly one
/// `"• "`: ordered markers are replaced, and `"- "`/`"* "` stay in place
/// behind the new bullet so a second toggle restores them.
pub fn toggle_unordered_list<H: TextHost + ?Sized>(host: &mut H) -> ToggleOutcome {
    let lines = lines_covering(host.rope(), host.selection());
    if lines.is_empty() {
        return ToggleOutcome::NoLines;
    }
    let all_bulleted = lines
        .iter()
        .all(|line| marker_on(host.rope(), line).is_unordered());
    debug!(lines = lines.len(), all_bulleted, "toggle unordered list");

    let bullet = format!("{BULLET} ");
    grouped(host, |host| {
        for line in lines.iter().rev() {
            let (current, marker) = current_line(host, line.start);
            match marker {
                Marker::Unordered { span, .. } if all_bulleted => remove(host, span),
                Marker::Unordered { symbol: BULLET, .. } => {}
                Marker::Unordered { span, .. } => insert(host, span.start, &bullet),
                Marker::Ordered { span, .. } => {
                    let at = span.start;
                    remove(host, span);
                    insert(host, at, &bullet);
                }
                Marker::None => {
                    let at = current.start + indent_len(host.rope(), &current);
                    insert(host, at, &bullet);
                }
            }
        }
    });

    if all_bulleted {
        ToggleOutcome::Removed { lines: lines.len() }
    } else {
        ToggleOutcome::Added { lines: lines.len() }
    }
}

/// Toggle ordered (`"1. "`, `"2. "`, ...) markers on the selected lines.
///
/// If every target line is already numbered the numbers are removed.
/// Otherwise any existing marker is replaced and the lines are numbered
/// from 1 in top-to-bottom order.
pub fn toggle_ordered_list<H: TextHost + ?Sized>(host: &mut H) -> ToggleOutcome {
    let lines = lines_covering(host.rope(), host.selection());
    if lines.is_empty() {
        return ToggleOutcome::NoLines;
    }
    let all_numbered = lines
        .iter()
        .all(|line| marker_on(host.rope(), line).is_ordered());
    debug!(lines = lines.len(), all_numbered, "toggle ordered list");

    if all_numbered {
        grouped(host, |host| {
            for line in lines.iter().rev() {
                if let (_, Marker::Ordered { span, .. }) = current_line(host, line.start) {
                    remove(host, span);
                }
            }
        });
        return ToggleOutcome::Removed { lines: lines.len() };
    }

    // Numbers follow the original top-to-bottom order.
    let numbers: Vec<String> = (1..=lines.len()).map(|n| format!("{n}. ")).collect();
    grouped(host, |host| {
        for (line, number) in lines.iter().zip(&numbers).rev() {
            if let Some(span) = current_line(host, line.start).1.span() {
                remove(host, span);
            }
            let (current, _) = current_line(host, line.start);
            let at = current.start + indent_len(host.rope(), &current);
            insert(host, at, number);
        }
    });
    ToggleOutcome::Added { lines: lines.len() }
}

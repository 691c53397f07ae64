//! Line boundaries and list markers derived from buffer text.
//!
//! Nothing here is cached: every query walks the current rope, so results
//! are always consistent with the latest edit.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use ropey::Rope;

use crate::editor::Selection;

/// Symbols recognized as unordered markers when followed by a space.
pub const UNORDERED_SYMBOLS: [char; 3] = ['•', '-', '*'];

/// The symbol the engine inserts for new unordered items.
pub const BULLET: char = '•';

static ORDERED_HEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)([.)])\s").expect("ordered head pattern is valid"));

/// A line of the buffer as a half-open char range.
///
/// `end` includes the trailing line break, `contents_end` excludes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Line {
    pub start: usize,
    pub end: usize,
    pub contents_end: usize,
}

impl Line {
    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// The line without its line break.
    pub const fn contents(&self) -> Range<usize> {
        self.start..self.contents_end
    }

    pub const fn break_len(&self) -> usize {
        self.end - self.contents_end
    }
}

/// The list marker at the head of a line, if any.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Marker {
    #[default]
    None,
    /// `"• "`, `"- "` or `"* "`; the span is always two chars.
    Unordered { span: Range<usize>, symbol: char },
    /// `"{number}{delimiter} "`.
    Ordered {
        span: Range<usize>,
        number: u64,
        delimiter: char,
    },
}

impl Marker {
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub const fn is_unordered(&self) -> bool {
        matches!(self, Self::Unordered { .. })
    }

    pub const fn is_ordered(&self) -> bool {
        matches!(self, Self::Ordered { .. })
    }

    /// The marker's char span, `markerStart..markerEnd`.
    pub fn span(&self) -> Option<Range<usize>> {
        match self {
            Self::None => None,
            Self::Unordered { span, .. } | Self::Ordered { span, .. } => Some(span.clone()),
        }
    }

    /// Whether `offset` lies in `[markerStart, markerEnd)`.
    pub fn covers(&self, offset: usize) -> bool {
        self.span().is_some_and(|span| span.contains(&offset))
    }
}

/// Marker recognized at the head of post-indent text, in chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Head {
    Unordered(char),
    Ordered {
        number: u64,
        delimiter: char,
        len: usize,
    },
}

impl Head {
    const fn len(self) -> usize {
        match self {
            Self::Unordered(_) => 2,
            Self::Ordered { len, .. } => len,
        }
    }
}

fn recognize_head(text: &str) -> Option<Head> {
    let mut chars = text.chars();
    if let (Some(symbol), Some(' ')) = (chars.next(), chars.next())
        && UNORDERED_SYMBOLS.contains(&symbol)
    {
        return Some(Head::Unordered(symbol));
    }

    let caps = ORDERED_HEAD.captures(text)?;
    let head = caps.get(0)?.as_str();
    let delimiter = caps.get(2)?.as_str().chars().next()?;
    Some(Head::Ordered {
        // Non-ASCII digits and overflow still count as a marker, numbered 0.
        number: caps[1].parse().unwrap_or(0),
        delimiter,
        len: head.chars().count(),
    })
}

const fn is_line_break(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\u{0B}' | '\u{0C}' | '\r' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

fn line_by_index(rope: &Rope, idx: usize) -> Line {
    let start = rope.line_to_char(idx);
    let end = if idx + 1 < rope.len_lines() {
        rope.line_to_char(idx + 1)
    } else {
        rope.len_chars()
    };
    let break_len = match end - start {
        0 => 0,
        len => {
            let last = rope.char(end - 1);
            if last == '\n' && len >= 2 && rope.char(end - 2) == '\r' {
                2
            } else {
                usize::from(is_line_break(last))
            }
        }
    };
    Line {
        start,
        end,
        contents_end: end - break_len,
    }
}

/// The line containing `offset`, clamped to the buffer.
///
/// An offset at the end of a buffer that ends in a line break resolves to
/// the empty final line.
pub fn line_at(rope: &Rope, offset: usize) -> Line {
    let offset = offset.min(rope.len_chars());
    line_by_index(rope, rope.char_to_line(offset))
}

/// The line above `line`, or `None` for the first line.
pub fn previous_line(rope: &Rope, line: &Line) -> Option<Line> {
    if line.start == 0 {
        return None;
    }
    let idx = rope.char_to_line(line.start.min(rope.len_chars()));
    Some(line_by_index(rope, idx.checked_sub(1)?))
}

/// Count of leading space and tab chars on `line`.
pub fn indent_len(rope: &Rope, line: &Line) -> usize {
    rope.slice(line.contents())
        .chars()
        .take_while(|ch| *ch == ' ' || *ch == '\t')
        .count()
}

/// The literal leading whitespace of `line`.
pub fn indent_text(rope: &Rope, line: &Line) -> String {
    let indent = indent_len(rope, line);
    rope.slice(line.start..line.start + indent).to_string()
}

/// The marker on `line`, recognized from its current leading text.
pub fn marker_on(rope: &Rope, line: &Line) -> Marker {
    let marker_start = line.start + indent_len(rope, line);
    let text = rope.slice(marker_start..line.contents_end).to_string();
    match recognize_head(&text) {
        None => Marker::None,
        Some(head) => {
            let span = marker_start..marker_start + head.len();
            match head {
                Head::Unordered(symbol) => Marker::Unordered { span, symbol },
                Head::Ordered {
                    number, delimiter, ..
                } => Marker::Ordered {
                    span,
                    number,
                    delimiter,
                },
            }
        }
    }
}

/// The marker on the line containing `offset`.
pub fn marker_at(rope: &Rope, offset: usize) -> Marker {
    marker_on(rope, &line_at(rope, offset))
}

/// Whether the rest of `line` from `from` onward is only whitespace.
pub fn is_blank_from(rope: &Rope, line: &Line, from: usize) -> bool {
    let from = from.clamp(line.start, line.contents_end);
    rope.slice(from..line.contents_end)
        .chars()
        .all(char::is_whitespace)
}

/// Lines touched by `selection`, top to bottom.
///
/// A caret selects its own line. A range selects every line it overlaps by
/// at least one char. An empty buffer has no lines to select.
pub fn lines_covering(rope: &Rope, selection: Selection) -> Vec<Line> {
    let len = rope.len_chars();
    if len == 0 {
        return Vec::new();
    }
    if selection.is_caret() {
        return vec![line_at(rope, selection.start)];
    }

    let start = selection.start.min(len);
    let end = selection.end.min(len);
    let mut lines = Vec::new();
    for idx in rope.char_to_line(start)..rope.len_lines() {
        let line = line_by_index(rope, idx);
        if line.start >= end {
            break;
        }
        if line.start.max(start) < line.end.min(end) {
            lines.push(line);
        }
    }
    lines
}

//! Per-character style attributes and their run-length storage.

use std::ops::Range;

use serde::Serialize;

/// Font weight carried by a styled run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Regular,
    Bold,
}

/// 24-bit foreground color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Style attributes applied to a range of characters.
///
/// Every field is optional; an unset field means "host default". A set with
/// nothing set is considered empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct AttributeSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<FontWeight>,
    /// Font size in points
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    /// Link target URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl AttributeSet {
    /// An attribute set with nothing set.
    pub fn empty() -> Self {
        Self::default()
    }

    pub const fn is_empty(&self) -> bool {
        self.weight.is_none() && self.size.is_none() && self.color.is_none() && self.link.is_none()
    }

    #[must_use]
    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = Some(weight);
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: u16) -> Self {
        self.size = Some(size);
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_link(mut self, url: impl Into<String>) -> Self {
        self.link = Some(url.into());
        self
    }

    pub const fn is_bold(&self) -> bool {
        matches!(self.weight, Some(FontWeight::Bold))
    }

    /// Flip between bold and regular weight.
    pub fn toggle_bold(&mut self) {
        self.weight = if self.is_bold() {
            Some(FontWeight::Regular)
        } else {
            Some(FontWeight::Bold)
        };
    }
}

/// A maximal run of characters sharing one attribute set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Run {
    pub len: usize,
    pub attrs: AttributeSet,
}

/// Run-length attribute storage kept parallel to the buffer's characters.
///
/// Runs never have zero length and adjacent runs never carry equal
/// attributes, so the run list is canonical for a given styling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeRuns {
    runs: Vec<Run>,
}

impl AttributeRuns {
    /// Runs covering `len` characters, all styled with `attrs`.
    pub fn uniform(len: usize, attrs: AttributeSet) -> Self {
        let mut runs = Self::default();
        if len > 0 {
            runs.runs.push(Run { len, attrs });
        }
        runs
    }

    /// Total number of characters covered.
    pub fn len(&self) -> usize {
        self.runs.iter().map(|run| run.len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Attributes of the character at `offset`, if it exists.
    pub fn at(&self, offset: usize) -> Option<&AttributeSet> {
        let mut pos = 0;
        for run in &self.runs {
            if offset < pos + run.len {
                return Some(&run.attrs);
            }
            pos += run.len;
        }
        None
    }

    /// Replace the characters in `range` with `new_len` characters styled `attrs`.
    pub fn replace(&mut self, range: Range<usize>, new_len: usize, attrs: &AttributeSet) {
        let range = self.clamp(range);
        let start = self.split_at(range.start);
        let end = self.split_at(range.end);
        let inserted = (new_len > 0).then(|| Run {
            len: new_len,
            attrs: attrs.clone(),
        });
        self.runs.splice(start..end, inserted);
        self.normalize();
    }

    /// Apply `update` to the attributes of every run inside `range`.
    ///
    /// Runs straddling the range boundary are split first, so each distinct
    /// run inside the range is updated on its own.
    pub fn update(&mut self, range: Range<usize>, mut update: impl FnMut(&mut AttributeSet)) {
        let range = self.clamp(range);
        if range.is_empty() {
            return;
        }
        let start = self.split_at(range.start);
        let end = self.split_at(range.end);
        for run in &mut self.runs[start..end] {
            update(&mut run.attrs);
        }
        self.normalize();
    }

    fn clamp(&self, range: Range<usize>) -> Range<usize> {
        let len = self.len();
        let start = range.start.min(len);
        start..range.end.clamp(start, len)
    }

    /// Split so that a run begins exactly at `offset`; returns its index.
    fn split_at(&mut self, offset: usize) -> usize {
        let mut pos = 0;
        for i in 0..self.runs.len() {
            if pos == offset {
                return i;
            }
            let run_len = self.runs[i].len;
            if offset < pos + run_len {
                let head = offset - pos;
                let tail = Run {
                    len: run_len - head,
                    attrs: self.runs[i].attrs.clone(),
                };
                self.runs[i].len = head;
                self.runs.insert(i + 1, tail);
                return i + 1;
            }
            pos += run_len;
        }
        self.runs.len()
    }

    fn normalize(&mut self) {
        let mut merged: Vec<Run> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if run.len == 0 {
                continue;
            }
            match merged.last_mut() {
                Some(last) if last.attrs == run.attrs => last.len += run.len,
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }
}

//! Selection annotation.
//!
//! Turns the editor's current selection into a line-tagged fragment the
//! transcription side can quote back, e.g.
//!
//! ```text
//! 1: a<highlighted>bc</highlighted>
//! 2: <highlighted>de</highlighted>f
//! ```
//!
//! Offsets count chars in the `\n`-joined document. Lines are half-open
//! `[start, end)` with the separator belonging to neither neighbour.

use std::fmt;

use crate::error::PanelError;

pub const HIGHLIGHT_OPEN: &str = "<highlighted>";
pub const HIGHLIGHT_CLOSE: &str = "</highlighted>";

/// The editor's text as 1-based lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    lines: Vec<String>,
    /// Char offset of each line's first char.
    starts: Vec<usize>,
}

impl Document {
    /// Split on `\n`; a `\r` before the separator is dropped.
    pub fn from_text(text: &str) -> Self {
        let lines: Vec<String> = text
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
            .collect();

        let mut starts = Vec::with_capacity(lines.len());
        let mut offset = 0;
        for line in &lines {
            starts.push(offset);
            offset += line.chars().count() + 1;
        }

        Self { lines, starts }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Length of the flattened document in chars.
    pub fn len(&self) -> usize {
        let last = self.lines.len() - 1;
        self.starts[last] + self.lines[last].chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 1-based line text.
    pub fn line(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .map(String::as_str)
    }

    /// 1-based number of the line containing `offset`. An offset sitting on
    /// a line's end belongs to that line.
    pub fn line_at(&self, offset: usize) -> usize {
        self.starts.partition_point(|&s| s <= offset).max(1)
    }

    /// `[start, end)` char offsets of a 1-based line.
    fn bounds(&self, number: usize) -> (usize, usize) {
        let start = self.starts[number - 1];
        (start, start + self.lines[number - 1].chars().count())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::from_text("")
    }
}

/// Selection as reported by the editor widget; `from <= to`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionRange {
    pub from: usize,
    pub to: usize,
}

impl SelectionRange {
    /// Anchor and head in either order.
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            from: a.min(b),
            to: a.max(b),
        }
    }

    pub fn caret(at: usize) -> Self {
        Self { from: at, to: at }
    }

    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    /// Pull both ends back inside a document of `len` chars.
    pub fn clamp(self, len: usize) -> Self {
        Self {
            from: self.from.min(len),
            to: self.to.min(len),
        }
    }
}

/// One selected line, split around the selected span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedLine {
    pub number: usize,
    pub prefix: String,
    pub selected: String,
    pub suffix: String,
}

impl fmt::Display for AnnotatedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}{}{}{}{}",
            self.number, self.prefix, HIGHLIGHT_OPEN, self.selected, HIGHLIGHT_CLOSE, self.suffix
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotatedFragment {
    pub lines: Vec<AnnotatedLine>,
}

impl AnnotatedFragment {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for AnnotatedFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Annotate every line the selection touches. Lines whose selected part is
/// blank are left out.
pub fn annotate(doc: &Document, range: SelectionRange) -> Result<AnnotatedFragment, PanelError> {
    let len = doc.len();
    if range.from > range.to || range.to > len {
        return Err(PanelError::SelectionOutOfRange {
            from: range.from,
            to: range.to,
            len,
        });
    }

    let first = doc.line_at(range.from);
    let last = doc.line_at(range.to);

    let mut lines = Vec::new();
    for number in first..=last {
        let (line_start, line_end) = doc.bounds(number);
        let sel_start = range.from.max(line_start);
        let sel_end = range.to.min(line_end);

        let text = &doc.lines[number - 1];
        let (prefix, rest) = split_chars(text, sel_start - line_start);
        let (selected, suffix) = split_chars(rest, sel_end.saturating_sub(sel_start));

        if selected.trim().is_empty() {
            continue;
        }

        lines.push(AnnotatedLine {
            number,
            prefix: prefix.to_string(),
            selected: selected.to_string(),
            suffix: suffix.to_string(),
        });
    }

    Ok(AnnotatedFragment { lines })
}

fn split_chars(s: &str, chars: usize) -> (&str, &str) {
    let at = s
        .char_indices()
        .nth(chars)
        .map(|(byte, _)| byte)
        .unwrap_or(s.len());
    s.split_at(at)
}

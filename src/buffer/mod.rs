//! Offset-to-line-number mapping over a text snapshot.
//!
//! The engine's only demand on the host buffer is `line_number_at`. For
//! hosts without a buffer model of their own (the `bandview` demo, the test
//! suite), [`LineIndex`] provides one: line-start offsets of a text
//! snapshot, queried by binary search.

use crate::model::{BufferOffset, LineNumber};

/// Line-start offsets of one immutable text snapshot.
///
/// Built once per snapshot and discarded when the text is superseded,
/// matching the engine's rule that layout data is never carried across
/// snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Offset of the first character of each line. Always starts with 0.
    starts: Vec<usize>,
    /// Total text length in characters.
    len: usize,
}

impl LineIndex {
    /// Index a text snapshot. Lines are separated by `\n`; the separator
    /// belongs to the line it terminates.
    pub fn from_text(text: &str) -> Self {
        let total = text.chars().count();
        let mut starts = vec![0];
        for (i, ch) in text.chars().enumerate() {
            if ch == '\n' && i + 1 < total {
                starts.push(i + 1);
            }
        }
        Self { starts, len: total }
    }

    /// Build directly from line-start offsets.
    ///
    /// # Panics
    /// In debug builds, panics if `starts` is empty, does not begin at 0,
    /// or is not strictly increasing.
    pub fn from_starts(starts: Vec<usize>, len: usize) -> Self {
        debug_assert!(!starts.is_empty(), "a buffer has at least one line");
        debug_assert_eq!(starts[0], 0, "first line starts at offset 0");
        debug_assert!(
            starts.windows(2).all(|w| w[0] < w[1]),
            "line starts must be strictly increasing"
        );
        Self { starts, len }
    }

    /// Number of lines in the snapshot.
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// Total text length in characters.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Map an offset to the 0-based line containing it.
    ///
    /// Offsets past the end of the text clamp to the last line, matching
    /// host buffers that treat end-of-buffer as part of the final line.
    pub fn line_number_at(&self, offset: BufferOffset) -> LineNumber {
        let idx = self.starts.partition_point(|&start| start <= offset.get());
        LineNumber::new(idx.saturating_sub(1))
    }

    /// Offset of the first character of a line, if the line exists.
    pub fn line_start(&self, line: LineNumber) -> Option<BufferOffset> {
        self.starts.get(line.get()).copied().map(BufferOffset::new)
    }

    /// Offset one past the last character of a line, if the line exists.
    pub fn line_end(&self, line: LineNumber) -> Option<BufferOffset> {
        if line.get() >= self.starts.len() {
            return None;
        }
        let end = self
            .starts
            .get(line.get() + 1)
            .copied()
            .unwrap_or(self.len);
        Some(BufferOffset::new(end))
    }
}

//! Whitespace-bounded text chunking
//!
//! A text longer than the fragment bound is cut into contiguous chunks at
//! space characters so that no word is broken. The space at a cut becomes
//! the first character of the following chunk, which keeps the chunks an
//! exact partition of the input.

use crate::error::{CoreError, Result};
use std::iter;

/// The only character chunks are split at
pub const SPLIT_CHAR: char = ' ';

/// A chunk of text with its position in the original
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// The text content
    pub text: &'a str,
    /// Char offset in original text
    pub start: usize,
    /// Char length
    pub len: usize,
}

impl Chunk<'_> {
    /// Exclusive end offset in the original text
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Splits texts into chunks of at most `max_len` chars
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    max_len: usize,
}

impl Chunker {
    /// Create a chunker with the given fragment bound
    pub fn new(max_len: usize) -> Result<Self> {
        if max_len == 0 {
            return Err(CoreError::ZeroFragmentLength);
        }
        Ok(Self { max_len })
    }

    /// The fragment bound in chars
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Whether `text` fits in a single fragment
    pub fn fits(&self, text: &str) -> bool {
        text.chars().count() <= self.max_len
    }

    /// Split `text` into chunk substrings
    pub fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.chunks(text).into_iter().map(|c| c.text).collect()
    }

    /// Split `text` into chunks carrying their offsets
    ///
    /// A chunk only exceeds `max_len` when the word it starts with is
    /// longer than that; the text is then cut at the first space after it,
    /// or not at all if none follows.
    pub fn chunks<'a>(&self, text: &'a str) -> Vec<Chunk<'a>> {
        // Byte offset of every char position, plus the end of the text
        let offsets: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(iter::once(text.len()))
            .collect();
        let total = offsets.len() - 1;

        if total <= self.max_len {
            return vec![Chunk {
                text,
                start: 0,
                len: total,
            }];
        }

        let spaces: Vec<usize> = text
            .chars()
            .enumerate()
            .filter(|&(_, c)| c == SPLIT_CHAR)
            .map(|(i, _)| i)
            .collect();

        let mut chunks = Vec::new();
        let mut start = 0;

        while total - start > self.max_len {
            let Some(end) = next_split(&spaces, start, self.max_len) else {
                break;
            };
            chunks.push(slice(text, &offsets, start, end));
            start = end;
        }

        chunks.push(slice(text, &offsets, start, total));
        chunks
    }
}

/// Pick the split position for a chunk beginning at `start`
///
/// Prefers the rightmost space within `max_len` chars of `start`, then the
/// first space past `start`. `None` means no space follows `start`.
fn next_split(spaces: &[usize], start: usize, max_len: usize) -> Option<usize> {
    let after = &spaces[spaces.partition_point(|&s| s <= start)..];
    let limit = start.saturating_add(max_len);
    let within = after.partition_point(|&s| s <= limit);

    if within > 0 {
        Some(after[within - 1])
    } else {
        after.first().copied()
    }
}

fn slice<'a>(text: &'a str, offsets: &[usize], start: usize, end: usize) -> Chunk<'a> {
    Chunk {
        text: &text[offsets[start]..offsets[end]],
        start,
        len: end - start,
    }
}

/// Split `text` into chunks of at most `max_len` chars at spaces
pub fn split(text: &str, max_len: usize) -> Result<Vec<&str>> {
    Ok(Chunker::new(max_len)?.split(text))
}

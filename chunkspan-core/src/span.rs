//! Annotated spans and annotation sets

use crate::error::{CoreError, Result};
use std::collections::{btree_set, BTreeSet};
use std::fmt;
use std::iter;

/// Canonical identifier of a resolved concept
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ConceptId(String);

impl ConceptId {
    /// Create a concept identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConceptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConceptId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ConceptId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ConceptId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An annotated region of text
///
/// `start` and `length` are char offsets into the text the span was found
/// in. The derived ordering sorts by `(start, length, concept)`, which is
/// also the identity used for deduplication.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Span {
    start: usize,
    length: usize,
    concept: ConceptId,
}

impl Span {
    /// Create a span, rejecting zero-length regions
    pub fn new(start: usize, length: usize, concept: impl Into<ConceptId>) -> Result<Self> {
        if length == 0 {
            return Err(CoreError::EmptySpan { start });
        }

        Ok(Self {
            start,
            length,
            concept: concept.into(),
        })
    }

    /// Start offset in chars
    pub fn start(&self) -> usize {
        self.start
    }

    /// Length in chars, always positive
    pub fn length(&self) -> usize {
        self.length
    }

    /// Exclusive end offset in chars
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    /// Resolved concept
    pub fn concept(&self) -> &ConceptId {
        &self.concept
    }

    /// The same span moved `offset` chars to the right
    pub fn shifted(&self, offset: usize) -> Self {
        Self {
            start: self.start + offset,
            length: self.length,
            concept: self.concept.clone(),
        }
    }

    /// Whether the span lies inside a text of `text_len` chars
    pub fn fits_within(&self, text_len: usize) -> bool {
        self.end() <= text_len
    }

    /// The covered substring of `text`, or `None` if the span runs past its end
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        let mut positions = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(iter::once(text.len()));

        let begin = positions.nth(self.start)?;
        let end = positions.nth(self.length - 1)?;
        Some(&text[begin..end])
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}+{}] {}", self.start, self.length, self.concept)
    }
}

/// A deduplicated collection of spans over one text
///
/// Iteration order is deterministic (sorted by start, length, concept).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AnnotationSet {
    spans: BTreeSet<Span>,
}

impl AnnotationSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a span, returning `false` if an identical one was present
    pub fn insert(&mut self, span: Span) -> bool {
        self.spans.insert(span)
    }

    /// Whether an identical span is present
    pub fn contains(&self, span: &Span) -> bool {
        self.spans.contains(span)
    }

    /// Number of distinct spans
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Whether the set holds no spans
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Iterate spans in sorted order
    pub fn iter(&self) -> btree_set::Iter<'_, Span> {
        self.spans.iter()
    }

    /// Consume the set into a sorted vector
    pub fn into_vec(self) -> Vec<Span> {
        self.spans.into_iter().collect()
    }
}

impl Extend<Span> for AnnotationSet {
    fn extend<I: IntoIterator<Item = Span>>(&mut self, iter: I) {
        self.spans.extend(iter);
    }
}

impl FromIterator<Span> for AnnotationSet {
    fn from_iter<I: IntoIterator<Item = Span>>(iter: I) -> Self {
        Self {
            spans: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for AnnotationSet {
    type Item = Span;
    type IntoIter = btree_set::IntoIter<Span>;

    fn into_iter(self) -> Self::IntoIter {
        self.spans.into_iter()
    }
}

impl<'a> IntoIterator for &'a AnnotationSet {
    type Item = &'a Span;
    type IntoIter = btree_set::Iter<'a, Span>;

    fn into_iter(self) -> Self::IntoIter {
        self.spans.iter()
    }
}

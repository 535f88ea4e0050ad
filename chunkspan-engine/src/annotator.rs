//! Collaborator ports: the annotation service and concept resolution
//!
//! Both are injected into the reconciler, so tests can substitute plain
//! closures for a remote service.

use crate::error::AnnotatorError;
use chunkspan_core::ConceptId;
use std::collections::HashMap;

/// An unresolved annotation as returned by the service
///
/// Offsets are chars relative to the fragment that was submitted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawAnnotation {
    /// Start offset within the fragment
    pub start: usize,
    /// Length in chars
    pub length: usize,
    /// Service-specific concept reference
    pub reference: String,
}

impl RawAnnotation {
    /// Create a raw annotation
    pub fn new(start: usize, length: usize, reference: impl Into<String>) -> Self {
        Self {
            start,
            length,
            reference: reference.into(),
        }
    }
}

/// What an annotator returns for one fragment
pub type AnnotationResult = Result<Vec<RawAnnotation>, AnnotatorError>;

/// A length-limited annotation service
pub trait Annotator: Send + Sync {
    /// Human-readable name of the service
    fn name(&self) -> &str {
        "annotator"
    }

    /// Annotate one fragment
    fn annotate(&self, fragment: &str) -> AnnotationResult;
}

impl<F> Annotator for F
where
    F: Fn(&str) -> AnnotationResult + Send + Sync,
{
    fn annotate(&self, fragment: &str) -> AnnotationResult {
        self(fragment)
    }
}

/// Maps service references to canonical concept identifiers
pub trait ConceptResolver: Send + Sync {
    /// Resolve a reference, or `None` if it has no canonical identifier
    fn resolve(&self, reference: &str) -> Option<ConceptId>;
}

impl<F> ConceptResolver for F
where
    F: Fn(&str) -> Option<ConceptId> + Send + Sync,
{
    fn resolve(&self, reference: &str) -> Option<ConceptId> {
        self(reference)
    }
}

/// Treats every non-empty reference as its own canonical identifier
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityResolver;

impl ConceptResolver for IdentityResolver {
    fn resolve(&self, reference: &str) -> Option<ConceptId> {
        if reference.is_empty() {
            None
        } else {
            Some(ConceptId::new(reference))
        }
    }
}

/// Lookup table from references to canonical identifiers
#[derive(Debug, Clone, Default)]
pub struct TableResolver {
    table: HashMap<String, ConceptId>,
}

impl TableResolver {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a mapping
    pub fn insert(&mut self, reference: impl Into<String>, concept: impl Into<ConceptId>) {
        self.table.insert(reference.into(), concept.into());
    }

    /// Number of known references
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl<R, C> FromIterator<(R, C)> for TableResolver
where
    R: Into<String>,
    C: Into<ConceptId>,
{
    fn from_iter<I: IntoIterator<Item = (R, C)>>(iter: I) -> Self {
        Self {
            table: iter
                .into_iter()
                .map(|(r, c)| (r.into(), c.into()))
                .collect(),
        }
    }
}

impl ConceptResolver for TableResolver {
    fn resolve(&self, reference: &str) -> Option<ConceptId> {
        self.table.get(reference).cloned()
    }
}

//! Result assembly module
//!
//! Turns per-chunk outcomes into one annotation set in the coordinates of
//! the original text.

use crate::{
    annotator::{ConceptResolver, RawAnnotation},
    error::{EngineError, Result},
    executor::ChunkOutcome,
};
use chunkspan_core::{AnnotationSet, Chunk, Span};
use log::{debug, error, warn};

/// Merged spans plus what was discarded along the way
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assembly {
    /// Resolved, translated, deduplicated spans
    pub spans: AnnotationSet,
    /// Chunks whose request failed transiently
    pub failed_chunks: Vec<usize>,
    /// Raw annotations whose reference did not resolve
    pub unresolved: usize,
    /// Raw annotations with no extent or outside their fragment
    pub invalid: usize,
    /// Spans that collapsed into an identical one
    pub duplicates: usize,
}

/// Assembler for combining per-chunk results
#[derive(Debug, Default)]
pub struct ResultAssembler;

impl ResultAssembler {
    /// Create a new result assembler
    pub fn new() -> Self {
        Self
    }

    /// Assemble outcomes, which must be in the same order as `chunks`
    ///
    /// Returns the first fatal failure instead of a partial set.
    pub fn assemble(
        &self,
        chunks: &[Chunk<'_>],
        outcomes: Vec<ChunkOutcome>,
        resolver: &dyn ConceptResolver,
    ) -> Result<Assembly> {
        let mut assembly = Assembly::default();
        let mut base_offset = 0;

        for (index, (chunk, outcome)) in chunks.iter().zip(outcomes).enumerate() {
            debug_assert_eq!(base_offset, chunk.start);

            match outcome {
                ChunkOutcome::Annotated(raw) => {
                    for annotation in raw {
                        self.add(&mut assembly, annotation, chunk, base_offset, resolver)?;
                    }
                }
                ChunkOutcome::Failed(err) if err.is_fatal() => {
                    error!("chunk {index} failed fatally, aborting request: {err}");
                    return Err(EngineError::Fatal {
                        chunk: index,
                        source: err,
                    });
                }
                ChunkOutcome::Failed(err) => {
                    warn!(
                        "chunk {index} ({} chars at offset {}) failed, continuing without it: {err}",
                        chunk.len, chunk.start
                    );
                    assembly.failed_chunks.push(index);
                }
                ChunkOutcome::Skipped => {
                    debug!("chunk {index} was not requested");
                    assembly.failed_chunks.push(index);
                }
            }

            base_offset += chunk.len;
        }

        Ok(assembly)
    }

    fn add(
        &self,
        assembly: &mut Assembly,
        annotation: RawAnnotation,
        chunk: &Chunk<'_>,
        base_offset: usize,
        resolver: &dyn ConceptResolver,
    ) -> Result<()> {
        let in_bounds = annotation
            .start
            .checked_add(annotation.length)
            .is_some_and(|end| end <= chunk.len);
        if annotation.length == 0 || !in_bounds {
            warn!(
                "dropping annotation {}+{} outside its {}-char fragment",
                annotation.start, annotation.length, chunk.len
            );
            assembly.invalid += 1;
            return Ok(());
        }

        let Some(concept) = resolver.resolve(&annotation.reference) else {
            debug!("dropping unresolved reference {}", annotation.reference);
            assembly.unresolved += 1;
            return Ok(());
        };

        let span = Span::new(annotation.start, annotation.length, concept)?.shifted(base_offset);
        if !assembly.spans.insert(span) {
            assembly.duplicates += 1;
        }
        Ok(())
    }
}

//! Reconciler and builder
//!
//! The reconciler is the entry point of the engine: it chunks a text,
//! requests annotations per chunk and merges them into one set over the
//! original text.

use crate::{
    annotator::{Annotator, ConceptResolver},
    assembler::ResultAssembler,
    config::EngineConfig,
    dispatcher::AdaptiveDispatcher,
    error::Result,
    executor::ExecutionMode,
};
use chunkspan_core::{AnnotationSet, Chunker};
use log::debug;
use std::fmt;
use std::time::{Duration, Instant};

/// Counters and timing for one reconciliation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationReport {
    /// Name of the annotator that served the request
    pub annotator: String,
    /// Number of chunks the text was split into
    pub chunks: usize,
    /// Indices of chunks that contributed nothing because their request failed
    pub failed_chunks: Vec<usize>,
    /// Annotations dropped because their reference did not resolve
    pub unresolved: usize,
    /// Annotations dropped for lying outside their fragment
    pub invalid: usize,
    /// Spans merged into an identical one
    pub duplicates: usize,
    /// Execution mode actually used
    pub mode_used: ExecutionMode,
    /// Wall-clock time of the call
    pub elapsed: Duration,
}

impl fmt::Display for AnnotationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} chunk(s), {} failed, {} unresolved, {} invalid, {} duplicate(s), {} mode, {:.1} ms",
            self.annotator,
            self.chunks,
            self.failed_chunks.len(),
            self.unresolved,
            self.invalid,
            self.duplicates,
            self.mode_used.as_str(),
            self.elapsed.as_secs_f64() * 1000.0
        )
    }
}

/// Spans with the report of the call that produced them
#[derive(Debug, Clone)]
pub struct Annotated {
    /// Merged spans over the original text
    pub spans: AnnotationSet,
    /// What happened during the call
    pub report: AnnotationReport,
}

/// Annotates texts of any length through a length-limited annotator
pub struct Reconciler<A, R> {
    annotator: A,
    resolver: R,
    chunker: Chunker,
    dispatcher: AdaptiveDispatcher,
    assembler: ResultAssembler,
}

impl<A: Annotator, R: ConceptResolver> Reconciler<A, R> {
    /// Create a reconciler with the given collaborators and configuration
    pub fn new(annotator: A, resolver: R, config: EngineConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            annotator,
            resolver,
            chunker: Chunker::new(config.max_fragment_length)?,
            dispatcher: AdaptiveDispatcher::new(&config)?,
            assembler: ResultAssembler::new(),
        })
    }

    /// Annotate `text`, returning spans in its coordinates
    pub fn annotate(&self, text: &str) -> Result<AnnotationSet> {
        Ok(self.annotate_with_report(text)?.spans)
    }

    /// Annotate `text` and report what was dropped or failed
    pub fn annotate_with_report(&self, text: &str) -> Result<Annotated> {
        let start_time = Instant::now();
        let chunks = self.chunker.chunks(text);
        let (outcomes, mode_used) = self.dispatcher.dispatch(&chunks, &self.annotator);
        debug!(
            "{} chunk(s) of at most {} chars dispatched to {} ({})",
            chunks.len(),
            self.chunker.max_len(),
            self.annotator.name(),
            mode_used.as_str()
        );

        let assembly = self
            .assembler
            .assemble(&chunks, outcomes, &self.resolver)?;

        let mut report = self.report(chunks.len(), mode_used, start_time);
        report.failed_chunks = assembly.failed_chunks;
        report.unresolved = assembly.unresolved;
        report.invalid = assembly.invalid;
        report.duplicates = assembly.duplicates;

        Ok(Annotated {
            spans: assembly.spans,
            report,
        })
    }

    /// The fragment bound in chars
    pub fn max_fragment_length(&self) -> usize {
        self.chunker.max_len()
    }

    /// The injected annotator
    pub fn annotator(&self) -> &A {
        &self.annotator
    }

    fn report(&self, chunks: usize, mode_used: ExecutionMode, start: Instant) -> AnnotationReport {
        AnnotationReport {
            annotator: self.annotator.name().to_string(),
            chunks,
            failed_chunks: Vec::new(),
            unresolved: 0,
            invalid: 0,
            duplicates: 0,
            mode_used,
            elapsed: start.elapsed(),
        }
    }
}

/// Builder for Reconciler
///
/// Provides a fluent interface for configuring the engine before the
/// collaborators are supplied.
#[derive(Debug, Default)]
pub struct ReconcilerBuilder {
    config: EngineConfig,
}

impl ReconcilerBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Set the fragment bound
    pub fn max_fragment_length(mut self, max_fragment_length: usize) -> Self {
        self.config.max_fragment_length = max_fragment_length;
        self
    }

    /// Set the execution mode
    pub fn execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.config.execution_mode = mode;
        self
    }

    /// Set the thread count
    pub fn threads(mut self, threads: Option<usize>) -> Self {
        self.config.threads = threads;
        self
    }

    /// Build the reconciler
    pub fn build<A: Annotator, R: ConceptResolver>(
        self,
        annotator: A,
        resolver: R,
    ) -> Result<Reconciler<A, R>> {
        Reconciler::new(annotator, resolver, self.config)
    }
}

/// Annotate `text` once, sequentially, with fragments of at most `max_len` chars
pub fn annotate<A: Annotator, R: ConceptResolver>(
    text: &str,
    max_len: usize,
    annotator: A,
    resolver: R,
) -> Result<AnnotationSet> {
    let config = EngineConfig::sequential().with_max_fragment_length(max_len);
    Reconciler::new(annotator, resolver, config)?.annotate(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        annotator::{AnnotationResult, IdentityResolver, RawAnnotation},
        error::{AnnotatorError, EngineError},
    };
    use chunkspan_core::{ConceptId, CoreError, Span};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn first_word(fragment: &str) -> AnnotationResult {
        let offset = fragment.len() - fragment.trim_start().len();
        let word = fragment.trim_start().split(' ').next().unwrap_or("");
        if word.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![RawAnnotation::new(offset, word.chars().count(), word)])
    }

    #[test]
    fn test_short_text_single_call() {
        let calls = AtomicUsize::new(0);
        let annotator = |fragment: &str| {
            calls.fetch_add(1, Ordering::SeqCst);
            first_word(fragment)
        };

        let reconciler = ReconcilerBuilder::new()
            .max_fragment_length(100)
            .build(annotator, IdentityResolver)
            .unwrap();
        let spans = reconciler.annotate("Bozeman Public Library").unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(spans.into_vec(), vec![Span::new(0, 7, "Bozeman").unwrap()]);
    }

    #[test]
    fn test_spans_translated_per_chunk() {
        let spans = annotate("AAAA BBBB CCCC DDDD", 9, first_word, IdentityResolver).unwrap();

        let expected: AnnotationSet = [(0, "AAAA"), (10, "CCCC"), (15, "DDDD")]
            .into_iter()
            .map(|(start, word)| Span::new(start, 4, word).unwrap())
            .collect();
        assert_eq!(spans, expected);
    }

    #[test]
    fn test_empty_text_sent_once() {
        let calls = AtomicUsize::new(0);
        let annotator = |fragment: &str| -> AnnotationResult {
            calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(fragment, "");
            Ok(vec![RawAnnotation::new(0, 1, "phantom")])
        };

        let reconciler = Reconciler::new(annotator, IdentityResolver, EngineConfig::default())
            .unwrap();
        let annotated = reconciler.annotate_with_report("").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(annotated.spans.is_empty());
        assert_eq!(annotated.report.chunks, 1);
        assert_eq!(annotated.report.invalid, 1);
    }

    #[test]
    fn test_empty_text_fatal_error_propagates() {
        let annotator =
            |_: &str| -> AnnotationResult { Err(AnnotatorError::Unauthorized("bad key".into())) };

        let result = annotate("", 10, annotator, IdentityResolver);
        assert!(matches!(result, Err(EngineError::Fatal { chunk: 0, .. })));
    }

    #[test]
    fn test_report_counts() {
        let annotator = |fragment: &str| -> AnnotationResult {
            if fragment.contains("BBBB") {
                return Err(AnnotatorError::Transient("timed out".into()));
            }
            let mut raw = first_word(fragment)?;
            raw.push(RawAnnotation::new(0, 99, "too-long"));
            raw.push(RawAnnotation::new(0, 1, "unknown"));
            Ok(raw)
        };
        let resolver = |reference: &str| match reference {
            "unknown" => None,
            other => Some(ConceptId::new(other)),
        };

        let reconciler = ReconcilerBuilder::with_config(EngineConfig::sequential())
            .max_fragment_length(5)
            .build(annotator, resolver)
            .unwrap();
        let annotated = reconciler
            .annotate_with_report("AAAA BBBB CCCC")
            .unwrap();

        let report = &annotated.report;
        assert_eq!(report.chunks, 3);
        assert_eq!(report.failed_chunks, vec![1]);
        assert_eq!(report.invalid, 2);
        assert_eq!(report.unresolved, 2);
        assert_eq!(report.mode_used, ExecutionMode::Sequential);
        assert_eq!(annotated.spans.len(), 2);
        assert!(report.to_string().starts_with("annotator: 3 chunk(s), 1 failed"));
    }

    #[test]
    fn test_fatal_error_propagates() {
        let annotator = |_: &str| -> AnnotationResult {
            Err(AnnotatorError::Unauthorized("invalid key".into()))
        };

        let err = annotate("short", 10, annotator, IdentityResolver).unwrap_err();
        assert!(matches!(err, EngineError::Fatal { chunk: 0, .. }));
    }

    #[test]
    fn test_zero_fragment_length_rejected() {
        let err = annotate("text", 0, first_word, IdentityResolver).unwrap_err();
        assert!(matches!(err, EngineError::ConfigError(_)));

        let err = Chunker::new(0).unwrap_err();
        assert_eq!(err, CoreError::ZeroFragmentLength);
    }
}

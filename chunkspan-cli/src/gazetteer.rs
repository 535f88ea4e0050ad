//! Local gazetteer annotator
//!
//! A gazetteer is a TOML list of surface forms and the references they
//! link to. It behaves like a remote annotation service: it answers one
//! fragment at a time with fragment-local char offsets, and can be given a
//! request budget after which it reports `QuotaExceeded`.

use crate::error::CliError;
use anyhow::{Context, Result};
use chunkspan_engine::{
    AnnotationResult, Annotator, AnnotatorError, ConceptId, ConceptResolver, IdentityResolver,
    RawAnnotation, TableResolver,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Gazetteer file contents
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GazetteerSpec {
    /// Annotator name shown in reports
    #[serde(default = "default_name")]
    pub name: String,

    /// Number of requests answered before the quota is exhausted
    #[serde(default)]
    pub max_requests: Option<usize>,

    /// Surface forms and their references
    #[serde(default)]
    pub entries: Vec<Entry>,

    /// Reference to canonical concept mapping
    #[serde(default)]
    pub concepts: BTreeMap<String, String>,
}

/// One gazetteer entry
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Entry {
    /// Text matched in the fragment
    pub surface: String,
    /// Reference reported for a match
    pub reference: String,
}

fn default_name() -> String {
    "gazetteer".to_string()
}

impl GazetteerSpec {
    /// Load and validate a gazetteer file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read gazetteer: {}", path.display()))?;
        let spec = Self::from_toml(&content)
            .with_context(|| format!("Invalid gazetteer: {}", path.display()))?;
        Ok(spec)
    }

    /// Parse and validate gazetteer TOML
    pub fn from_toml(content: &str) -> Result<Self, CliError> {
        let spec: Self =
            toml::from_str(content).map_err(|e| CliError::GazetteerError(e.to_string()))?;
        spec.validate()?;
        Ok(spec)
    }

    /// Check entries for empty or conflicting surfaces
    pub fn validate(&self) -> Result<(), CliError> {
        if self.name.trim().is_empty() {
            return Err(CliError::GazetteerError("name must not be empty".into()));
        }

        let mut seen: HashMap<&str, &str> = HashMap::new();
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.surface.is_empty() {
                return Err(CliError::GazetteerError(format!(
                    "entry {index} has an empty surface"
                )));
            }
            if entry.reference.is_empty() {
                return Err(CliError::GazetteerError(format!(
                    "entry {index} ('{}') has an empty reference",
                    entry.surface
                )));
            }
            match seen.insert(&entry.surface, &entry.reference) {
                Some(previous) if previous != entry.reference => {
                    return Err(CliError::GazetteerError(format!(
                        "surface '{}' links to both '{previous}' and '{}'",
                        entry.surface, entry.reference
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Split into the annotator and the resolver it pairs with
    pub fn build(self) -> Result<(Gazetteer, GazetteerResolver), CliError> {
        let resolver = if self.concepts.is_empty() {
            GazetteerResolver::Identity(IdentityResolver)
        } else {
            GazetteerResolver::Table(self.concepts.into_iter().collect())
        };

        let gazetteer = Gazetteer::new(self.name, self.entries, self.max_requests)?;
        Ok((gazetteer, resolver))
    }
}

/// Annotator matching known surfaces at word boundaries
#[derive(Debug)]
pub struct Gazetteer {
    name: String,
    pattern: Option<Regex>,
    references: HashMap<String, String>,
    max_requests: Option<usize>,
    requests: AtomicUsize,
}

impl Gazetteer {
    /// Build the matcher from entries
    pub fn new(
        name: impl Into<String>,
        entries: Vec<Entry>,
        max_requests: Option<usize>,
    ) -> Result<Self, CliError> {
        let references: HashMap<String, String> = entries
            .into_iter()
            .map(|e| (e.surface, e.reference))
            .collect();

        Ok(Self {
            name: name.into(),
            pattern: build_pattern(references.keys())?,
            references,
            max_requests,
            requests: AtomicUsize::new(0),
        })
    }

    /// Number of distinct surfaces
    pub fn len(&self) -> usize {
        self.references.len()
    }

    /// Whether no surface is known
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Requests received so far, including rejected ones
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

/// Longest surfaces first so the alternation prefers the longest match
fn build_pattern<'a>(
    surfaces: impl Iterator<Item = &'a String>,
) -> Result<Option<Regex>, CliError> {
    let mut surfaces: Vec<&String> = surfaces.collect();
    if surfaces.is_empty() {
        return Ok(None);
    }
    surfaces.sort_by(|a, b| {
        b.chars()
            .count()
            .cmp(&a.chars().count())
            .then_with(|| a.cmp(b))
    });

    let alternatives: Vec<String> = surfaces.iter().map(|s| bounded(s)).collect();
    let pattern = alternatives.join("|");
    Regex::new(&pattern)
        .map(Some)
        .map_err(|e| CliError::GazetteerError(e.to_string()))
}

/// `\b` only makes sense next to a word character
fn bounded(surface: &str) -> String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let mut alternative = String::new();
    if surface.chars().next().is_some_and(is_word) {
        alternative.push_str(r"\b");
    }
    alternative.push_str(&regex::escape(surface));
    if surface.chars().last().is_some_and(is_word) {
        alternative.push_str(r"\b");
    }
    alternative
}

impl Annotator for Gazetteer {
    fn name(&self) -> &str {
        &self.name
    }

    fn annotate(&self, fragment: &str) -> AnnotationResult {
        let served = self.requests.fetch_add(1, Ordering::SeqCst);
        if let Some(limit) = self.max_requests {
            if served >= limit {
                return Err(AnnotatorError::QuotaExceeded(format!(
                    "request budget of {limit} reached"
                )));
            }
        }

        let Some(pattern) = &self.pattern else {
            return Ok(Vec::new());
        };

        let annotations = pattern
            .find_iter(fragment)
            .filter_map(|m| {
                let reference = self.references.get(m.as_str())?;
                Some(RawAnnotation::new(
                    fragment[..m.start()].chars().count(),
                    m.as_str().chars().count(),
                    reference.clone(),
                ))
            })
            .collect();
        Ok(annotations)
    }
}

/// Resolver chosen by whether the gazetteer carries a concept table
#[derive(Debug, Clone)]
pub enum GazetteerResolver {
    /// References are canonical already
    Identity(IdentityResolver),
    /// References map through the `[concepts]` table
    Table(TableResolver),
}

impl ConceptResolver for GazetteerResolver {
    fn resolve(&self, reference: &str) -> Option<ConceptId> {
        match self {
            GazetteerResolver::Identity(resolver) => resolver.resolve(reference),
            GazetteerResolver::Table(resolver) => resolver.resolve(reference),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
name = "montana"

[[entries]]
surface = "Bozeman"
reference = "Bozeman"

[[entries]]
surface = "Bozeman Public Library"
reference = "Bozeman_Public_Library"

[[entries]]
surface = "KXLB"
reference = "KXLB"

[concepts]
Bozeman = "http://dbpedia.org/resource/Bozeman,_Montana"
KXLB = "http://dbpedia.org/resource/KXLB"
"#;

    fn refs(annotations: &[RawAnnotation]) -> Vec<(usize, usize, &str)> {
        annotations
            .iter()
            .map(|a| (a.start, a.length, a.reference.as_str()))
            .collect()
    }

    #[test]
    fn test_parse_sample() {
        let spec = GazetteerSpec::from_toml(SAMPLE).unwrap();
        assert_eq!(spec.name, "montana");
        assert_eq!(spec.entries.len(), 3);
        assert_eq!(spec.concepts.len(), 2);
        assert_eq!(spec.max_requests, None);
    }

    #[test]
    fn test_longest_surface_wins() {
        let (gazetteer, _) = GazetteerSpec::from_toml(SAMPLE).unwrap().build().unwrap();
        let found = gazetteer
            .annotate("to the Bozeman Public Library in Bozeman")
            .unwrap();

        assert_eq!(
            refs(&found),
            vec![(7, 22, "Bozeman_Public_Library"), (33, 7, "Bozeman")]
        );
    }

    #[test]
    fn test_word_boundaries() {
        let (gazetteer, _) = GazetteerSpec::from_toml(SAMPLE).unwrap().build().unwrap();
        assert!(gazetteer.annotate("KXLBX and XKXLB").unwrap().is_empty());
        assert_eq!(refs(&gazetteer.annotate("KXLB: news").unwrap()), vec![(0, 4, "KXLB")]);
    }

    #[test]
    fn test_offsets_are_chars() {
        let gazetteer = Gazetteer::new(
            "test",
            vec![Entry {
                surface: "Zürich".into(),
                reference: "Zurich".into(),
            }],
            None,
        )
        .unwrap();

        let found = gazetteer.annotate("über Zürich").unwrap();
        assert_eq!(refs(&found), vec![(5, 6, "Zurich")]);
    }

    #[test]
    fn test_surface_with_symbol_edges() {
        let gazetteer = Gazetteer::new(
            "test",
            vec![Entry {
                surface: "@superjaberwocky".into(),
                reference: "user".into(),
            }],
            None,
        )
        .unwrap();

        let found = gazetteer.annotate("RT @superjaberwocky: hi").unwrap();
        assert_eq!(refs(&found), vec![(3, 16, "user")]);
    }

    #[test]
    fn test_request_budget() {
        let mut spec = GazetteerSpec::from_toml(SAMPLE).unwrap();
        spec.max_requests = Some(2);
        let (gazetteer, _) = spec.build().unwrap();

        assert!(gazetteer.annotate("one").is_ok());
        assert!(gazetteer.annotate("two").is_ok());
        let err = gazetteer.annotate("three").unwrap_err();
        assert!(matches!(err, AnnotatorError::QuotaExceeded(_)));
        assert!(err.is_fatal());
        assert_eq!(gazetteer.requests(), 3);
    }

    #[test]
    fn test_resolver_selection() {
        let (_, resolver) = GazetteerSpec::from_toml(SAMPLE).unwrap().build().unwrap();
        assert!(matches!(resolver, GazetteerResolver::Table(_)));
        assert_eq!(
            resolver.resolve("KXLB"),
            Some(ConceptId::new("http://dbpedia.org/resource/KXLB"))
        );
        assert_eq!(resolver.resolve("Bozeman_Public_Library"), None);

        let bare = r#"
[[entries]]
surface = "Bozeman"
reference = "Bozeman"
"#;
        let (gazetteer, resolver) = GazetteerSpec::from_toml(bare).unwrap().build().unwrap();
        assert_eq!(gazetteer.name(), "gazetteer");
        assert!(matches!(resolver, GazetteerResolver::Identity(_)));
        assert_eq!(resolver.resolve("Bozeman"), Some(ConceptId::new("Bozeman")));
    }

    #[test]
    fn test_empty_gazetteer_matches_nothing() {
        let (gazetteer, _) = GazetteerSpec::from_toml("name = \"empty\"")
            .unwrap()
            .build()
            .unwrap();
        assert!(gazetteer.is_empty());
        assert!(gazetteer.annotate("anything at all").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_entries_rejected() {
        let empty_surface = r#"
[[entries]]
surface = ""
reference = "x"
"#;
        assert!(matches!(
            GazetteerSpec::from_toml(empty_surface),
            Err(CliError::GazetteerError(_))
        ));

        let conflict = r#"
[[entries]]
surface = "Paris"
reference = "Paris_France"

[[entries]]
surface = "Paris"
reference = "Paris_Texas"
"#;
        let err = GazetteerSpec::from_toml(conflict).unwrap_err();
        assert!(err.to_string().contains("links to both"));

        assert!(GazetteerSpec::from_toml("entries = 3").is_err());
    }
}

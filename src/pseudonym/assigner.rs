//! Pseudonym assignment
//!
//! [`PseudonymAssigner`] turns each [`NameOccurrence`] into a pseudonym and
//! remembers the result, so every occurrence of the same (normalized) name in a
//! run receives the same replacement. Tokens come from the [`NameCatalog`] when it
//! has a matching bucket and from the [`AlgorithmicGenerator`] otherwise; the
//! [`FormatPreserver`] rebuilds them in the original's surface pattern.
//!
//! # Examples
//!
//! ```
//! use pseudonymizer::domain::{Gender, NameOccurrence, NameRole};
//! use pseudonymizer::pseudonym::{AlgorithmicGenerator, NameCatalog, PseudonymAssigner};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let catalog = NameCatalog::empty(StdRng::seed_from_u64(1));
//! let generator = AlgorithmicGenerator::new(StdRng::seed_from_u64(2));
//! let mut assigner = PseudonymAssigner::new(catalog, generator);
//!
//! let occurrence = NameOccurrence::new(
//!     "John Smith",
//!     Gender::Male,
//!     vec![NameRole::Given, NameRole::Family],
//! );
//! let first = assigner.assign(&occurrence)?;
//! let second = assigner.assign(&occurrence)?;
//! assert_eq!(first, second);
//! # Ok::<(), pseudonymizer::domain::PseudonymError>(())
//! ```

use crate::domain::{Gender, NameOccurrence, PseudonymError, Result};
use crate::pseudonym::catalog::NameCatalog;
use crate::pseudonym::format::{FormatPreserver, NameTemplate};
use crate::pseudonym::generator::AlgorithmicGenerator;
use crate::pseudonym::mapping::{normalize_key, PseudonymMapping};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};

/// Attempts at drawing a pseudonym that differs from the original name
const MAX_ATTEMPTS: usize = 5;

/// Counters collected while assigning
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentStats {
    /// New mapping entries created
    pub assigned: usize,
    /// Occurrences answered from the mapping
    pub cache_hits: usize,
    /// Tokens drawn from the catalog
    pub catalog_tokens: usize,
    /// Tokens produced by the generator
    pub generated_tokens: usize,
    /// Occurrences rejected as invalid
    pub invalid_occurrences: usize,
}

/// Assigns and remembers pseudonyms for one run
pub struct PseudonymAssigner {
    catalog: NameCatalog,
    generator: AlgorithmicGenerator,
    format: FormatPreserver,
    mapping: PseudonymMapping,
    forced_gender: Option<Gender>,
    match_length: bool,
    stats: AssignmentStats,
}

impl PseudonymAssigner {
    pub fn new(catalog: NameCatalog, generator: AlgorithmicGenerator) -> Self {
        Self {
            catalog,
            generator,
            format: FormatPreserver::new(),
            mapping: PseudonymMapping::new(),
            forced_gender: None,
            match_length: true,
            stats: AssignmentStats::default(),
        }
    }

    /// Start from an existing mapping (e.g. loaded from a previous run)
    pub fn with_mapping(mut self, mapping: PseudonymMapping) -> Self {
        self.mapping = mapping;
        self
    }

    /// Use `gender` for every occurrence regardless of what the detector reported
    pub fn with_forced_gender(mut self, gender: Option<Gender>) -> Self {
        self.forced_gender = gender;
        self
    }

    /// Ask the generator for tokens as long as the original ones
    pub fn with_length_matching(mut self, enabled: bool) -> Self {
        self.match_length = enabled;
        self
    }

    /// Pseudonym for `occurrence`, assigning one on first sight
    ///
    /// # Errors
    ///
    /// Returns [`PseudonymError::InvalidOccurrence`] if the occurrence has an
    /// empty token shape. Nothing is stored in that case.
    pub fn assign(&mut self, occurrence: &NameOccurrence) -> Result<String> {
        if occurrence.token_shape.is_empty() {
            self.stats.invalid_occurrences += 1;
            return Err(PseudonymError::InvalidOccurrence(format!(
                "empty token shape for a {}-character name",
                occurrence.original_text.chars().count()
            )));
        }

        if let Some(existing) = self.mapping.get(&occurrence.original_text) {
            self.stats.cache_hits += 1;
            return Ok(existing.to_string());
        }

        let gender = self.forced_gender.unwrap_or(occurrence.gender);
        let template = self.format.template(&occurrence.original_text);
        let key = normalize_key(&occurrence.original_text);

        // Tokens of rejected candidates, steered away from on the next draw
        let mut avoid: Vec<String> = Vec::new();
        let mut candidate = self.compose(occurrence, gender, &template, &avoid);
        let mut attempts = 1;
        while attempts < MAX_ATTEMPTS && self.is_unusable(&candidate, &key) {
            tracing::debug!(attempt = attempts, "Pseudonym matched the original or is taken, redrawing");
            avoid.extend(
                candidate
                    .split(|c: char| !c.is_alphabetic())
                    .filter(|t| !t.is_empty())
                    .map(str::to_string),
            );
            candidate = self.compose(occurrence, gender, &template, &avoid);
            attempts += 1;
        }
        if normalize_key(&candidate) == key {
            tracing::debug!(
                attempts = attempts,
                "Catalog only offers the original tokens, generating every token"
            );
            candidate = self.compose_generated(occurrence, gender, &template);
        } else if self.mapping.has_pseudonym(&candidate) {
            tracing::debug!(attempts = attempts, "Catalog exhausted, reusing a pseudonym");
        }

        self.stats.assigned += 1;
        tracing::trace!(
            gender = %gender,
            tokens = occurrence.token_shape.len(),
            "Assigned new pseudonym"
        );
        Ok(self
            .mapping
            .insert_once(&occurrence.original_text, candidate)
            .to_string())
    }

    /// Equal to the original, or already given to another name
    fn is_unusable(&self, candidate: &str, key: &str) -> bool {
        normalize_key(candidate) == key || self.mapping.has_pseudonym(candidate)
    }

    /// Draw one token per role and rebuild them in the original's pattern
    fn compose(
        &mut self,
        occurrence: &NameOccurrence,
        gender: Gender,
        template: &NameTemplate,
        avoid: &[String],
    ) -> String {
        let mut drawn: Vec<String> = Vec::with_capacity(occurrence.token_shape.len());
        // Never hand back the original tokens while the catalog has alternatives.
        let mut exclude: Vec<String> = template.tokens.iter().map(|t| t.text.clone()).collect();
        exclude.extend_from_slice(avoid);

        for (i, role) in occurrence.token_shape.iter().enumerate() {
            let target_length = if self.match_length {
                template.tokens.get(i).map(|t| t.text.chars().count())
            } else {
                None
            };

            let token = match self.catalog.lookup_excluding(gender, *role, &exclude) {
                Ok(record) => {
                    self.stats.catalog_tokens += 1;
                    record.text
                }
                Err(e) => {
                    tracing::trace!(reason = %e, "Falling back to generated name");
                    self.stats.generated_tokens += 1;
                    self.generator.generate(gender, *role, target_length)
                }
            };
            exclude.push(token.clone());
            drawn.push(token);
        }

        let generator = &mut self.generator;
        let stats = &mut self.stats;
        self.format.apply_casing(template, &drawn, |role, length| {
            stats.generated_tokens += 1;
            generator.generate(gender, role, Some(length))
        })
    }

    /// Like [`compose`](Self::compose) without consulting the catalog
    fn compose_generated(&mut self, occurrence: &NameOccurrence, gender: Gender, template: &NameTemplate) -> String {
        let drawn: Vec<String> = occurrence
            .token_shape
            .iter()
            .enumerate()
            .map(|(i, role)| {
                let length = template.tokens.get(i).map(|t| t.text.chars().count());
                self.stats.generated_tokens += 1;
                self.generator.generate(gender, *role, length)
            })
            .collect();

        let generator = &mut self.generator;
        let stats = &mut self.stats;
        self.format.apply_casing(template, &drawn, |role, length| {
            stats.generated_tokens += 1;
            generator.generate(gender, role, Some(length))
        })
    }

    pub fn mapping(&self) -> &PseudonymMapping {
        &self.mapping
    }

    pub fn into_mapping(self) -> PseudonymMapping {
        self.mapping
    }

    pub fn stats(&self) -> AssignmentStats {
        self.stats
    }

    pub fn catalog(&self) -> &NameCatalog {
        &self.catalog
    }

    pub fn forced_gender(&self) -> Option<Gender> {
        self.forced_gender
    }
}

/// Assigner shared by several workers
///
/// Every [`assign`](Self::assign) call holds one lock for the whole
/// lookup-generate-store sequence, so concurrent documents still see a single
/// consistent mapping.
#[derive(Clone)]
pub struct SharedPseudonymAssigner {
    inner: Arc<Mutex<PseudonymAssigner>>,
}

impl SharedPseudonymAssigner {
    pub fn new(assigner: PseudonymAssigner) -> Self {
        Self {
            inner: Arc::new(Mutex::new(assigner)),
        }
    }

    pub fn assign(&self, occurrence: &NameOccurrence) -> Result<String> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .assign(occurrence)
    }

    /// Copy of the current mapping
    pub fn mapping_snapshot(&self) -> PseudonymMapping {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .mapping()
            .clone()
    }

    pub fn stats(&self) -> AssignmentStats {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .stats()
    }

    /// Recover the assigner once no other handle is alive
    pub fn into_inner(self) -> Option<PseudonymAssigner> {
        Arc::try_unwrap(self.inner)
            .ok()
            .map(|m| m.into_inner().unwrap_or_else(PoisonError::into_inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NameRole;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn assigner_with(catalog_lines: &str, seed: u64) -> PseudonymAssigner {
        let catalog = NameCatalog::from_lines(catalog_lines, StdRng::seed_from_u64(seed));
        let generator = AlgorithmicGenerator::new(StdRng::seed_from_u64(seed + 1));
        PseudonymAssigner::new(catalog, generator)
    }

    fn given_family(text: &str, gender: Gender) -> NameOccurrence {
        NameOccurrence::new(text, gender, vec![NameRole::Given, NameRole::Family])
    }

    fn is_title_case(token: &str) -> bool {
        let mut chars = token.chars();
        chars.next().is_some_and(|c| c.is_uppercase()) && chars.all(|c| c.is_lowercase())
    }

    #[test]
    fn test_consistent_for_equal_normalized_names() {
        let mut assigner = assigner_with("", 1);
        let a = assigner.assign(&given_family("John Smith", Gender::Male)).unwrap();
        let b = assigner.assign(&given_family("  john   smith ", Gender::Male)).unwrap();
        assert_eq!(a, b);
        assert_eq!(assigner.mapping().len(), 1);
    }

    #[test]
    fn test_shape_preservation() {
        for seed in 0..25 {
            let mut assigner = assigner_with("", seed);
            let out = assigner.assign(&given_family("John Smith", Gender::Male)).unwrap();
            let tokens: Vec<&str> = out.split(' ').collect();
            assert_eq!(tokens.len(), 2, "{out}");
            assert!(tokens.iter().all(|t| is_title_case(t)), "{out}");
        }
    }

    #[test]
    fn test_shape_preservation_with_catalog() {
        let mut assigner = assigner_with(
            "Oliver,male,given\nHenry,male,given\nHartley,unspecified,family\n",
            3,
        );
        let out = assigner.assign(&given_family("John Smith", Gender::Male)).unwrap();
        let tokens: Vec<&str> = out.split(' ').collect();
        assert_eq!(tokens.len(), 2);
        assert!(tokens[0] == "Oliver" || tokens[0] == "Henry");
        assert_eq!(tokens[1], "Hartley");
        assert_eq!(assigner.stats().catalog_tokens, 2);
    }

    #[test]
    fn test_gender_partition_falls_back_to_generator() {
        let mut assigner = assigner_with("Amelia,female,given\n", 4);
        let occ = NameOccurrence::new("Alex", Gender::Male, vec![NameRole::Given]);
        let out = assigner.assign(&occ).unwrap();
        assert!(!out.is_empty());
        assert_ne!(out, "Amelia");
        assert_eq!(assigner.stats().generated_tokens, 1);
        assert_eq!(assigner.stats().catalog_tokens, 0);
    }

    #[test]
    fn test_mapping_grows_once_for_repeated_assign() {
        let mut assigner = assigner_with("", 5);
        let occ = given_family("Jane Doe", Gender::Female);
        let results: Vec<String> = (0..10).map(|_| assigner.assign(&occ).unwrap()).collect();
        assert!(results.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(assigner.mapping().len(), 1);
        assert_eq!(assigner.stats().assigned, 1);
        assert_eq!(assigner.stats().cache_hits, 9);
    }

    #[test]
    fn test_all_caps_reproduced() {
        let mut assigner = assigner_with("Hartley,unspecified,family\n", 6);
        let occ = NameOccurrence::new("MCDONALD", Gender::Unspecified, vec![NameRole::Family]);
        let out = assigner.assign(&occ).unwrap();
        assert_eq!(out, "HARTLEY");
    }

    #[test]
    fn test_all_caps_generated() {
        let mut assigner = assigner_with("", 6);
        let occ = NameOccurrence::new("MCDONALD", Gender::Unspecified, vec![NameRole::Family]);
        let out = assigner.assign(&occ).unwrap();
        assert_eq!(out.split_whitespace().count(), 1);
        assert_eq!(out, out.to_uppercase());
        assert_eq!(out.chars().count(), "MCDONALD".len());
    }

    #[test]
    fn test_empty_catalog_graceful_degradation() {
        let mut assigner = assigner_with("", 7);
        let occ = NameOccurrence::new("Alex", Gender::Male, vec![NameRole::Given]);
        let out = assigner.assign(&occ).unwrap();
        assert!(!out.is_empty());
        assert!(out.chars().all(char::is_alphabetic));
        assert_ne!(out.to_lowercase(), "alex");
    }

    #[test]
    fn test_empty_shape_is_invalid() {
        let mut assigner = assigner_with("", 8);
        let occ = NameOccurrence::new("John", Gender::Male, vec![]);
        let err = assigner.assign(&occ).unwrap_err();
        assert!(matches!(err, PseudonymError::InvalidOccurrence(_)));
        assert!(assigner.mapping().is_empty());
        assert_eq!(assigner.stats().invalid_occurrences, 1);
    }

    #[test]
    fn test_forced_gender_overrides_occurrence() {
        let mut assigner =
            assigner_with("Oliver,male,given\nAmelia,female,given\n", 9).with_forced_gender(Some(Gender::Female));
        let occ = NameOccurrence::new("Alex", Gender::Male, vec![NameRole::Given]);
        assert_eq!(assigner.assign(&occ).unwrap(), "Amelia");
    }

    #[test]
    fn test_preloaded_mapping_wins() {
        let mut mapping = PseudonymMapping::new();
        mapping.insert_once("John Smith", "Robin Ashdown".to_string());
        let mut assigner = assigner_with("", 10).with_mapping(mapping);
        let out = assigner.assign(&given_family("JOHN SMITH", Gender::Male)).unwrap();
        assert_eq!(out, "Robin Ashdown");
    }

    #[test]
    fn test_never_maps_to_itself_when_alternative_exists() {
        let mut assigner = assigner_with("Alex,male,given\nSam,male,given\n", 11);
        for _ in 0..5 {
            let occ = NameOccurrence::new("Alex", Gender::Male, vec![NameRole::Given]);
            assert_eq!(assigner.assign(&occ).unwrap(), "Sam");
        }
    }

    #[test]
    fn test_only_original_in_catalog_generates() {
        let mut assigner = assigner_with("Alex,male,given\n", 15);
        let occ = NameOccurrence::new("Alex", Gender::Male, vec![NameRole::Given]);
        let out = assigner.assign(&occ).unwrap();
        assert_ne!(out.to_lowercase(), "alex");
        assert_eq!(out.chars().count(), 4);
    }

    #[test]
    fn test_taken_pseudonym_is_redrawn() {
        let mut mapping = PseudonymMapping::new();
        mapping.insert_once("Alice Doe", "Oliver Hartley".to_string());
        let mut assigner = assigner_with(
            "Oliver,male,given\nHenry,male,given\nHartley,unspecified,family\n",
            16,
        )
        .with_mapping(mapping);

        let out = assigner.assign(&given_family("John Smith", Gender::Male)).unwrap();
        assert_eq!(out, "Henry Hartley");
    }

    #[test]
    fn test_taken_pseudonym_reused_when_catalog_exhausted() {
        let mut mapping = PseudonymMapping::new();
        mapping.insert_once("Alice Doe", "Oliver Hartley".to_string());
        let mut assigner =
            assigner_with("Oliver,male,given\nHartley,unspecified,family\n", 17).with_mapping(mapping);

        let out = assigner.assign(&given_family("John Smith", Gender::Male)).unwrap();
        assert_eq!(out, "Oliver Hartley");
        assert_eq!(assigner.mapping().len(), 2);
    }

    #[test]
    fn test_seeded_runs_reproducible() {
        let run = || {
            let mut assigner = assigner_with("", 12);
            ["John Smith", "Jane Doe", "Ada Lovelace"]
                .iter()
                .map(|n| assigner.assign(&given_family(n, Gender::Unspecified)).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_length_matching_disabled() {
        let mut assigner = assigner_with("", 13).with_length_matching(false);
        let occ = NameOccurrence::new("Al", Gender::Male, vec![NameRole::Given]);
        let len = assigner.assign(&occ).unwrap().chars().count();
        assert!((3..=10).contains(&len));
    }

    #[test]
    fn test_shared_assigner_consistent_across_threads() {
        let shared = SharedPseudonymAssigner::new(assigner_with("", 14));
        let names = ["John Smith", "Jane Doe", "Ada Lovelace", "Alan Turing"];

        let results: Vec<Vec<String>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let shared = shared.clone();
                    scope.spawn(move || {
                        names
                            .iter()
                            .map(|n| shared.assign(&given_family(n, Gender::Unspecified)).unwrap())
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(results.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(shared.mapping_snapshot().len(), names.len());
        assert_eq!(shared.stats().assigned, names.len());
        let assigner = shared.into_inner().unwrap();
        assert_eq!(assigner.mapping().len(), names.len());
    }
}

//! Algorithmic name generator
//!
//! Builds pronounceable synthetic names by alternating consonant and vowel
//! clusters drawn from gender-weighted phoneme tables, then attaching a
//! gendered given-name ending or a surname ending. Used whenever the catalog
//! cannot supply a name.

use crate::domain::{Gender, NameRole};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

/// Default lower bound for generated names without a target length
pub const DEFAULT_MIN_LENGTH: usize = 3;
/// Default upper bound for generated names without a target length
pub const DEFAULT_MAX_LENGTH: usize = 10;

const MIN_TARGET_LENGTH: usize = 2;
const MAX_TARGET_LENGTH: usize = 16;

// Repeated entries weight the draw.
const MALE_CONSONANTS: &[&str] = &[
    "b", "br", "d", "d", "dr", "g", "gr", "k", "k", "kr", "t", "t", "tr", "r", "r", "m", "n",
    "s", "st", "th", "v", "w", "j", "l", "c", "h",
];
const MALE_VOWELS: &[&str] = &["a", "a", "e", "i", "o", "o", "u", "ei"];
const MALE_ENDINGS: &[&str] = &["an", "en", "on", "us", "er", "o", "ick", "ard", "iel", "as"];

const FEMALE_CONSONANTS: &[&str] = &[
    "l", "l", "n", "n", "m", "m", "s", "v", "r", "th", "sh", "y", "ph", "j", "c", "b", "d",
];
const FEMALE_VOWELS: &[&str] = &["a", "a", "e", "e", "i", "o", "ie", "ia", "ea"];
const FEMALE_ENDINGS: &[&str] = &["a", "ia", "elle", "ine", "ette", "ie", "ana", "ey", "issa", "lyn"];

const NEUTRAL_CONSONANTS: &[&str] = &[
    "b", "c", "d", "f", "g", "h", "j", "k", "l", "m", "n", "p", "r", "s", "t", "v", "w", "z",
];
const NEUTRAL_VOWELS: &[&str] = &["a", "e", "i", "o", "u"];
const NEUTRAL_ENDINGS: &[&str] = &["en", "y", "in", "a", "el", "ey", "an"];

const FAMILY_ENDINGS: &[&str] = &[
    "son", "ton", "ley", "ford", "wood", "man", "er", "ell", "by", "ham", "worth", "ridge",
];

const FALLBACK_CONSONANTS: &[&str] = &["b", "d", "k", "l", "m", "n", "r", "s", "t"];
const FALLBACK_VOWELS: &[&str] = &["a", "e", "i", "o", "u"];

/// Phoneme clusters used to compose names for one gender
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhonemeTable {
    pub consonants: Vec<String>,
    pub vowels: Vec<String>,
    /// Endings for given names
    pub given_endings: Vec<String>,
    /// Endings for family names
    pub family_endings: Vec<String>,
}

impl PhonemeTable {
    fn from_static(
        consonants: &[&str],
        vowels: &[&str],
        given_endings: &[&str],
        family_endings: &[&str],
    ) -> Self {
        let owned = |s: &[&str]| s.iter().map(|p| p.to_string()).collect();
        Self {
            consonants: owned(consonants),
            vowels: owned(vowels),
            given_endings: owned(given_endings),
            family_endings: owned(family_endings),
        }
    }

    /// Built-in table for a gender
    pub fn builtin(gender: Gender) -> Self {
        match gender {
            Gender::Male => {
                Self::from_static(MALE_CONSONANTS, MALE_VOWELS, MALE_ENDINGS, FAMILY_ENDINGS)
            }
            Gender::Female => Self::from_static(
                FEMALE_CONSONANTS,
                FEMALE_VOWELS,
                FEMALE_ENDINGS,
                FAMILY_ENDINGS,
            ),
            Gender::Unspecified => Self::from_static(
                NEUTRAL_CONSONANTS,
                NEUTRAL_VOWELS,
                NEUTRAL_ENDINGS,
                FAMILY_ENDINGS,
            ),
        }
    }

    /// Default syllable set used when a table is missing or unusable
    pub fn fallback() -> Self {
        Self::from_static(FALLBACK_CONSONANTS, FALLBACK_VOWELS, &[], &[])
    }

    /// A table needs at least one consonant and one vowel cluster
    pub fn is_usable(&self) -> bool {
        self.consonants.iter().any(|c| !c.is_empty()) && self.vowels.iter().any(|v| !v.is_empty())
    }

    fn endings(&self, role: NameRole) -> &[String] {
        match role {
            NameRole::Given => &self.given_endings,
            NameRole::Family => &self.family_endings,
        }
    }
}

/// Synthesizes pronounceable names; never fails
pub struct AlgorithmicGenerator {
    tables: HashMap<Gender, PhonemeTable>,
    fallback: PhonemeTable,
    min_length: usize,
    max_length: usize,
    rng: StdRng,
}

impl AlgorithmicGenerator {
    /// Create a generator with the built-in phoneme tables
    pub fn new(rng: StdRng) -> Self {
        let tables = Gender::ALL
            .iter()
            .map(|g| (*g, PhonemeTable::builtin(*g)))
            .collect();
        Self {
            tables,
            fallback: PhonemeTable::fallback(),
            min_length: DEFAULT_MIN_LENGTH,
            max_length: DEFAULT_MAX_LENGTH,
            rng,
        }
    }

    /// Set the length range used when no target length is requested
    pub fn with_length_range(mut self, min_length: usize, max_length: usize) -> Self {
        let min_length = min_length.clamp(MIN_TARGET_LENGTH, MAX_TARGET_LENGTH);
        self.min_length = min_length;
        self.max_length = max_length.clamp(min_length, MAX_TARGET_LENGTH);
        self
    }

    /// Replace the phoneme tables for the given genders
    pub fn with_tables(mut self, tables: HashMap<Gender, PhonemeTable>) -> Self {
        self.tables.extend(tables);
        self
    }

    pub fn length_range(&self) -> (usize, usize) {
        (self.min_length, self.max_length)
    }

    /// Generate one capitalized name token
    ///
    /// With `target_length` the result has exactly that many characters
    /// (clamped to 2..=16); otherwise its length is drawn from the configured range.
    pub fn generate(&mut self, gender: Gender, role: NameRole, target_length: Option<usize>) -> String {
        let length = match target_length {
            Some(n) => n.clamp(MIN_TARGET_LENGTH, MAX_TARGET_LENGTH),
            None => self.rng.gen_range(self.min_length..=self.max_length),
        };

        let table = match self.tables.get(&gender) {
            Some(table) if table.is_usable() => table,
            _ => {
                tracing::debug!(gender = %gender, "Phoneme table unusable, using fallback syllables");
                &self.fallback
            }
        };

        let name = compose(table, &mut self.rng, role, length);
        capitalize(&name)
    }
}

fn compose(table: &PhonemeTable, rng: &mut StdRng, role: NameRole, length: usize) -> String {
    let consonants: Vec<&String> = table.consonants.iter().filter(|c| !c.is_empty()).collect();
    let vowels: Vec<&String> = table.vowels.iter().filter(|v| !v.is_empty()).collect();

    // Leave room for at least two body characters before the ending.
    let ending = table
        .endings(role)
        .iter()
        .filter(|e| !e.is_empty() && e.chars().count() + 2 <= length)
        .collect::<Vec<_>>()
        .choose(rng)
        .filter(|_| rng.gen_bool(0.6))
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    let body_length = length - ending.chars().count();

    let mut body = String::new();
    let mut want_vowel = rng.gen_bool(0.3);
    while body.chars().count() < body_length {
        let pool = if want_vowel { &vowels } else { &consonants };
        if let Some(cluster) = pool.choose(rng) {
            body.push_str(&cluster.to_lowercase());
        }
        want_vowel = !want_vowel;
    }
    truncate_chars(&mut body, body_length);

    if let (Some(last), Some(first)) = (body.chars().last(), ending.chars().next()) {
        if is_vowel(last) && is_vowel(first) {
            let replacement = consonants
                .choose(rng)
                .and_then(|c| c.chars().next())
                .unwrap_or('n');
            body.pop();
            body.push(replacement);
        }
    }

    let mut name = body + &ending;
    truncate_chars(&mut name, length);

    if !name.chars().any(is_vowel) {
        let vowel = vowels
            .choose(rng)
            .and_then(|v| v.chars().next())
            .unwrap_or('a');
        name.pop();
        name.push(vowel);
    }

    name
}

fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u' | 'y')
}

fn truncate_chars(s: &mut String, max_chars: usize) {
    if let Some((idx, _)) = s.char_indices().nth(max_chars) {
        s.truncate(idx);
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use test_case::test_case;

    fn generator(seed: u64) -> AlgorithmicGenerator {
        AlgorithmicGenerator::new(StdRng::seed_from_u64(seed))
    }

    fn longest_consonant_run(name: &str) -> usize {
        let mut longest = 0;
        let mut current = 0;
        for c in name.chars() {
            if is_vowel(c) {
                current = 0;
            } else {
                current += 1;
                longest = longest.max(current);
            }
        }
        longest
    }

    #[test_case(Gender::Male, NameRole::Given)]
    #[test_case(Gender::Female, NameRole::Given)]
    #[test_case(Gender::Unspecified, NameRole::Given)]
    #[test_case(Gender::Male, NameRole::Family)]
    #[test_case(Gender::Unspecified, NameRole::Family)]
    fn test_generate_pronounceable(gender: Gender, role: NameRole) {
        let mut gen = generator(42);
        for _ in 0..200 {
            let name = gen.generate(gender, role, None);
            let len = name.chars().count();
            assert!((DEFAULT_MIN_LENGTH..=DEFAULT_MAX_LENGTH).contains(&len), "{name}");
            assert!(name.chars().next().unwrap().is_uppercase(), "{name}");
            assert!(name.chars().skip(1).all(|c| c.is_lowercase()), "{name}");
            assert!(name.chars().any(is_vowel), "{name}");
            assert!(longest_consonant_run(&name) <= 4, "{name}");
        }
    }

    #[test_case(2)]
    #[test_case(4)]
    #[test_case(7)]
    #[test_case(12)]
    fn test_target_length_exact(target: usize) {
        let mut gen = generator(3);
        for _ in 0..50 {
            let name = gen.generate(Gender::Female, NameRole::Given, Some(target));
            assert_eq!(name.chars().count(), target, "{name}");
        }
    }

    #[test]
    fn test_target_length_clamped() {
        let mut gen = generator(3);
        assert_eq!(gen.generate(Gender::Male, NameRole::Given, Some(0)).chars().count(), 2);
        assert_eq!(gen.generate(Gender::Male, NameRole::Given, Some(100)).chars().count(), 16);
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let run = |seed| {
            let mut gen = generator(seed);
            (0..10)
                .map(|_| gen.generate(Gender::Male, NameRole::Family, None))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(11), run(11));
    }

    #[test]
    fn test_missing_tables_fall_back() {
        let mut tables = HashMap::new();
        tables.insert(Gender::Male, PhonemeTable::default());
        let mut gen = generator(5).with_tables(tables);
        let name = gen.generate(Gender::Male, NameRole::Given, None);
        assert!(!name.is_empty());
        assert!(name.chars().any(is_vowel));
    }

    #[test]
    fn test_length_range() {
        let mut gen = generator(9).with_length_range(5, 6);
        assert_eq!(gen.length_range(), (5, 6));
        for _ in 0..50 {
            let len = gen.generate(Gender::Unspecified, NameRole::Given, None).chars().count();
            assert!((5..=6).contains(&len));
        }
    }

    #[test]
    fn test_length_range_inverted_bounds() {
        let gen = generator(9).with_length_range(8, 4);
        assert_eq!(gen.length_range(), (8, 8));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("mARa"), "Mara");
        assert_eq!(capitalize(""), "");
    }
}

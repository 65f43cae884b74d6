//! Regex-based name detector

use super::{DetectedName, NameDetector};
use crate::domain::{Gender, NameOccurrence, NameRole, PseudonymError, Result};
use crate::pseudonym::format::FormatPreserver;
use regex::Regex;

/// Two capitalized words, e.g. `John Smith`
pub const DEFAULT_NAME_PATTERN: &str = r"\b[A-Z][a-z]+\s[A-Z][a-z]+\b";

/// One more capitalized word on the same line
const CONTINUATION_PATTERN: &str = r"^[ \t]+\p{Lu}[\p{Ll}'’]+";

/// Upper bound on name tokens collected after a title
const MAX_TITLED_TOKENS: usize = 4;

/// Regex-based name detector
pub struct RegexNameDetector {
    patterns: Vec<Regex>,
    continuation: Regex,
    format: FormatPreserver,
}

impl RegexNameDetector {
    /// Create a detector with the default pattern
    pub fn new() -> Result<Self> {
        Self::with_patterns(&[DEFAULT_NAME_PATTERN])
    }

    /// Create a detector from custom patterns; an empty list uses the default
    pub fn with_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        if patterns.is_empty() {
            return Self::new();
        }

        let compiled = patterns
            .iter()
            .map(|p| {
                Regex::new(p.as_ref()).map_err(|e| {
                    PseudonymError::Detection(format!("Invalid name pattern '{}': {}", p.as_ref(), e))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let continuation = Regex::new(CONTINUATION_PATTERN)
            .map_err(|e| PseudonymError::Detection(format!("Invalid continuation pattern: {e}")))?;

        Ok(Self {
            patterns: compiled,
            continuation,
            format: FormatPreserver::new(),
        })
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Pull following capitalized words into a name cut short by its title,
    /// e.g. `Dr Jane` + ` Doe`
    fn extend_after_title(&self, text: &str, name_start: usize, mut end: usize) -> usize {
        let mut tokens = text[name_start..end].split_whitespace().count();
        while tokens < MAX_TITLED_TOKENS {
            let Some(m) = self.continuation.find(&text[end..]) else {
                break;
            };
            if honorific(m.as_str().trim_start()).is_some() {
                break;
            }
            end += m.end();
            tokens += 1;
        }
        end
    }
}

impl NameDetector for RegexNameDetector {
    fn detect(&self, text: &str) -> Result<Vec<DetectedName>> {
        let mut spans: Vec<(usize, usize)> = self
            .patterns
            .iter()
            .flat_map(|re| re.find_iter(text).map(|m| (m.start(), m.end())))
            .collect();
        // Earliest first; the longest match wins at equal starts.
        spans.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

        let mut detected = Vec::new();
        let mut last_end = 0;

        for (start, end) in spans {
            if start < last_end {
                continue;
            }

            let mut gender = honorific_before(&text[..start]).unwrap_or_default();
            let mut name_start = start;
            let mut end = end;
            let mut titled = false;
            if let Some((title_gender, offset)) = honorific_in(&text[start..end]) {
                gender = title_gender;
                name_start = start + offset;
                titled = true;
                end = self.extend_after_title(text, name_start, end);
                let name = &text[name_start..end];
                name_start += name.len() - name.trim_start().len();
            }

            let original = &text[name_start..end];
            if original.is_empty() {
                continue;
            }
            let template = self.format.template(original);
            if template.tokens.is_empty() {
                continue;
            }

            // "Mr Smith": a lone name after a title is a family name.
            let shape = if titled && template.tokens.len() == 1 {
                vec![NameRole::Family]
            } else {
                template.roles()
            };

            detected.push(DetectedName {
                occurrence: NameOccurrence::new(original, gender, shape),
                start: name_start,
                end,
            });
            last_end = end;
        }

        tracing::debug!(count = detected.len(), "Names detected");
        Ok(detected)
    }
}

/// Gender implied by a title, `Some(Unspecified)` for neutral titles
fn honorific(word: &str) -> Option<Gender> {
    match word.trim_end_matches('.').to_lowercase().as_str() {
        "mr" | "mister" | "sir" | "lord" => Some(Gender::Male),
        "mrs" | "ms" | "miss" | "madam" | "lady" | "dame" => Some(Gender::Female),
        "dr" | "prof" | "mx" => Some(Gender::Unspecified),
        _ => None,
    }
}

/// Title immediately preceding a match
fn honorific_before(prefix: &str) -> Option<Gender> {
    if !prefix.ends_with(char::is_whitespace) {
        return None;
    }
    prefix.split_whitespace().last().and_then(honorific)
}

/// Title among the words of a match, with the offset of the text after it
fn honorific_in(span: &str) -> Option<(Gender, usize)> {
    let mut offset = 0;
    while offset < span.len() {
        let rest = &span[offset..];
        let word_start = offset + (rest.len() - rest.trim_start().len());
        let word = span[word_start..]
            .split_whitespace()
            .next()
            .unwrap_or_default();
        if word.is_empty() {
            break;
        }
        offset = word_start + word.len();
        if let Some(gender) = honorific(word) {
            return Some((gender, offset));
        }
    }
    None
}

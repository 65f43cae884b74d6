//! Name shape and casing preservation
//!
//! Splits an original name into tokens and separators, infers each token's role
//! and capitalization, and rebuilds a pseudonym with the same surface pattern:
//! `"SMITH, John"` becomes `"HARTLEY, Oliver"`, `"J. Smith"` becomes `"O. Hartley"`.

use crate::domain::NameRole;

/// Capitalization pattern of a single token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Casing {
    /// `SMITH`
    Upper,
    /// `Smith`
    Title,
    /// `smith`
    Lower,
    /// `McDonald`, `DeVries`
    Mixed,
}

impl Casing {
    /// Classify a token's capitalization
    pub fn detect(token: &str) -> Self {
        let letters: Vec<char> = token.chars().filter(|c| c.is_alphabetic()).collect();
        let Some((first, rest)) = letters.split_first() else {
            return Self::Title;
        };

        if letters.iter().all(|c| c.is_lowercase()) {
            Self::Lower
        } else if letters.iter().all(|c| c.is_uppercase()) {
            // A lone capital is an initial, not shouting.
            if rest.is_empty() {
                Self::Title
            } else {
                Self::Upper
            }
        } else if first.is_uppercase() && rest.iter().all(|c| c.is_lowercase()) {
            Self::Title
        } else {
            Self::Mixed
        }
    }

    /// Apply this pattern to `text`
    pub fn apply(&self, text: &str) -> String {
        match self {
            Self::Upper => text.to_uppercase(),
            Self::Lower => text.to_lowercase(),
            Self::Title if text.starts_with(char::is_uppercase) && Self::detect(text) == Self::Mixed => {
                text.to_string()
            }
            Self::Title => capitalize(text),
            Self::Mixed => capitalize_first(text),
        }
    }
}

/// One name token of the original text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateToken {
    pub text: String,
    pub role: NameRole,
    pub casing: Casing,
    /// Single-letter token such as the `J` in `J. Smith`
    pub initial: bool,
}

/// Surface pattern of an original name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTemplate {
    /// Text before the first token
    pub prefix: String,
    pub tokens: Vec<TemplateToken>,
    /// `separators[i]` sits between `tokens[i]` and `tokens[i + 1]`
    pub separators: Vec<String>,
    /// Text after the last token
    pub suffix: String,
}

impl NameTemplate {
    pub fn roles(&self) -> Vec<NameRole> {
        self.tokens.iter().map(|t| t.role).collect()
    }

    /// Whether the name is written family-name first (`Smith, John`)
    pub fn is_inverted(&self) -> bool {
        self.tokens.len() > 1 && self.separators.first().is_some_and(|s| s.contains(','))
    }
}

/// Decomposes and reconstructs multi-token names
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatPreserver;

impl FormatPreserver {
    pub fn new() -> Self {
        Self
    }

    /// Token texts with their positional roles
    ///
    /// One token is a given name; otherwise the last token is the family name and
    /// all others are given names. A comma after the first token (`Smith, John`)
    /// marks the first token as the family name instead.
    pub fn decompose_shape(&self, original: &str) -> Vec<(String, NameRole)> {
        self.template(original)
            .tokens
            .into_iter()
            .map(|t| (t.text, t.role))
            .collect()
    }

    /// Full surface template of `original`
    pub fn template(&self, original: &str) -> NameTemplate {
        let (prefix, raw_tokens, separators, suffix) = split_tokens(original);

        let inverted = raw_tokens.len() > 1 && separators.first().is_some_and(|s| s.contains(','));
        let count = raw_tokens.len();
        let tokens = raw_tokens
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let role = if inverted {
                    if i == 0 {
                        NameRole::Family
                    } else {
                        NameRole::Given
                    }
                } else if count > 1 && i == count - 1 {
                    NameRole::Family
                } else {
                    NameRole::Given
                };
                TemplateToken {
                    casing: Casing::detect(&text),
                    initial: text.chars().count() == 1,
                    role,
                    text,
                }
            })
            .collect();

        NameTemplate {
            prefix,
            tokens,
            separators,
            suffix,
        }
    }

    /// Rebuild `replacements` in the surface pattern of `template`
    ///
    /// Replacement tokens beyond the template's token count are dropped; missing
    /// ones are produced by `pad(role, original_token_length)`.
    pub fn apply_casing<F>(&self, template: &NameTemplate, replacements: &[String], mut pad: F) -> String
    where
        F: FnMut(NameRole, usize) -> String,
    {
        if template.tokens.is_empty() {
            return replacements
                .iter()
                .map(|r| Casing::Title.apply(r))
                .collect::<Vec<_>>()
                .join(" ");
        }

        if replacements.len() != template.tokens.len() {
            tracing::debug!(
                template_tokens = template.tokens.len(),
                replacement_tokens = replacements.len(),
                "Token count mismatch while rebuilding name"
            );
        }

        let mut out = template.prefix.clone();
        for (i, token) in template.tokens.iter().enumerate() {
            if let Some(separator) = i.checked_sub(1).and_then(|j| template.separators.get(j)) {
                out.push_str(separator);
            }

            let replacement = match replacements.get(i) {
                Some(r) => r.clone(),
                None => pad(token.role, token.text.chars().count()),
            };
            let shaped = if token.initial {
                replacement.chars().take(1).collect()
            } else {
                replacement
            };
            out.push_str(&token.casing.apply(&shaped));
        }
        out.push_str(&template.suffix);
        out
    }
}

/// Split into (prefix, tokens, separators, suffix)
///
/// A token is a run of letters, optionally joined by apostrophes (`O'Brien`).
fn split_tokens(text: &str) -> (String, Vec<String>, Vec<String>, String) {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut gaps = Vec::new();
    let mut gap = String::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i].is_alphabetic() {
            let mut token = String::new();
            while i < chars.len() {
                let c = chars[i];
                let joins = is_apostrophe(c) && chars.get(i + 1).is_some_and(|n| n.is_alphabetic());
                if c.is_alphabetic() || joins {
                    token.push(c);
                    i += 1;
                } else {
                    break;
                }
            }
            gaps.push(std::mem::take(&mut gap));
            tokens.push(token);
        } else {
            gap.push(chars[i]);
            i += 1;
        }
    }

    if tokens.is_empty() {
        return (gap, tokens, Vec::new(), String::new());
    }

    // gaps[0] is the prefix, the rest separate consecutive tokens
    let mut gaps = gaps.into_iter();
    let prefix = gaps.next().unwrap_or_default();
    (prefix, tokens, gaps.collect(), gap)
}

fn is_apostrophe(c: char) -> bool {
    c == '\'' || c == '\u{2019}'
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

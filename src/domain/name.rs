//! Name domain types
//!
//! Gender and role tags, catalog records and the name occurrences handed over by
//! the detector.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Gender category of a name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    /// Unknown or deliberately unspecified
    #[default]
    Unspecified,
}

impl Gender {
    /// All gender categories, in bucket order
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Unspecified];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Unspecified => "unspecified",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            "unspecified" | "u" | "any" | "neutral" | "" => Ok(Self::Unspecified),
            other => Err(format!(
                "Invalid gender '{other}'. Must be one of: male, female, unspecified"
            )),
        }
    }
}

/// Structural role of a token within a person name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameRole {
    /// Given (first or middle) name
    Given,
    /// Family name (surname)
    Family,
}

impl NameRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Given => "given",
            Self::Family => "family",
        }
    }
}

impl fmt::Display for NameRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NameRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "given" | "first" | "forename" => Ok(Self::Given),
            "family" | "last" | "surname" => Ok(Self::Family),
            other => Err(format!(
                "Invalid name role '{other}'. Must be one of: given, family"
            )),
        }
    }
}

/// A single candidate name from the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecord {
    pub text: String,
    #[serde(default)]
    pub gender: Gender,
    pub role: NameRole,
}

impl NameRecord {
    pub fn new(text: impl Into<String>, gender: Gender, role: NameRole) -> Self {
        Self {
            text: text.into(),
            gender,
            role,
        }
    }
}

/// One detected instance of a person name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameOccurrence {
    /// The name exactly as it appears in the text
    pub original_text: String,
    /// Declared or inferred gender
    #[serde(default)]
    pub gender: Gender,
    /// Role of each token, in order
    pub token_shape: Vec<NameRole>,
}

impl NameOccurrence {
    pub fn new(original_text: impl Into<String>, gender: Gender, token_shape: Vec<NameRole>) -> Self {
        Self {
            original_text: original_text.into(),
            gender,
            token_shape,
        }
    }

    /// Override the gender
    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }
}

// Person entity in the internal family graph.
//
// Ids are assigned at mapping time and are scoped to one import run; the
// GEDCOM cross-reference id a person came from is discarded after mapping.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Unique identifier for a person within one graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PersonId(pub u64);

impl std::fmt::Display for PersonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Recorded sex of a person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

impl Gender {
    /// Parse a GEDCOM SEX value
    pub fn from_gedcom(value: &str) -> Option<Self> {
        match value.trim() {
            "M" => Some(Gender::Male),
            "F" => Some(Gender::Female),
            "U" => Some(Gender::Unknown),
            _ => None,
        }
    }

    /// GEDCOM SEX value for this gender
    pub fn to_gedcom(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Unknown => "U",
        }
    }
}

/// A person in the internal family graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub first_name: String,
    pub last_name: String,
    pub alternate_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub death_date: Option<NaiveDate>,
    pub birth_place: Option<String>,
    pub gender: Option<Gender>,
    /// No death record was present for this person
    pub living: bool,
}

impl Person {
    /// Create a person with only a name; remaining fields default to empty
    pub fn new(id: PersonId, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            alternate_name: None,
            birth_date: None,
            death_date: None,
            birth_place: None,
            gender: None,
            living: true,
        }
    }

    /// Full display name, "First Last" with empty parts skipped
    pub fn display_name(&self) -> String {
        match (self.first_name.is_empty(), self.last_name.is_empty()) {
            (false, false) => format!("{} {}", self.first_name, self.last_name),
            (false, true) => self.first_name.clone(),
            (true, false) => self.last_name.clone(),
            (true, true) => String::from("(unnamed)"),
        }
    }

    /// GEDCOM NAME value, surname wrapped in slashes
    pub fn gedcom_name(&self) -> String {
        if self.first_name.is_empty() {
            format!("/{}/", self.last_name)
        } else {
            format!("{} /{}/", self.first_name, self.last_name)
        }
    }

    /// Sort key for export ordering: last name, then first name
    pub fn sort_key(&self) -> (String, String) {
        (self.last_name.to_lowercase(), self.first_name.to_lowercase())
    }
}

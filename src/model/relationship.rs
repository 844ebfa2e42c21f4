// Directed relationship edges between persons.
//
// PARENT edges point parent -> child and are the only stored direction for
// that pairing; SPOUSE and SIBLING are symmetric and stored once in the
// canonical direction (lower id -> higher id).

use crate::model::person::PersonId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Kind of relationship edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipKind {
    /// `from` is a parent of `to`
    Parent,
    /// `from` is a child of `to` (accepted from external data, normalized on export)
    Child,
    /// `from` and `to` are spouses
    Spouse,
    /// `from` and `to` are siblings
    Sibling,
}

impl RelationshipKind {
    /// Symmetric kinds have no inherent direction
    pub fn is_symmetric(&self) -> bool {
        matches!(self, RelationshipKind::Spouse | RelationshipKind::Sibling)
    }
}

/// A directed edge in the internal family graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub from: PersonId,
    pub to: PersonId,
    pub kind: RelationshipKind,
    pub marriage_date: Option<NaiveDate>,
    pub divorce_date: Option<NaiveDate>,
    pub active: bool,
}

impl Relationship {
    /// Create an edge with no dates
    pub fn new(from: PersonId, to: PersonId, kind: RelationshipKind) -> Self {
        Self {
            from,
            to,
            kind,
            marriage_date: None,
            divorce_date: None,
            active: true,
        }
    }

    /// Create a PARENT edge, parent -> child
    pub fn parent(parent: PersonId, child: PersonId) -> Self {
        Self::new(parent, child, RelationshipKind::Parent)
    }

    /// Create a SPOUSE edge in canonical direction with optional event dates
    pub fn spouse(
        a: PersonId,
        b: PersonId,
        marriage_date: Option<NaiveDate>,
        divorce_date: Option<NaiveDate>,
    ) -> Self {
        let (from, to) = if a <= b { (a, b) } else { (b, a) };
        Self {
            from,
            to,
            kind: RelationshipKind::Spouse,
            marriage_date,
            divorce_date,
            active: divorce_date.is_none(),
        }
    }

    /// Create a SIBLING edge in canonical direction
    pub fn sibling(a: PersonId, b: PersonId) -> Self {
        let (from, to) = if a <= b { (a, b) } else { (b, a) };
        Self::new(from, to, RelationshipKind::Sibling)
    }

    /// The pair of endpoints with ids in ascending order
    pub fn unordered_pair(&self) -> (PersonId, PersonId) {
        if self.from <= self.to {
            (self.from, self.to)
        } else {
            (self.to, self.from)
        }
    }

    /// Check whether this edge touches the given person
    pub fn involves(&self, id: PersonId) -> bool {
        self.from == id || self.to == id
    }
}

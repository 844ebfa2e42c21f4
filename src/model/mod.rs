// Internal family-graph model: persons, relationship edges, findings

pub mod finding;
pub mod person;
pub mod relationship;

pub use finding::*;
pub use person::*;
pub use relationship::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The internal family graph: people plus directed relationship edges.
///
/// This is the shape persisted through the JSON seam between import and
/// export; it carries no GEDCOM cross-reference ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FamilyGraph {
    pub people: Vec<Person>,
    pub relationships: Vec<Relationship>,
}

impl FamilyGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a person by id
    pub fn person(&self, id: PersonId) -> Option<&Person> {
        self.people.iter().find(|p| p.id == id)
    }

    /// Index of people by id
    pub fn person_index(&self) -> HashMap<PersonId, &Person> {
        self.people.iter().map(|p| (p.id, p)).collect()
    }

    /// All edges of one kind
    pub fn edges_of_kind(&self, kind: RelationshipKind) -> impl Iterator<Item = &Relationship> {
        self.relationships.iter().filter(move |r| r.kind == kind)
    }

    /// Children of a person, via PARENT edges
    pub fn children_of(&self, id: PersonId) -> Vec<PersonId> {
        self.relationships
            .iter()
            .filter(|r| r.kind == RelationshipKind::Parent && r.from == id)
            .map(|r| r.to)
            .collect()
    }

    /// Graph statistics
    pub fn stats(&self) -> GraphStats {
        let spouse_edges = self.edges_of_kind(RelationshipKind::Spouse).count();
        let parent_edges = self.edges_of_kind(RelationshipKind::Parent).count();
        GraphStats {
            people: self.people.len(),
            relationships: self.relationships.len(),
            spouse_edges,
            parent_edges,
        }
    }
}

/// Statistics about a family graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub people: usize,
    pub relationships: usize,
    pub spouse_edges: usize,
    pub parent_edges: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> FamilyGraph {
        FamilyGraph {
            people: vec![
                Person::new(PersonId(1), "John", "Doe"),
                Person::new(PersonId(2), "Jane", "Roe"),
                Person::new(PersonId(3), "Baby", "Doe"),
            ],
            relationships: vec![
                Relationship::spouse(PersonId(1), PersonId(2), None, None),
                Relationship::parent(PersonId(1), PersonId(3)),
                Relationship::parent(PersonId(2), PersonId(3)),
            ],
        }
    }

    #[test]
    fn test_empty_graph() {
        let g = FamilyGraph::new();
        assert_eq!(g.stats().people, 0);
        assert_eq!(g.stats().relationships, 0);
    }

    #[test]
    fn test_person_lookup() {
        let g = sample_graph();
        assert_eq!(g.person(PersonId(2)).unwrap().first_name, "Jane");
        assert!(g.person(PersonId(9)).is_none());
    }

    #[test]
    fn test_person_index() {
        let g = sample_graph();
        let idx = g.person_index();
        assert_eq!(idx.len(), 3);
        assert_eq!(idx[&PersonId(3)].first_name, "Baby");
    }

    #[test]
    fn test_children_of() {
        let g = sample_graph();
        assert_eq!(g.children_of(PersonId(1)), vec![PersonId(3)]);
        assert_eq!(g.children_of(PersonId(2)), vec![PersonId(3)]);
        assert!(g.children_of(PersonId(3)).is_empty());
    }

    #[test]
    fn test_stats() {
        let g = sample_graph();
        let stats = g.stats();
        assert_eq!(stats.people, 3);
        assert_eq!(stats.relationships, 3);
        assert_eq!(stats.spouse_edges, 1);
        assert_eq!(stats.parent_edges, 2);
    }

    #[test]
    fn test_graph_round_trips_through_json() {
        let g = sample_graph();
        let json = serde_json::to_string(&g).expect("serialize");
        let back: FamilyGraph = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, g);
    }
}

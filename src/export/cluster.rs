// Family reconstruction from the flat relationship-edge list.
//
// The internal model stores no family groupings, so export has to rebuild
// them: one cluster per unique unordered spouse pair, children pulled from
// PARENT edges of either member, and an implicit single-parent cluster for
// parents that never appear in a spouse pair. The clustering is a pure
// function over the edge list; the ambiguity of collapsing source families
// lives entirely here.

use crate::model::{PersonId, Relationship, RelationshipKind};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

/// A transient family grouping, discarded after serialization
#[derive(Debug, Clone, PartialEq)]
pub struct FamilyCluster {
    /// One or two spouse ids, discovery order
    pub spouses: Vec<PersonId>,
    /// Children in first-appearance order, deduplicated
    pub children: Vec<PersonId>,
    pub marriage_date: Option<NaiveDate>,
    pub divorce_date: Option<NaiveDate>,
}

impl FamilyCluster {
    /// Check whether this cluster has the given person as a spouse
    pub fn has_spouse(&self, id: PersonId) -> bool {
        self.spouses.contains(&id)
    }
}

/// Normalized view of one edge: who parents whom
fn parent_child(edge: &Relationship) -> Option<(PersonId, PersonId)> {
    match edge.kind {
        RelationshipKind::Parent => Some((edge.from, edge.to)),
        // CHILD is the mirrored form some external data carries
        RelationshipKind::Child => Some((edge.to, edge.from)),
        _ => None,
    }
}

/// Cluster relationship edges into family units.
///
/// Couple clusters come first, in the order their spouse pair was first
/// discovered; implicit single-parent clusters follow in parent discovery
/// order. SIBLING edges carry no grouping information and are ignored.
pub fn build_clusters(relationships: &[Relationship]) -> Vec<FamilyCluster> {
    // Spouse pairs in discovery order, deduplicating mirrored edges
    let mut pairs: Vec<&Relationship> = Vec::new();
    let mut seen_pairs: HashSet<(PersonId, PersonId)> = HashSet::new();
    for edge in relationships {
        if edge.kind == RelationshipKind::Spouse && seen_pairs.insert(edge.unordered_pair()) {
            pairs.push(edge);
        }
    }

    // Children per parent, discovery order, deduplicated
    let mut children_of: HashMap<PersonId, Vec<PersonId>> = HashMap::new();
    let mut parent_order: Vec<PersonId> = Vec::new();
    let mut seen_links: HashSet<(PersonId, PersonId)> = HashSet::new();
    for edge in relationships {
        let Some((parent, child)) = parent_child(edge) else {
            continue;
        };
        if !seen_links.insert((parent, child)) {
            continue;
        }
        if !children_of.contains_key(&parent) {
            parent_order.push(parent);
        }
        children_of.entry(parent).or_default().push(child);
    }

    let mut clusters = Vec::new();
    let mut clustered_parents: HashSet<PersonId> = HashSet::new();

    for edge in pairs {
        let (a, b) = (edge.from, edge.to);
        clustered_parents.insert(a);
        clustered_parents.insert(b);

        let mut children = Vec::new();
        let mut seen_children = HashSet::new();
        for spouse in [a, b] {
            for &child in children_of.get(&spouse).into_iter().flatten() {
                if seen_children.insert(child) {
                    children.push(child);
                }
            }
        }

        clusters.push(FamilyCluster {
            spouses: vec![a, b],
            children,
            marriage_date: edge.marriage_date,
            divorce_date: edge.divorce_date,
        });
    }

    for parent in parent_order {
        if clustered_parents.contains(&parent) {
            continue;
        }
        clusters.push(FamilyCluster {
            spouses: vec![parent],
            children: children_of.get(&parent).cloned().unwrap_or_default(),
            marriage_date: None,
            divorce_date: None,
        });
    }

    clusters
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_empty() {
        assert!(build_clusters(&[]).is_empty());
    }

    #[test]
    fn test_couple_with_children() {
        let edges = vec![
            Relationship::spouse(PersonId(1), PersonId(2), Some(ymd(1988, 6, 1)), None),
            Relationship::parent(PersonId(1), PersonId(3)),
            Relationship::parent(PersonId(2), PersonId(3)),
            Relationship::parent(PersonId(1), PersonId(4)),
            Relationship::parent(PersonId(2), PersonId(4)),
        ];
        let clusters = build_clusters(&edges);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].spouses, vec![PersonId(1), PersonId(2)]);
        assert_eq!(clusters[0].children, vec![PersonId(3), PersonId(4)]);
        assert_eq!(clusters[0].marriage_date, Some(ymd(1988, 6, 1)));
    }

    #[test]
    fn test_mirrored_spouse_edges_collapse() {
        let mut reversed = Relationship::spouse(PersonId(1), PersonId(2), None, None);
        // Hand-build the reversed direction an external store might hold
        std::mem::swap(&mut reversed.from, &mut reversed.to);
        let edges = vec![
            Relationship::spouse(PersonId(1), PersonId(2), None, None),
            reversed,
        ];
        assert_eq!(build_clusters(&edges).len(), 1);
    }

    #[test]
    fn test_child_edges_normalized() {
        // CHILD edge child->parent counts the same as PARENT parent->child
        let edges = vec![
            Relationship::new(PersonId(3), PersonId(1), RelationshipKind::Child),
            Relationship::parent(PersonId(1), PersonId(3)),
        ];
        let clusters = build_clusters(&edges);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].spouses, vec![PersonId(1)]);
        assert_eq!(clusters[0].children, vec![PersonId(3)]);
    }

    #[test]
    fn test_single_parent_cluster() {
        let edges = vec![
            Relationship::parent(PersonId(1), PersonId(2)),
            Relationship::parent(PersonId(1), PersonId(3)),
        ];
        let clusters = build_clusters(&edges);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].spouses, vec![PersonId(1)]);
        assert_eq!(clusters[0].children, vec![PersonId(2), PersonId(3)]);
    }

    #[test]
    fn test_couples_before_single_parents() {
        let edges = vec![
            Relationship::parent(PersonId(5), PersonId(6)),
            Relationship::spouse(PersonId(1), PersonId(2), None, None),
            Relationship::parent(PersonId(1), PersonId(3)),
        ];
        let clusters = build_clusters(&edges);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].spouses.len(), 2);
        assert_eq!(clusters[1].spouses, vec![PersonId(5)]);
    }

    #[test]
    fn test_children_from_either_spouse() {
        // A child linked to only one member of the couple still joins the family
        let edges = vec![
            Relationship::spouse(PersonId(1), PersonId(2), None, None),
            Relationship::parent(PersonId(2), PersonId(3)),
        ];
        let clusters = build_clusters(&edges);
        assert_eq!(clusters[0].children, vec![PersonId(3)]);
    }

    #[test]
    fn test_remarriage_yields_two_clusters() {
        let edges = vec![
            Relationship::spouse(PersonId(1), PersonId(2), None, Some(ymd(1990, 1, 1))),
            Relationship::spouse(PersonId(1), PersonId(3), Some(ymd(1992, 2, 2)), None),
            Relationship::parent(PersonId(1), PersonId(4)),
        ];
        let clusters = build_clusters(&edges);
        assert_eq!(clusters.len(), 2);
        // The shared parent's children appear under both couples; the source
        // data cannot say which marriage produced them
        assert_eq!(clusters[0].children, vec![PersonId(4)]);
        assert_eq!(clusters[1].children, vec![PersonId(4)]);
    }

    #[test]
    fn test_unmarried_other_parent_gets_own_cluster() {
        let edges = vec![
            Relationship::spouse(PersonId(1), PersonId(2), None, None),
            Relationship::parent(PersonId(1), PersonId(4)),
            Relationship::parent(PersonId(3), PersonId(4)),
        ];
        let clusters = build_clusters(&edges);
        assert_eq!(clusters.len(), 2);
        assert!(clusters[0].has_spouse(PersonId(1)));
        assert_eq!(clusters[1].spouses, vec![PersonId(3)]);
        assert_eq!(clusters[1].children, vec![PersonId(4)]);
    }

    #[test]
    fn test_sibling_edges_ignored() {
        let edges = vec![Relationship::sibling(PersonId(1), PersonId(2))];
        assert!(build_clusters(&edges).is_empty());
    }

    #[test]
    fn test_duplicate_parent_edges_deduplicated() {
        let edges = vec![
            Relationship::parent(PersonId(1), PersonId(2)),
            Relationship::parent(PersonId(1), PersonId(2)),
        ];
        let clusters = build_clusters(&edges);
        assert_eq!(clusters[0].children, vec![PersonId(2)]);
    }

    #[test]
    fn test_deterministic_for_same_input() {
        let edges = vec![
            Relationship::spouse(PersonId(2), PersonId(1), None, None),
            Relationship::parent(PersonId(1), PersonId(3)),
            Relationship::parent(PersonId(4), PersonId(5)),
        ];
        let first = build_clusters(&edges);
        let second = build_clusters(&edges);
        assert_eq!(first, second);
    }
}

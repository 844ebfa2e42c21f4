// Export mapping: internal family graph -> GEDCOM-shaped records
//
// The inverse of import: individuals are emitted per person, families are
// reconstructed by clustering the edge list. Export never fails on data
// shape; edges referencing unknown person ids are skipped with a finding so
// partial output always comes back.

pub mod cluster;

pub use cluster::{build_clusters, FamilyCluster};

use crate::model::{Finding, FindingKind, Gender, Person, PersonId, Relationship};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

/// One individual ready for serialization, with its export-scoped xref
#[derive(Debug, Clone, PartialEq)]
pub struct IndividualRecord {
    /// Cross-reference id without delimiters, e.g. "I1"
    pub xref: String,
    pub person: Person,
}

/// One family ready for serialization
#[derive(Debug, Clone, PartialEq)]
pub struct FamilyRecord {
    /// Cross-reference id without delimiters, e.g. "F1"
    pub xref: String,
    pub husband: Option<String>,
    pub wife: Option<String>,
    pub children: Vec<String>,
    pub marriage_date: Option<NaiveDate>,
    pub divorce_date: Option<NaiveDate>,
}

/// Result of export mapping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportOutput {
    pub individuals: Vec<IndividualRecord>,
    pub families: Vec<FamilyRecord>,
    pub findings: Vec<Finding>,
}

/// Maps the internal graph back into GEDCOM-shaped records
#[derive(Debug, Default)]
pub struct ExportMapper;

impl ExportMapper {
    pub fn new() -> Self {
        Self
    }

    /// Map people and relationship edges into individual and family records
    pub fn map(&self, people: &[Person], relationships: &[Relationship]) -> ExportOutput {
        let mut findings = Vec::new();

        let known: HashSet<PersonId> = people.iter().map(|p| p.id).collect();
        let kept: Vec<Relationship> = relationships
            .iter()
            .filter(|edge| {
                let ok = known.contains(&edge.from) && known.contains(&edge.to);
                if !ok {
                    findings.push(Finding::warning(
                        FindingKind::SkippedEdge,
                        format!(
                            "relationship {} -> {} references an unknown person, skipped",
                            edge.from, edge.to
                        ),
                    ));
                }
                ok
            })
            .cloned()
            .collect();

        // Individuals sorted by last name then first name; xrefs are scoped
        // to this run and never persisted back
        let mut sorted: Vec<&Person> = people.iter().collect();
        sorted.sort_by_key(|p| (p.sort_key(), p.id));

        let mut xref_of: HashMap<PersonId, String> = HashMap::new();
        let individuals: Vec<IndividualRecord> = sorted
            .into_iter()
            .enumerate()
            .map(|(i, person)| {
                let xref = format!("I{}", i + 1);
                xref_of.insert(person.id, xref.clone());
                IndividualRecord {
                    xref,
                    person: person.clone(),
                }
            })
            .collect();

        let person_of: HashMap<PersonId, &Person> = people.iter().map(|p| (p.id, p)).collect();
        let families: Vec<FamilyRecord> = build_clusters(&kept)
            .into_iter()
            .enumerate()
            .map(|(i, cluster)| {
                let (husband, wife) = assign_roles(&cluster.spouses, &person_of);
                FamilyRecord {
                    xref: format!("F{}", i + 1),
                    husband: husband.and_then(|id| xref_of.get(&id).cloned()),
                    wife: wife.and_then(|id| xref_of.get(&id).cloned()),
                    children: cluster
                        .children
                        .iter()
                        .filter_map(|id| xref_of.get(id).cloned())
                        .collect(),
                    marriage_date: cluster.marriage_date,
                    divorce_date: cluster.divorce_date,
                }
            })
            .collect();

        ExportOutput {
            individuals,
            families,
            findings,
        }
    }
}

/// Assign spouse ids to the husband/wife slots, by gender when known and by
/// position otherwise
fn assign_roles(
    spouses: &[PersonId],
    person_of: &HashMap<PersonId, &Person>,
) -> (Option<PersonId>, Option<PersonId>) {
    let gender = |id: PersonId| person_of.get(&id).and_then(|p| p.gender);

    match spouses {
        [only] => match gender(*only) {
            Some(Gender::Female) => (None, Some(*only)),
            _ => (Some(*only), None),
        },
        [a, b] => match (gender(*a), gender(*b)) {
            (Some(Gender::Female), g) if g != Some(Gender::Female) => (Some(*b), Some(*a)),
            (g, Some(Gender::Male)) if g != Some(Gender::Male) => (Some(*b), Some(*a)),
            _ => (Some(*a), Some(*b)),
        },
        _ => (None, None),
    }
}

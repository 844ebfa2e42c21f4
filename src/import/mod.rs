// Import mapping: parsed record tree -> internal family graph
//
// Two passes. Pass one builds a Person per individual record with graceful
// field coercion. Pass two resolves family records against the persons from
// pass one and emits relationship edges. Findings accumulate throughout; the
// batch entry point rejects everything when a blocking finding is present.

use crate::config::Config;
use crate::dates::parse_date;
use crate::model::{
    has_blocking, FamilyGraph, Finding, FindingKind, Gender, Person, PersonId, Relationship,
};
use crate::parser::{parse, tags, ParseTree, Record};
use crate::validate::validate;
use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;

/// Run-scoped person-id generator. One per mapping run, never process-wide,
/// so concurrent imports cannot interfere.
#[derive(Debug, Default)]
struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    fn next_id(&mut self) -> PersonId {
        self.next += 1;
        PersonId(self.next)
    }
}

/// Result of mapping a parse tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappedGraph {
    pub graph: FamilyGraph,
    pub findings: Vec<Finding>,
}

/// Maps a validated parse tree into the internal family graph
#[derive(Debug, Default)]
pub struct ImportMapper {
    progress: bool,
}

impl ImportMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a progress bar while mapping records
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Map a parse tree into people and relationship edges
    pub fn map(&self, tree: &ParseTree) -> MappedGraph {
        let mut ids = IdGenerator::default();
        let mut findings = Vec::new();
        let mut graph = FamilyGraph::new();
        let mut by_xref: HashMap<String, PersonId> = HashMap::new();

        let total = tree.count_tagged(tags::INDI) + tree.count_tagged(tags::FAM);
        let progress = if self.progress {
            let pb = ProgressBar::new(total as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .unwrap()
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        // Pass one: individuals
        for record in tree.records_tagged(tags::INDI) {
            if let Some(ref pb) = progress {
                pb.set_message("individuals");
                pb.inc(1);
            }

            let person = map_individual(record, ids.next_id(), &mut findings);
            if let Some(xref) = &record.xref {
                // First definition wins, matching the validator's resolution
                by_xref.entry(xref.clone()).or_insert(person.id);
            }
            graph.people.push(person);
        }

        // Pass two: families
        for record in tree.records_tagged(tags::FAM) {
            if let Some(ref pb) = progress {
                pb.set_message("families");
                pb.inc(1);
            }

            map_family(record, &by_xref, &mut graph.relationships, &mut findings);
        }

        if let Some(pb) = progress {
            pb.finish_with_message("Mapping complete");
        }

        MappedGraph { graph, findings }
    }
}

/// Split a GEDCOM NAME value, "John /Doe/", into given name and surname
fn split_name(value: &str) -> (String, String) {
    match value.split_once('/') {
        Some((given, rest)) => {
            let surname = rest.split('/').next().unwrap_or(rest);
            (given.trim().to_string(), surname.trim().to_string())
        }
        None => (value.trim().to_string(), String::new()),
    }
}

/// NAME value with the surname slashes removed, for alternate names
fn plain_name(value: &str) -> String {
    let (given, surname) = split_name(value);
    if surname.is_empty() {
        given
    } else if given.is_empty() {
        surname
    } else {
        format!("{} {}", given, surname)
    }
}

fn map_individual(record: &Record, id: PersonId, findings: &mut Vec<Finding>) -> Person {
    let mut person = Person::new(id, "", "");

    let mut names = record.children_tagged(tags::NAME);
    if let Some(name) = names.next() {
        let (given, surname) = split_name(name.value.as_deref().unwrap_or(""));
        person.first_name = given;
        person.last_name = surname;
        // Explicit GIVN/SURN sub-records override the NAME value split
        if let Some(givn) = name.child_value(tags::GIVN) {
            person.first_name = givn.trim().to_string();
        }
        if let Some(surn) = name.child_value(tags::SURN) {
            person.last_name = surn.trim().to_string();
        }
    }
    if let Some(second) = names.next() {
        person.alternate_name = second.value.as_deref().map(plain_name);
    }

    if let Some(sex) = record.child(tags::SEX) {
        let value = sex.value.as_deref().unwrap_or("");
        person.gender = Gender::from_gedcom(value);
        if person.gender.is_none() {
            findings.push(
                Finding::warning(
                    FindingKind::AmbiguousRole,
                    format!("unrecognized sex value '{}'", value),
                )
                .at_line(sex.line),
            );
        }
    }

    if let Some(birth) = record.child(tags::BIRT) {
        person.birth_date = map_event_date(birth, "birth", findings);
        if let Some(place) = birth.child_value(tags::PLAC) {
            person.birth_place = Some(place.to_string());
        }
    }

    if let Some(death) = record.child(tags::DEAT) {
        person.death_date = map_event_date(death, "death", findings);
        person.living = false;
    }

    person
}

/// Date of an event record's DATE sub-record; unparseable text degrades to
/// None plus exactly one warning
fn map_event_date(event: &Record, label: &str, findings: &mut Vec<Finding>) -> Option<NaiveDate> {
    let date_record = event.child(tags::DATE)?;
    let text = date_record.value.as_deref().unwrap_or("");
    match parse_date(text) {
        Some(date) => Some(date),
        None => {
            findings.push(
                Finding::warning(
                    FindingKind::UnparseableDate,
                    format!("unparseable {} date '{}'", label, text),
                )
                .at_line(date_record.line),
            );
            None
        }
    }
}

/// Resolve one pointer sub-record to a person id
fn resolve_pointer(
    record: &Record,
    by_xref: &HashMap<String, PersonId>,
    findings: &mut Vec<Finding>,
) -> Option<PersonId> {
    match record.pointer_value() {
        None => {
            findings.push(
                Finding::error(
                    FindingKind::InvalidFormat,
                    format!(
                        "{} value '{}' is not a cross-reference pointer",
                        record.tag,
                        record.value.as_deref().unwrap_or("")
                    ),
                )
                .at_line(record.line),
            );
            None
        }
        Some(target) => match by_xref.get(target) {
            Some(&id) => Some(id),
            None => {
                findings.push(
                    Finding::error(
                        FindingKind::BrokenReference,
                        format!(
                            "{} pointer @{}@ does not resolve to an individual",
                            record.tag, target
                        ),
                    )
                    .at_line(record.line),
                );
                None
            }
        },
    }
}

/// Resolve a spouse role that may appear more than once; extras degrade to
/// best effort with a warning
fn resolve_role(
    family: &Record,
    tag: &str,
    by_xref: &HashMap<String, PersonId>,
    findings: &mut Vec<Finding>,
) -> Option<PersonId> {
    let mut records = family.children_tagged(tag);
    let first = records.next()?;
    for extra in records {
        findings.push(
            Finding::warning(
                FindingKind::AmbiguousRole,
                format!("family has more than one {} record, using the first", tag),
            )
            .at_line(extra.line),
        );
    }
    resolve_pointer(first, by_xref, findings)
}

fn map_family(
    family: &Record,
    by_xref: &HashMap<String, PersonId>,
    relationships: &mut Vec<Relationship>,
    findings: &mut Vec<Finding>,
) {
    let husband = resolve_role(family, tags::HUSB, by_xref, findings);
    let wife = resolve_role(family, tags::WIFE, by_xref, findings);

    let marriage_date = family
        .child(tags::MARR)
        .and_then(|e| map_event_date(e, "marriage", findings));
    let divorce_date = family
        .child(tags::DIV)
        .and_then(|e| map_event_date(e, "divorce", findings));

    if let (Some(h), Some(w)) = (husband, wife) {
        relationships.push(Relationship::spouse(h, w, marriage_date, divorce_date));
    }

    for child_record in family.children_tagged(tags::CHIL) {
        let Some(child) = resolve_pointer(child_record, by_xref, findings) else {
            continue;
        };
        for parent in [husband, wife].into_iter().flatten() {
            relationships.push(Relationship::parent(parent, child));
        }
    }
}

/// Decode raw file bytes as UTF-8, replacing invalid sequences and reporting
/// the replacement as a finding
fn decode(bytes: &[u8]) -> (String, Option<Finding>) {
    match String::from_utf8_lossy(bytes) {
        std::borrow::Cow::Borrowed(s) => (s.to_string(), None),
        std::borrow::Cow::Owned(s) => (
            s,
            Some(Finding::warning(
                FindingKind::InvalidEncoding,
                "input is not valid UTF-8, invalid sequences were replaced",
            )),
        ),
    }
}

/// Successful import: the mapped graph plus the warnings to display
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutput {
    pub graph: FamilyGraph,
    pub warnings: Vec<Finding>,
}

/// Rejected import: nothing committed, full findings list attached
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRejection {
    pub findings: Vec<Finding>,
}

impl ImportRejection {
    /// Count of findings that caused the rejection
    pub fn blocking_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.is_error() || f.is_import_blocking())
            .count()
    }
}

impl std::fmt::Display for ImportRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} blocking findings out of {}",
            self.blocking_count(),
            self.findings.len()
        )
    }
}

/// Import raw GEDCOM bytes: decode, parse, validate, map.
///
/// The whole batch is rejected when any error-severity or import-blocking
/// finding is produced anywhere in the pipeline; partial commits never
/// happen. Warnings ride along with a successful result.
pub fn import_bytes(
    bytes: &[u8],
    config: &Config,
    progress: bool,
) -> std::result::Result<ImportOutput, ImportRejection> {
    let (text, encoding_finding) = decode(bytes);

    let tree = parse(&text);
    let mut findings: Vec<Finding> = encoding_finding.into_iter().collect();
    findings.extend(tree.findings.iter().cloned());
    findings.extend(validate(&tree));

    let mapped = ImportMapper::new().with_progress(progress).map(&tree);
    findings.extend(mapped.findings);

    let rejected = has_blocking(&findings)
        || (config.import.abort_on_warnings && !findings.is_empty());
    if rejected {
        Err(ImportRejection { findings })
    } else {
        Ok(ImportOutput {
            graph: mapped.graph,
            warnings: findings,
        })
    }
}

/// Dry-run preview of an import: counts plus the full findings list.
///
/// Never fails and mutates nothing; family counts are the clusters the
/// export mapper would reconstruct from the mapped edges.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Preview {
    pub people: usize,
    pub families: usize,
    pub findings: Vec<Finding>,
}

pub fn preview_bytes(bytes: &[u8]) -> Preview {
    let (text, encoding_finding) = decode(bytes);

    let tree = parse(&text);
    let mut findings: Vec<Finding> = encoding_finding.into_iter().collect();
    findings.extend(tree.findings.iter().cloned());
    findings.extend(validate(&tree));

    let mapped = ImportMapper::new().map(&tree);
    findings.extend(mapped.findings);

    let clusters = crate::export::build_clusters(&mapped.graph.relationships);

    Preview {
        people: mapped.graph.people.len(),
        families: clusters.len(),
        findings,
    }
}

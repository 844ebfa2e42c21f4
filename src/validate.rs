// Structural validation of a parsed record tree.
//
// The validator is pure: it walks the tree, mutates nothing, and reports
// findings in a deterministic order so repeated runs over the same text
// produce identical lists.

use crate::model::{Finding, FindingKind};
use crate::parser::{tags, ParseTree, Record};
use std::collections::HashMap;

/// Pointer-carrying tags and the record kind their target must have
const POINTER_TAGS: &[(&str, &str)] = &[
    (tags::HUSB, tags::INDI),
    (tags::WIFE, tags::INDI),
    (tags::CHIL, tags::INDI),
    ("FAMC", tags::FAM),
    ("FAMS", tags::FAM),
];

/// Validate a parse tree, returning findings in check order: header, pointer
/// resolution, duplicate ids, record shapes.
pub fn validate(tree: &ParseTree) -> Vec<Finding> {
    let mut findings = Vec::new();

    check_header(tree, &mut findings);

    let (definitions, duplicates) = collect_definitions(tree);
    check_pointers(tree, &definitions, &mut findings);
    findings.extend(duplicates);

    check_record_shapes(tree, &mut findings);

    findings
}

/// Pre-order walk over every record in the tree, without recursion
fn all_records(tree: &ParseTree) -> Vec<&Record> {
    let mut out = Vec::new();
    let mut stack: Vec<&Record> = tree.records.iter().rev().collect();
    while let Some(rec) = stack.pop() {
        out.push(rec);
        for child in rec.children.iter().rev() {
            stack.push(child);
        }
    }
    out
}

fn check_header(tree: &ParseTree, findings: &mut Vec<Finding>) {
    let headers = tree.count_tagged(tags::HEAD);
    if headers == 0 {
        findings.push(Finding::error(
            FindingKind::MissingHeader,
            "file has no header record",
        ));
    } else if headers > 1 {
        for extra in tree.records_tagged(tags::HEAD).skip(1) {
            findings.push(
                Finding::warning(FindingKind::DuplicateHeader, "more than one header record")
                    .at_line(extra.line),
            );
        }
    }

    if tree.count_tagged(tags::TRLR) == 0 {
        findings.push(Finding::warning(
            FindingKind::MissingTrailer,
            "file has no trailer record",
        ));
    }
}

/// First definition of each xref wins for resolution; later definitions are
/// reported as duplicates in file order.
fn collect_definitions(tree: &ParseTree) -> (HashMap<String, String>, Vec<Finding>) {
    let mut definitions: HashMap<String, String> = HashMap::new();
    let mut duplicates = Vec::new();

    for rec in all_records(tree) {
        if let Some(xref) = &rec.xref {
            if definitions.contains_key(xref) {
                duplicates.push(
                    Finding::warning(
                        FindingKind::DuplicateXref,
                        format!("cross-reference id @{}@ defined more than once", xref),
                    )
                    .at_line(rec.line),
                );
            } else {
                definitions.insert(xref.clone(), rec.tag.clone());
            }
        }
    }

    (definitions, duplicates)
}

fn check_pointers(
    tree: &ParseTree,
    definitions: &HashMap<String, String>,
    findings: &mut Vec<Finding>,
) {
    for rec in all_records(tree) {
        let Some(target) = rec.pointer_value() else {
            continue;
        };

        match definitions.get(target) {
            None => {
                findings.push(
                    Finding::error(
                        FindingKind::BrokenReference,
                        format!("pointer @{}@ does not resolve to any record", target),
                    )
                    .at_line(rec.line),
                );
            }
            Some(actual_kind) => {
                let expected = POINTER_TAGS
                    .iter()
                    .find(|(tag, _)| *tag == rec.tag)
                    .map(|(_, kind)| *kind);
                if let Some(expected) = expected {
                    if actual_kind != expected {
                        findings.push(
                            Finding::error(
                                FindingKind::TypeMismatch,
                                format!(
                                    "{} pointer @{}@ resolves to a {} record, expected {}",
                                    rec.tag, target, actual_kind, expected
                                ),
                            )
                            .at_line(rec.line),
                        );
                    }
                }
            }
        }
    }
}

fn check_record_shapes(tree: &ParseTree, findings: &mut Vec<Finding>) {
    for rec in &tree.records {
        match rec.tag.as_str() {
            tags::HEAD | tags::TRLR => {}
            tags::INDI | tags::FAM => {
                if rec.children.is_empty() {
                    findings.push(
                        Finding::warning(
                            FindingKind::EmptyRecord,
                            format!("{} record with no sub-records", rec.tag),
                        )
                        .at_line(rec.line),
                    );
                }
            }
            other => {
                findings.push(
                    Finding::warning(
                        FindingKind::UnrecognizedTag,
                        format!("unrecognized top-level record tag '{}'", other),
                    )
                    .at_line(rec.line),
                );
            }
        }
    }
}

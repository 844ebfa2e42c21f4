// Record tree reconstruction from the flat line stream.
//
// Nesting is implicit in the level numbers, so the parser keeps an explicit
// stack of open-ancestor arena indices instead of recursing. Pathological
// inputs (thousands of flat records, or a deep level chain) cost vector
// growth, never call-stack depth.

use crate::model::{Finding, FindingKind};
use crate::parser::line::{tokenize, LineError, RawLine};
use serde::{Deserialize, Serialize};

/// A parsed GEDCOM record with its nested sub-records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Literal level number from the file
    pub level: usize,
    /// Cross-reference id this record defines, without delimiters
    pub xref: Option<String>,
    pub tag: String,
    pub value: Option<String>,
    /// 1-based source line number
    pub line: usize,
    pub children: Vec<Record>,
}

impl Record {
    fn from_raw(raw: RawLine, line: usize) -> Self {
        Self {
            level: raw.level,
            xref: raw.xref,
            tag: raw.tag,
            value: raw.value,
            line,
            children: Vec::new(),
        }
    }

    /// First child with the given tag
    pub fn child(&self, tag: &str) -> Option<&Record> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// All children with the given tag, in file order
    pub fn children_tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Record> {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// Value of the first child with the given tag
    pub fn child_value(&self, tag: &str) -> Option<&str> {
        self.child(tag).and_then(|c| c.value.as_deref())
    }

    /// This record's value when it is shaped like a pointer (`@...@`),
    /// returned without the delimiters
    pub fn pointer_value(&self) -> Option<&str> {
        let value = self.value.as_deref()?.trim();
        if crate::parser::line::is_xref_token(value) {
            Some(&value[1..value.len() - 1])
        } else {
            None
        }
    }
}

/// The parsed file: ordered level-0 records plus findings collected while
/// parsing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseTree {
    pub records: Vec<Record>,
    pub findings: Vec<Finding>,
}

impl ParseTree {
    /// Top-level records with the given tag
    pub fn records_tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Record> {
        self.records.iter().filter(move |r| r.tag == tag)
    }

    /// Count of top-level records with the given tag
    pub fn count_tagged(&self, tag: &str) -> usize {
        self.records_tagged(tag).count()
    }
}

/// Parse raw text into a record tree.
///
/// Never fails: malformed lines become findings and the maximal tree
/// extractable from the well-formed lines is returned.
pub fn parse(text: &str) -> ParseTree {
    let mut findings = Vec::new();

    // Arena of nodes plus parent indices; children are materialized at the end
    let mut nodes: Vec<Record> = Vec::new();
    let mut parent_of: Vec<Option<usize>> = Vec::new();
    // Indices of currently open ancestors, levels strictly increasing
    let mut open: Vec<usize> = Vec::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let raw = match tokenize(raw_line) {
            Ok(raw) => raw,
            Err(LineError::Blank) => {
                findings.push(
                    Finding::warning(FindingKind::MalformedLine, "blank line").at_line(line_no),
                );
                continue;
            }
            Err(LineError::NoLevel(token)) => {
                findings.push(
                    Finding::warning(
                        FindingKind::MalformedLine,
                        format!("line does not start with a level number: '{}'", token),
                    )
                    .at_line(line_no),
                );
                continue;
            }
            Err(LineError::NoTag) => {
                findings.push(
                    Finding::warning(FindingKind::MalformedLine, "line has no tag")
                        .at_line(line_no),
                );
                continue;
            }
        };

        // Close every open record at or below this level
        while open
            .last()
            .is_some_and(|&i| nodes[i].level >= raw.level)
        {
            open.pop();
        }

        let parent = open.last().copied();
        let expected = parent.map_or(0, |i| nodes[i].level + 1);
        if raw.level > expected {
            findings.push(
                Finding::warning(
                    FindingKind::LevelJump,
                    format!(
                        "level {} follows level {}, attaching to nearest ancestor",
                        raw.level,
                        expected.saturating_sub(1)
                    ),
                )
                .at_line(line_no),
            );
        }

        let node_idx = nodes.len();
        nodes.push(Record::from_raw(raw, line_no));
        parent_of.push(parent);
        open.push(node_idx);
    }

    ParseTree {
        records: materialize(nodes, parent_of),
        findings,
    }
}

/// Assemble the child vectors without recursion. Children always carry a
/// larger arena index than their parent, so a reverse pass sees every child
/// completed before its parent is assembled.
fn materialize(nodes: Vec<Record>, parent_of: Vec<Option<usize>>) -> Vec<Record> {
    let n = nodes.len();
    let mut child_indices: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, parent) in parent_of.iter().enumerate() {
        if let Some(p) = parent {
            child_indices[*p].push(i);
        }
    }

    let mut slots: Vec<Option<Record>> = nodes.into_iter().map(Some).collect();
    for i in (0..n).rev() {
        let children: Vec<Record> = child_indices[i]
            .iter()
            .map(|&c| slots[c].take().expect("child already taken"))
            .collect();
        if let Some(rec) = slots[i].as_mut() {
            rec.children = children;
        }
    }

    let mut roots = Vec::new();
    for (i, parent) in parent_of.iter().enumerate() {
        if parent.is_none() {
            if let Some(rec) = slots[i].take() {
                roots.push(rec);
            }
        }
    }
    roots
}

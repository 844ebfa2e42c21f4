// Diagnostics produced while parsing, validating, and mapping GEDCOM data.
//
// Findings never abort processing on their own; callers decide what severity
// they can tolerate. The import entry point treats blocking kinds as fatal
// for the whole batch.

use serde::{Deserialize, Serialize};

/// How serious a finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Downstream processing cannot rely on the affected data
    Error,
    /// Degraded but usable; reported for display
    Warning,
}

/// What category of problem a finding describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// Line had no parseable level number or no tag
    MalformedLine,
    /// A line's level skipped past its parent's level plus one
    LevelJump,
    /// No header record in the file
    MissingHeader,
    /// More than one header record
    DuplicateHeader,
    /// No trailer record at the end of the file
    MissingTrailer,
    /// The same cross-reference id defined by more than one record
    DuplicateXref,
    /// Top-level record tag this subsystem does not map
    UnrecognizedTag,
    /// Recognized record with no sub-records at all
    EmptyRecord,
    /// Pointer value that resolves to no record
    BrokenReference,
    /// Pointer value that resolves to a record of the wrong kind
    TypeMismatch,
    /// Record contents that cannot be mapped at all
    InvalidFormat,
    /// Date text that could not be parsed
    UnparseableDate,
    /// Family role that could not be assigned cleanly
    AmbiguousRole,
    /// Input bytes were not valid UTF-8 and were replaced
    InvalidEncoding,
    /// Relationship edge referencing an unknown person, skipped on export
    SkippedEdge,
}

impl FindingKind {
    /// Kinds that block an import batch entirely
    pub fn is_import_blocking(&self) -> bool {
        matches!(self, FindingKind::BrokenReference | FindingKind::InvalidFormat)
    }
}

/// A single diagnostic with severity, kind, message, and source location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub kind: FindingKind,
    pub message: String,
    /// 1-based source line, when the finding maps to one
    pub line: Option<usize>,
}

impl Finding {
    /// Create an error-severity finding
    pub fn error(kind: FindingKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            message: message.into(),
            line: None,
        }
    }

    /// Create a warning-severity finding
    pub fn warning(kind: FindingKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            message: message.into(),
            line: None,
        }
    }

    /// Attach a source line number
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Check if this finding is error severity
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Check if this finding blocks an import batch
    pub fn is_import_blocking(&self) -> bool {
        self.kind.is_import_blocking()
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sev = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        match self.line {
            Some(line) => write!(f, "{} (line {}): {}", sev, line, self.message),
            None => write!(f, "{}: {}", sev, self.message),
        }
    }
}

/// Count error-severity findings in a list
pub fn error_count(findings: &[Finding]) -> usize {
    findings.iter().filter(|f| f.is_error()).count()
}

/// Check whether any finding in a list blocks an import batch
pub fn has_blocking(findings: &[Finding]) -> bool {
    findings.iter().any(|f| f.is_error() || f.is_import_blocking())
}

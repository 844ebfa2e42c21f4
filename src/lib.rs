//! Kinship - Import and export GEDCOM family-tree files
//!
//! Parses the line-oriented GEDCOM interchange format into a validated
//! internal family graph (people plus directed relationship edges) and
//! serializes that graph back out, tolerating malformed or semantically
//! inconsistent input without crashing.

pub mod cli;
pub mod config;
pub mod dates;
pub mod error;
pub mod export;
pub mod import;
pub mod model;
pub mod output;
pub mod parser;
pub mod validate;

// Re-export main types
pub use config::Config;
pub use error::{Error, Result};
pub use export::{ExportMapper, ExportOutput, FamilyCluster};
pub use import::{import_bytes, preview_bytes, ImportMapper, ImportOutput, ImportRejection};
pub use model::{
    FamilyGraph, Finding, FindingKind, Gender, Person, PersonId, Relationship, RelationshipKind,
    Severity,
};
pub use output::{Generator, GeneratorOptions};
pub use parser::{parse, ParseTree, Record};
pub use validate::validate;

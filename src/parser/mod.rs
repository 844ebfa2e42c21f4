// Parser module: GEDCOM line tokenizer and record-tree builder

pub mod line;
pub mod tree;

pub use line::{is_xref_token, tokenize, LineError, RawLine};
pub use tree::{parse, ParseTree, Record};

/// Tags recognized by this subsystem. Everything else is tolerated on input
/// and never emitted on output.
pub mod tags {
    pub const HEAD: &str = "HEAD";
    pub const TRLR: &str = "TRLR";
    pub const INDI: &str = "INDI";
    pub const FAM: &str = "FAM";

    pub const NAME: &str = "NAME";
    pub const GIVN: &str = "GIVN";
    pub const SURN: &str = "SURN";
    pub const SEX: &str = "SEX";
    pub const BIRT: &str = "BIRT";
    pub const DEAT: &str = "DEAT";
    pub const DATE: &str = "DATE";
    pub const PLAC: &str = "PLAC";

    pub const HUSB: &str = "HUSB";
    pub const WIFE: &str = "WIFE";
    pub const CHIL: &str = "CHIL";
    pub const MARR: &str = "MARR";
    pub const DIV: &str = "DIV";

    pub const SOUR: &str = "SOUR";
    pub const VERS: &str = "VERS";
    pub const GEDC: &str = "GEDC";
    pub const CHAR: &str = "CHAR";
}

// GEDCOM text generation.
//
// The generator is a pure formatter: it performs no validation and assumes
// its input already went through the export mapper. Only tags this subsystem
// recognizes are emitted.

use crate::dates::format_date;
use crate::export::{FamilyRecord, IndividualRecord};
use crate::parser::tags;
use chrono::NaiveDate;

/// Options controlling the generated header
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorOptions {
    /// Producing-application name for the SOUR line
    pub source_name: String,
    /// Producing-application version
    pub source_version: String,
    /// GEDCOM version advertised in the GEDC block
    pub gedcom_version: String,
    /// Header date; today when not set
    pub date: Option<NaiveDate>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            source_name: "KINSHIP".to_string(),
            source_version: env!("CARGO_PKG_VERSION").to_string(),
            gedcom_version: "5.5.1".to_string(),
            date: None,
        }
    }
}

/// Serializes mapped records back into GEDCOM text
#[derive(Debug, Default)]
pub struct Generator {
    options: GeneratorOptions,
}

impl Generator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    /// Generate the complete file: header, records, trailer
    pub fn generate(
        &self,
        individuals: &[IndividualRecord],
        families: &[FamilyRecord],
    ) -> String {
        let mut lines = Vec::new();

        self.push_header(&mut lines);
        for individual in individuals {
            push_individual(&mut lines, individual);
        }
        for family in families {
            push_family(&mut lines, family);
        }
        lines.push(format!("0 {}", tags::TRLR));

        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    fn push_header(&self, lines: &mut Vec<String>) {
        let date = self
            .options
            .date
            .unwrap_or_else(|| chrono::Local::now().date_naive());

        lines.push(format!("0 {}", tags::HEAD));
        lines.push(format!("1 {} {}", tags::SOUR, self.options.source_name));
        lines.push(format!("2 {} {}", tags::VERS, self.options.source_version));
        lines.push(format!("1 {} {}", tags::DATE, format_date(date)));
        lines.push(format!("1 {}", tags::GEDC));
        lines.push(format!("2 {} {}", tags::VERS, self.options.gedcom_version));
        lines.push(format!("1 {} UTF-8", tags::CHAR));
    }
}

fn push_individual(lines: &mut Vec<String>, record: &IndividualRecord) {
    let person = &record.person;
    lines.push(format!("0 @{}@ {}", record.xref, tags::INDI));
    lines.push(format!("1 {} {}", tags::NAME, person.gedcom_name()));
    if let Some(alternate) = &person.alternate_name {
        lines.push(format!("1 {} {}", tags::NAME, alternate));
    }
    if let Some(gender) = person.gender {
        lines.push(format!("1 {} {}", tags::SEX, gender.to_gedcom()));
    }

    if person.birth_date.is_some() || person.birth_place.is_some() {
        lines.push(format!("1 {}", tags::BIRT));
        if let Some(date) = person.birth_date {
            lines.push(format!("2 {} {}", tags::DATE, format_date(date)));
        }
        if let Some(place) = &person.birth_place {
            lines.push(format!("2 {} {}", tags::PLAC, place));
        }
    }

    if !person.living {
        lines.push(format!("1 {}", tags::DEAT));
        if let Some(date) = person.death_date {
            lines.push(format!("2 {} {}", tags::DATE, format_date(date)));
        }
    }
}

fn push_family(lines: &mut Vec<String>, record: &FamilyRecord) {
    lines.push(format!("0 @{}@ {}", record.xref, tags::FAM));
    if let Some(husband) = &record.husband {
        lines.push(format!("1 {} @{}@", tags::HUSB, husband));
    }
    if let Some(wife) = &record.wife {
        lines.push(format!("1 {} @{}@", tags::WIFE, wife));
    }
    for child in &record.children {
        lines.push(format!("1 {} @{}@", tags::CHIL, child));
    }
    if let Some(date) = record.marriage_date {
        lines.push(format!("1 {}", tags::MARR));
        lines.push(format!("2 {} {}", tags::DATE, format_date(date)));
    }
    if let Some(date) = record.divorce_date {
        lines.push(format!("1 {}", tags::DIV));
        lines.push(format!("2 {} {}", tags::DATE, format_date(date)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Gender, Person, PersonId};

    fn options() -> GeneratorOptions {
        GeneratorOptions {
            source_name: "KINSHIP".to_string(),
            source_version: "0.1.0".to_string(),
            gedcom_version: "5.5.1".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 8, 6),
        }
    }

    fn individual(xref: &str, first: &str, last: &str) -> IndividualRecord {
        IndividualRecord {
            xref: xref.to_string(),
            person: Person::new(PersonId(1), first, last),
        }
    }

    #[test]
    fn test_header_and_trailer() {
        let text = Generator::new(options()).generate(&[], &[]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "0 HEAD",
                "1 SOUR KINSHIP",
                "2 VERS 0.1.0",
                "1 DATE 6 AUG 2026",
                "1 GEDC",
                "2 VERS 5.5.1",
                "1 CHAR UTF-8",
                "0 TRLR",
            ]
        );
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_individual_block() {
        let mut record = individual("I1", "John", "Doe");
        record.person.gender = Some(Gender::Male);
        record.person.birth_date = NaiveDate::from_ymd_opt(1990, 1, 2);
        record.person.birth_place = Some("Springfield".to_string());

        let text = Generator::new(options()).generate(&[record], &[]);
        assert!(text.contains("0 @I1@ INDI\n"));
        assert!(text.contains("1 NAME John /Doe/\n"));
        assert!(text.contains("1 SEX M\n"));
        assert!(text.contains("1 BIRT\n2 DATE 2 JAN 1990\n2 PLAC Springfield\n"));
        assert!(!text.contains("DEAT"));
    }

    #[test]
    fn test_death_block_for_non_living() {
        let mut record = individual("I1", "Jane", "Roe");
        record.person.living = false;
        record.person.death_date = NaiveDate::from_ymd_opt(1999, 12, 31);

        let text = Generator::new(options()).generate(&[record], &[]);
        assert!(text.contains("1 DEAT\n2 DATE 31 DEC 1999\n"));
    }

    #[test]
    fn test_death_without_date() {
        let mut record = individual("I1", "Jane", "Roe");
        record.person.living = false;

        let text = Generator::new(options()).generate(&[record], &[]);
        assert!(text.contains("1 DEAT\n"));
        assert!(!text.contains("DEAT\n2 DATE"));
    }

    #[test]
    fn test_alternate_name_emitted() {
        let mut record = individual("I1", "John", "Doe");
        record.person.alternate_name = Some("Johnny D".to_string());

        let text = Generator::new(options()).generate(&[record], &[]);
        assert!(text.contains("1 NAME John /Doe/\n1 NAME Johnny D\n"));
    }

    #[test]
    fn test_family_block() {
        let family = FamilyRecord {
            xref: "F1".to_string(),
            husband: Some("I1".to_string()),
            wife: Some("I2".to_string()),
            children: vec!["I3".to_string(), "I4".to_string()],
            marriage_date: NaiveDate::from_ymd_opt(1988, 6, 1),
            divorce_date: None,
        };

        let text = Generator::new(options()).generate(&[], &[family]);
        assert!(text.contains(
            "0 @F1@ FAM\n1 HUSB @I1@\n1 WIFE @I2@\n1 CHIL @I3@\n1 CHIL @I4@\n1 MARR\n2 DATE 1 JUN 1988\n"
        ));
    }

    #[test]
    fn test_single_parent_family_block() {
        let family = FamilyRecord {
            xref: "F1".to_string(),
            husband: None,
            wife: Some("I1".to_string()),
            children: vec!["I2".to_string()],
            marriage_date: None,
            divorce_date: None,
        };

        let text = Generator::new(options()).generate(&[], &[family]);
        assert!(text.contains("0 @F1@ FAM\n1 WIFE @I1@\n1 CHIL @I2@\n"));
        assert!(!text.contains("HUSB"));
        assert!(!text.contains("MARR"));
    }

    #[test]
    fn test_divorce_block() {
        let family = FamilyRecord {
            xref: "F1".to_string(),
            husband: Some("I1".to_string()),
            wife: Some("I2".to_string()),
            children: vec![],
            marriage_date: NaiveDate::from_ymd_opt(1988, 6, 1),
            divorce_date: NaiveDate::from_ymd_opt(2001, 3, 15),
        };

        let text = Generator::new(options()).generate(&[], &[family]);
        assert!(text.contains("1 DIV\n2 DATE 15 MAR 2001\n"));
    }

    #[test]
    fn test_output_reparses_cleanly() {
        let mut record = individual("I1", "John", "Doe");
        record.person.gender = Some(Gender::Male);
        record.person.birth_date = NaiveDate::from_ymd_opt(1990, 1, 2);

        let family = FamilyRecord {
            xref: "F1".to_string(),
            husband: Some("I1".to_string()),
            wife: None,
            children: vec![],
            marriage_date: None,
            divorce_date: None,
        };

        let text = Generator::new(options()).generate(&[record], &[family]);
        let tree = crate::parser::parse(&text);
        assert!(tree.findings.is_empty());
        let findings = crate::validate::validate(&tree);
        assert!(
            findings.iter().all(|f| !f.is_error()),
            "generated output must validate cleanly: {:?}",
            findings
        );
    }
}

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub producer: ProducerConfig,
    pub import: ImportConfig,
    pub export: ExportConfig,
}

/// Identity emitted in generated file headers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProducerConfig {
    pub name: String,
    pub version: String,
}

/// Import settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Reject the batch when any finding at all is produced, warnings included
    pub abort_on_warnings: bool,
    /// Maximum findings printed in text reports
    pub max_displayed_findings: usize,
}

/// Export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// GEDCOM version advertised in generated headers
    pub gedcom_version: String,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            name: "KINSHIP".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            abort_on_warnings: false,
            max_displayed_findings: 50,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            gedcom_version: "5.5.1".to_string(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file or return defaults
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    pub fn merge_cli(&mut self, producer: Option<String>, abort_on_warnings: bool) {
        if let Some(name) = producer {
            self.producer.name = name;
        }

        if abort_on_warnings {
            self.import.abort_on_warnings = true;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.producer.name.trim().is_empty() {
            return Err(Error::config_validation("producer name must not be empty"));
        }

        if self.export.gedcom_version.trim().is_empty() {
            return Err(Error::config_validation("gedcom_version must not be empty"));
        }

        if self.import.max_displayed_findings == 0 {
            return Err(Error::config_validation(
                "max_displayed_findings must be at least 1",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.producer.name, "KINSHIP");
        assert_eq!(config.export.gedcom_version, "5.5.1");
        assert!(!config.import.abort_on_warnings);
        assert_eq!(config.import.max_displayed_findings, 50);
    }

    #[test]
    fn test_load_valid_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[producer]
name = "MyTree"
version = "2.0"

[import]
abort_on_warnings = true

[export]
gedcom_version = "5.5"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.producer.name, "MyTree");
        assert_eq!(config.producer.version, "2.0");
        assert!(config.import.abort_on_warnings);
        assert_eq!(config.export.gedcom_version, "5.5");
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let config = Config::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.producer.name, "KINSHIP");
    }

    #[test]
    fn test_validation_empty_producer_name() {
        let mut config = Config::default();
        config.producer.name = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_empty_gedcom_version() {
        let mut config = Config::default();
        config.export.gedcom_version = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_display_limit() {
        let mut config = Config::default();
        config.import.max_displayed_findings = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_merge_cli_producer() {
        let mut config = Config::default();
        config.merge_cli(Some("OtherApp".to_string()), false);
        assert_eq!(config.producer.name, "OtherApp");
    }

    #[test]
    fn test_merge_cli_abort_on_warnings() {
        let mut config = Config::default();
        config.merge_cli(None, true);
        assert!(config.import.abort_on_warnings);
    }

    #[test]
    fn test_merge_cli_flag_does_not_unset() {
        let mut config = Config::default();
        config.import.abort_on_warnings = true;
        config.merge_cli(None, false);
        assert!(config.import.abort_on_warnings);
    }

    #[test]
    fn test_partial_config_parses() {
        let toml_str = r#"
[producer]
name = "Partial"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.producer.name, "Partial");
        assert_eq!(config.export.gedcom_version, "5.5.1");
    }
}

use crate::domain::model::AlignMode;
use crate::utils::error::{ConvertError, Result};
use crate::utils::validation::{validate_file_name, validate_non_empty_string, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// Optional settings file, e.g.
///
/// ```toml
/// [files]
/// record_file = "Game.po"
/// table_file = "localization.csv"
///
/// [conversion]
/// primary_language = "en"
/// align = "keyed"
/// escape_strings = true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub files: Option<FilesConfig>,
    pub conversion: Option<ConversionConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilesConfig {
    pub record_file: Option<String>,
    pub table_file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConversionConfig {
    pub primary_language: Option<String>,
    pub align: Option<AlignMode>,
    pub escape_strings: Option<bool>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConvertError::io_at(path, e))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ConvertError::ConfigParse {
            field: "toml_parsing".to_string(),
            message: e.to_string(),
        })
    }

    /// Replaces `${VAR}` with the value of the environment variable. Unset
    /// variables are left untouched.
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn record_file(&self) -> Option<&str> {
        self.files.as_ref()?.record_file.as_deref()
    }

    pub fn table_file(&self) -> Option<&str> {
        self.files.as_ref()?.table_file.as_deref()
    }

    pub fn primary_language(&self) -> Option<&str> {
        self.conversion.as_ref()?.primary_language.as_deref()
    }

    pub fn align(&self) -> Option<AlignMode> {
        self.conversion.as_ref()?.align
    }

    pub fn escape_strings(&self) -> Option<bool> {
        self.conversion.as_ref()?.escape_strings
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(name) = self.record_file() {
            validate_file_name("files.record_file", name)?;
        }
        if let Some(name) = self.table_file() {
            validate_file_name("files.table_file", name)?;
        }
        if let Some(language) = self.primary_language() {
            validate_non_empty_string("conversion.primary_language", language)?;
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
    fn test_parse_full_config() {
        let toml_content = r#"
[files]
record_file = "Strings.po"
table_file = "strings.csv"

[conversion]
primary_language = "en"
align = "positional"
escape_strings = false
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.record_file(), Some("Strings.po"));
        assert_eq!(config.table_file(), Some("strings.csv"));
        assert_eq!(config.primary_language(), Some("en"));
        assert_eq!(config.align(), Some(AlignMode::Positional));
        assert_eq!(config.escape_strings(), Some(false));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.record_file(), None);
        assert_eq!(config.align(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PO_TABLE_TEST_PRIMARY", "ja");

        let toml_content = r#"
[conversion]
primary_language = "${PO_TABLE_TEST_PRIMARY}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.primary_language(), Some("ja"));

        std::env::remove_var("PO_TABLE_TEST_PRIMARY");
    }

    #[test]
    fn test_unknown_keys_and_bad_values_are_rejected() {
        assert!(TomlConfig::from_toml_str("[files]\nrecord = \"Game.po\"\n").is_err());
        assert!(TomlConfig::from_toml_str("[conversion]\nalign = \"fuzzy\"\n").is_err());
    }

    #[test]
    fn test_config_validation() {
        let config = TomlConfig::from_toml_str("[files]\nrecord_file = \"../Game.po\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[files]\ntable_file = \"export.csv\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.table_file(), Some("export.csv"));
    }
}

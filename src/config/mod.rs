pub mod cli;
pub mod toml_config;

use crate::domain::model::{AlignMode, Direction};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_name, validate_non_empty_string, validate_root_dir, Validate,
};
use std::path::PathBuf;
use toml_config::TomlConfig;

pub const DEFAULT_RECORD_FILE: &str = "Game.po";
pub const DEFAULT_TABLE_FILE: &str = "localization.csv";

/// Fully resolved settings for one conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub root: PathBuf,
    pub direction: Direction,
    pub record_file: String,
    pub table_file: String,
    pub primary_language: Option<String>,
    pub align_mode: AlignMode,
    pub escape_strings: bool,
}

impl Settings {
    pub fn new(root: impl Into<PathBuf>, direction: Direction) -> Self {
        Self {
            root: root.into(),
            direction,
            record_file: DEFAULT_RECORD_FILE.to_string(),
            table_file: DEFAULT_TABLE_FILE.to_string(),
            primary_language: None,
            align_mode: AlignMode::default(),
            escape_strings: true,
        }
    }

    /// Overlays the values present in a settings file.
    pub fn with_toml(mut self, config: &TomlConfig) -> Self {
        if let Some(name) = config.record_file() {
            self.record_file = name.to_string();
        }
        if let Some(name) = config.table_file() {
            self.table_file = name.to_string();
        }
        if let Some(language) = config.primary_language() {
            self.primary_language = Some(language.to_string());
        }
        if let Some(align) = config.align() {
            self.align_mode = align;
        }
        if let Some(escape) = config.escape_strings() {
            self.escape_strings = escape;
        }
        self
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_root_dir("root", &self.root)?;
        validate_file_name("record_file", &self.record_file)?;
        validate_file_name("table_file", &self.table_file)?;
        if let Some(language) = &self.primary_language {
            validate_non_empty_string("primary_language", language)?;
        }
        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn record_file_name(&self) -> &str {
        &self.record_file
    }

    fn table_file_name(&self) -> &str {
        &self.table_file
    }

    fn primary_language(&self) -> Option<&str> {
        self.primary_language.as_deref()
    }

    fn align_mode(&self) -> AlignMode {
        self.align_mode
    }

    fn escape_strings(&self) -> bool {
        self.escape_strings
    }
}

#[cfg(feature = "cli")]
pub use self::cli_args::CliConfig;

#[cfg(feature = "cli")]
mod cli_args {
    use super::{Settings, TomlConfig};
    use crate::domain::model::{AlignMode, Direction};
    use crate::utils::error::Result;
    use crate::utils::logger::LogFormat;
    use crate::utils::validation::Validate;
    use clap::Parser;
    use std::path::PathBuf;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "po-table")]
    #[command(about = "Convert per-language gettext files to one localization CSV and back")]
    pub struct CliConfig {
        /// Directory holding one subdirectory per language and the table file
        pub root: PathBuf,

        /// `po2csv` builds the table; anything else (e.g. `csv2po`) rebuilds the language files
        pub direction: String,

        /// Optional TOML settings file
        #[arg(short, long)]
        pub config: Option<PathBuf>,

        /// Language whose file defines row order and metadata
        #[arg(long)]
        pub primary: Option<String>,

        /// How secondary languages are matched to primary records
        #[arg(long, value_enum)]
        pub align: Option<AlignMode>,

        /// Read and write msgctxt/msgid/msgstr text verbatim, without gettext escapes
        #[arg(long)]
        pub no_escape: bool,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, value_enum, default_value = "compact")]
        pub log_format: LogFormat,
    }

    impl CliConfig {
        /// Merges defaults, the optional settings file, and command line flags,
        /// in increasing order of precedence.
        pub fn to_settings(&self) -> Result<Settings> {
            let mut settings = Settings::new(&self.root, Direction::from_arg(&self.direction));

            if let Some(path) = &self.config {
                tracing::info!("Loading settings from {}", path.display());
                let file_config = TomlConfig::from_file(path)?;
                file_config.validate()?;
                settings = settings.with_toml(&file_config);
            }

            if let Some(primary) = &self.primary {
                settings.primary_language = Some(primary.clone());
            }
            if let Some(align) = self.align {
                settings.align_mode = align;
            }
            if self.no_escape {
                settings.escape_strings = false;
            }

            Ok(settings)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::io::Write;
        use tempfile::NamedTempFile;

        #[test]
        fn test_positional_arguments() {
            let cli = CliConfig::parse_from(["po-table", "/data/loc", "po2csv"]);
            let settings = cli.to_settings().unwrap();

            assert_eq!(settings.root, PathBuf::from("/data/loc"));
            assert_eq!(settings.direction, Direction::Po2Csv);
            assert_eq!(settings.record_file, "Game.po");
            assert_eq!(settings.table_file, "localization.csv");
            assert_eq!(settings.align_mode, AlignMode::Keyed);
            assert!(settings.escape_strings);
        }

        #[test]
        fn test_missing_direction_is_rejected() {
            assert!(CliConfig::try_parse_from(["po-table", "/data/loc"]).is_err());
        }

        #[test]
        fn test_flags_override_settings_file() {
            let mut file = NamedTempFile::new().unwrap();
            file.write_all(
                b"[files]\nrecord_file = \"Strings.po\"\n[conversion]\nprimary_language = \"de\"\nalign = \"keyed\"\n",
            )
            .unwrap();

            let config_path = file.path().to_str().unwrap().to_string();
            let cli = CliConfig::parse_from([
                "po-table",
                "/data/loc",
                "csv2po",
                "--config",
                config_path.as_str(),
                "--primary",
                "en",
                "--align",
                "positional",
                "--no-escape",
            ]);
            let settings = cli.to_settings().unwrap();

            assert_eq!(settings.direction, Direction::Csv2Po);
            assert_eq!(settings.record_file, "Strings.po");
            assert_eq!(settings.primary_language.as_deref(), Some("en"));
            assert_eq!(settings.align_mode, AlignMode::Positional);
            assert!(!settings.escape_strings);
        }
    }
}

use crate::utils::error::{ConvertError, Result};
use serde::{Deserialize, Serialize};

/// Column names preceding the per-language columns in the table header.
pub const METADATA_HEADER: [&str; 5] = ["Key", "Source", "Source2", "msgctxt", "msgid"];
pub const METADATA_COLUMNS: usize = METADATA_HEADER.len();

/// One translatable string with its annotations and per-language text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub key: String,
    pub source_location: String,
    pub source_comment: String,
    pub context: String,
    pub source_text: String,
    /// One entry per language, in `LanguageSet` order.
    pub translations: Vec<String>,
}

impl Record {
    /// Flattens the record into a table row.
    pub fn to_row(&self) -> Vec<String> {
        let mut row = Vec::with_capacity(METADATA_COLUMNS + self.translations.len());
        row.push(self.key.clone());
        row.push(self.source_location.clone());
        row.push(self.source_comment.clone());
        row.push(self.context.clone());
        row.push(self.source_text.clone());
        row.extend(self.translations.iter().cloned());
        row
    }
}

/// Ordered language identifiers. The first entry is the primary language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageSet(Vec<String>);

impl LanguageSet {
    pub fn new(languages: Vec<String>) -> Self {
        Self(languages)
    }

    pub fn primary(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn position(&self, language: &str) -> Option<usize> {
        self.0.iter().position(|l| l == language)
    }

    /// Moves `language` to the front, keeping the relative order of the rest.
    pub fn with_primary(mut self, language: &str) -> Result<Self> {
        let index = self
            .position(language)
            .ok_or_else(|| ConvertError::ConfigError {
                message: format!(
                    "primary language '{}' not found among [{}]",
                    language,
                    self.0.join(", ")
                ),
            })?;
        let primary = self.0.remove(index);
        self.0.insert(0, primary);
        Ok(self)
    }
}

/// The flattened header-plus-rows representation of every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub languages: LanguageSet,
    pub rows: Vec<Record>,
}

impl Table {
    pub fn header(&self) -> Vec<String> {
        METADATA_HEADER
            .iter()
            .map(|s| s.to_string())
            .chain(self.languages.iter().map(str::to_string))
            .collect()
    }

    pub fn column_count(&self) -> usize {
        METADATA_COLUMNS + self.languages.len()
    }
}

/// A per-language record file read whole into memory.
#[derive(Debug, Clone)]
pub struct LanguageFile {
    pub language: String,
    pub path: String,
    pub content: String,
}

/// A rendered per-language record file waiting to be written.
#[derive(Debug, Clone)]
pub struct LanguageDocument {
    pub language: String,
    pub path: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum AlignMode {
    /// Join secondary languages to the primary one by record key.
    #[default]
    Keyed,
    /// Read secondary translations from the line index that closed the
    /// primary record.
    Positional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Po2Csv,
    Csv2Po,
}

impl Direction {
    /// Only the literal `po2csv` selects the forward direction.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "po2csv" {
            Direction::Po2Csv
        } else {
            if arg != "csv2po" {
                tracing::warn!("Unknown direction '{}', converting csv2po", arg);
            }
            Direction::Csv2Po
        }
    }
}

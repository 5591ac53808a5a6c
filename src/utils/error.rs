use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error on {path}: {source}")]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed table: {message}")]
    MalformedTable { message: String },

    #[error("Malformed record in {language} at line {line}: {message}")]
    MalformedRecord {
        language: String,
        line: usize,
        message: String,
    },

    #[error("Misaligned records in {language}: {message}")]
    MisalignedRecords { language: String, message: String },

    #[error("No language directories found under {path}")]
    NoLanguages { path: PathBuf },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to parse config {field}: {message}")]
    ConfigParse { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Table,
    Record,
    Alignment,
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    High,
    Critical,
}

impl ConvertError {
    pub fn io_at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::IoFailure {
            path: path.into(),
            source,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ConvertError::IoFailure { .. } | ConvertError::Io(_) => ErrorCategory::Io,
            ConvertError::Csv(_) | ConvertError::MalformedTable { .. } => ErrorCategory::Table,
            ConvertError::MalformedRecord { .. } => ErrorCategory::Record,
            ConvertError::MisalignedRecords { .. } | ConvertError::NoLanguages { .. } => {
                ErrorCategory::Alignment
            }
            ConvertError::ConfigError { .. }
            | ConvertError::InvalidConfigValue { .. }
            | ConvertError::ConfigParse { .. } => ErrorCategory::Config,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Io => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ConvertError::IoFailure { .. } | ConvertError::Io(_) => {
                "Check that the path exists and that you have read/write permission"
            }
            ConvertError::Csv(_) | ConvertError::MalformedTable { .. } => {
                "Make sure the table has the Key,Source,Source2,msgctxt,msgid header and one column per language"
            }
            ConvertError::MalformedRecord { .. } => {
                "Fix the quoted msgctxt/msgid/msgstr line reported above"
            }
            ConvertError::MisalignedRecords { .. } => {
                "Regenerate the language files from the same template so every language has the same keys"
            }
            ConvertError::NoLanguages { .. } => {
                "Create one subdirectory per language, each containing the record file"
            }
            ConvertError::ConfigError { .. }
            | ConvertError::InvalidConfigValue { .. }
            | ConvertError::ConfigParse { .. } => "Review the command line arguments and config file",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Io => format!("File system error: {}", self),
            ErrorCategory::Table => format!("Could not read the localization table: {}", self),
            ErrorCategory::Record => format!("Could not parse a translation file: {}", self),
            ErrorCategory::Alignment => format!("Language files do not line up: {}", self),
            ErrorCategory::Config => format!("Invalid configuration: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_errors_are_critical() {
        let err = ConvertError::io_at(
            "root/en/Game.po",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert_eq!(err.category(), ErrorCategory::Io);
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("root/en/Game.po"));
    }

    #[test]
    fn test_data_errors_exit_with_one() {
        let err = ConvertError::MisalignedRecords {
            language: "fr".to_string(),
            message: "missing key GREETING".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Alignment);
        assert_eq!(err.exit_code(), 1);
        assert!(err.user_friendly_message().contains("GREETING"));
    }
}

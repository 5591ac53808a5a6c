use crate::utils::error::{ConvertError, Result};
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_root_dir(field_name: &str, path: &Path) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| ConvertError::io_at(path, e))?;

    if !metadata.is_dir() {
        return Err(ConvertError::io_at(
            path,
            std::io::Error::other(format!("{} is not a directory", field_name)),
        ));
    }

    Ok(())
}

/// File names are joined onto the root or a language directory, so they must
/// stay a single path component.
pub fn validate_file_name(field_name: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ConvertError::InvalidConfigValue {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: "File name cannot be empty".to_string(),
        });
    }

    if name.contains('\0') {
        return Err(ConvertError::InvalidConfigValue {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: "File name contains null bytes".to_string(),
        });
    }

    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(ConvertError::InvalidConfigValue {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: "File name must not contain path separators".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConvertError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

use crate::domain::ports::Storage;
use crate::utils::error::{ConvertError, Result};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.base_path.join(path);
        fs::read(&full_path).map_err(|e| ConvertError::io_at(full_path, e))
    }

    async fn read_optional(&self, path: &str) -> Result<Option<Vec<u8>>> {
        let full_path = self.base_path.join(path);
        match fs::read(&full_path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ConvertError::io_at(full_path, e)),
        }
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.base_path.join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConvertError::io_at(parent, e))?;
        }

        fs::write(&full_path, data).map_err(|e| ConvertError::io_at(full_path, e))
    }

    async fn list_dirs(&self) -> Result<Vec<String>> {
        let entries =
            fs::read_dir(&self.base_path).map_err(|e| ConvertError::io_at(&self.base_path, e))?;

        let mut dirs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ConvertError::io_at(&self.base_path, e))?;
            let file_type = entry
                .file_type()
                .map_err(|e| ConvertError::io_at(entry.path(), e))?;
            if !file_type.is_dir() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) if name.starts_with('.') => {}
                Ok(name) => dirs.push(name),
                Err(name) => tracing::warn!("Skipping non UTF-8 directory {:?}", name),
            }
        }
        dirs.sort();
        Ok(dirs)
    }

    fn display_path(&self, path: &str) -> String {
        self.base_path.join(path).display().to_string()
    }
}

use crate::adapters::csv_table::write_table;
use crate::core::{ConfigProvider, LanguageFile, LanguageSet, Pipeline, Storage, Table};
use crate::domain::merger::merge;
use crate::utils::error::{ConvertError, Result};
use std::path::PathBuf;

/// Builds the localization table from every `<language>/<record file>`.
pub struct CollectPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> CollectPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    async fn discover_languages(&self) -> Result<LanguageSet> {
        let dirs = self.storage.list_dirs().await?;
        if dirs.is_empty() {
            return Err(ConvertError::NoLanguages {
                path: PathBuf::from(self.storage.display_path("")),
            });
        }

        let languages = LanguageSet::new(dirs);
        match self.config.primary_language() {
            Some(primary) => languages.with_primary(primary),
            None => Ok(languages),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CollectPipeline<S, C> {
    type Extracted = Vec<LanguageFile>;
    type Transformed = Table;

    async fn extract(&self) -> Result<Vec<LanguageFile>> {
        let languages = self.discover_languages().await?;
        tracing::info!(
            "Found {} languages: {}",
            languages.len(),
            languages.iter().collect::<Vec<_>>().join(", ")
        );

        let mut files = Vec::with_capacity(languages.len());
        for language in languages.iter() {
            let path = format!("{}/{}", language, self.config.record_file_name());
            let data = self.storage.read_file(&path).await?;
            let content = String::from_utf8(data).map_err(|e| {
                ConvertError::io_at(
                    self.storage.display_path(&path),
                    std::io::Error::new(std::io::ErrorKind::InvalidData, e),
                )
            })?;
            tracing::debug!("Read {} bytes from {}", content.len(), path);

            files.push(LanguageFile {
                language: language.to_string(),
                path,
                content,
            });
        }

        Ok(files)
    }

    async fn transform(&self, data: Vec<LanguageFile>) -> Result<Table> {
        let table = merge(
            &data,
            self.config.align_mode(),
            self.config.escape_strings(),
        )?;
        tracing::info!(
            "Merged {} records across {} languages ({:?} alignment)",
            table.rows.len(),
            table.languages.len(),
            self.config.align_mode()
        );
        Ok(table)
    }

    async fn load(&self, result: Table) -> Result<String> {
        let path = self.config.table_file_name();
        let data = write_table(&result)?;

        tracing::debug!("Writing table ({} bytes) to {}", data.len(), path);
        self.storage.write_file(path, &data).await?;

        Ok(self.storage.display_path(path))
    }
}

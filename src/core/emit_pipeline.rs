use crate::adapters::csv_table::read_table;
use crate::core::{ConfigProvider, LanguageDocument, Pipeline, Storage, Table};
use crate::domain::render::{preserved_header, render_document};
use crate::utils::error::{ConvertError, Result};
use crate::utils::validation::validate_file_name;

/// Rebuilds every `<language>/<record file>` named in the table header.
pub struct EmitPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> EmitPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    async fn existing_header(&self, path: &str) -> Result<String> {
        let Some(data) = self.storage.read_optional(path).await? else {
            tracing::debug!("{} does not exist yet, no header to keep", path);
            return Ok(String::new());
        };
        let content = String::from_utf8(data).map_err(|e| {
            ConvertError::io_at(
                self.storage.display_path(path),
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })?;
        Ok(preserved_header(&content).to_string())
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for EmitPipeline<S, C> {
    type Extracted = Table;
    type Transformed = Vec<LanguageDocument>;

    async fn extract(&self) -> Result<Table> {
        let path = self.config.table_file_name();
        let data = self.storage.read_file(path).await?;
        let table = read_table(&data)?;

        tracing::info!(
            "Read {} rows for {} languages from {}",
            table.rows.len(),
            table.languages.len(),
            path
        );
        Ok(table)
    }

    async fn transform(&self, data: Table) -> Result<Vec<LanguageDocument>> {
        let mut documents = Vec::with_capacity(data.languages.len());

        for (column, language) in data.languages.iter().enumerate() {
            validate_file_name("language", language)?;

            let path = format!("{}/{}", language, self.config.record_file_name());
            let header = self.existing_header(&path).await?;
            let content = render_document(&header, &data, column, self.config.escape_strings());

            documents.push(LanguageDocument {
                language: language.to_string(),
                path,
                content,
            });
        }

        Ok(documents)
    }

    /// Files are replaced one after another; a failure leaves the files
    /// written before it in place.
    async fn load(&self, result: Vec<LanguageDocument>) -> Result<String> {
        let mut written: Vec<&str> = Vec::with_capacity(result.len());

        for document in &result {
            if let Err(e) = self
                .storage
                .write_file(&document.path, document.content.as_bytes())
                .await
            {
                if !written.is_empty() {
                    tracing::warn!(
                        "Stopped after rewriting {}; remaining languages untouched",
                        written.join(", ")
                    );
                }
                return Err(e);
            }
            tracing::debug!(
                "Wrote {} ({} bytes)",
                document.path,
                document.content.len()
            );
            written.push(&document.path);
        }

        tracing::info!("Rewrote {} language files", written.len());
        Ok(self.storage.display_path(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::collect_pipeline::tests::{po_record, MockConfig, MockStorage};

    const TABLE: &str = "Key,Source,Source2,msgctxt,msgid,en,fr\nGREETING,,,,Hello,Hello,Bonjour\n";

    async fn run(storage: &MockStorage, config: MockConfig) -> Result<String> {
        let pipeline = EmitPipeline::new(storage.clone(), config);
        let table = pipeline.extract().await?;
        let documents = pipeline.transform(table).await?;
        pipeline.load(documents).await
    }

    #[tokio::test]
    async fn test_emits_one_file_per_language() {
        let storage = MockStorage::default();
        storage.put("localization.csv", TABLE).await;

        run(&storage, MockConfig::default()).await.unwrap();

        let en = storage.get_file("en/Game.po").await.unwrap();
        let fr = storage.get_file("fr/Game.po").await.unwrap();
        assert_eq!(en, format!("{}\n", po_record("GREETING", "Hello", "Hello")));
        assert_eq!(fr, format!("{}\n", po_record("GREETING", "Hello", "Bonjour")));
    }

    #[tokio::test]
    async fn test_keeps_existing_header() {
        let storage = MockStorage::default();
        storage.put("localization.csv", TABLE).await;
        let old = format!(
            "# French translation\nmsgid \"\"\nmsgstr \"\"\n{}",
            po_record("OLD", "Old", "Vieux")
        );
        storage.put("fr/Game.po", &old).await;

        run(&storage, MockConfig::default()).await.unwrap();

        let fr = storage.get_file("fr/Game.po").await.unwrap();
        assert!(fr.starts_with("# French translation\nmsgid \"\"\nmsgstr \"\"\n\n#. Key:\tGREETING"));
        assert!(!fr.contains("OLD"));
    }

    #[tokio::test]
    async fn test_missing_table_fails() {
        let storage = MockStorage::default();
        let err = run(&storage, MockConfig::default()).await.unwrap_err();
        assert!(matches!(err, ConvertError::IoFailure { .. }));
    }

    #[tokio::test]
    async fn test_rejects_language_names_with_separators() {
        let storage = MockStorage::default();
        storage
            .put(
                "localization.csv",
                "Key,Source,Source2,msgctxt,msgid,../en\nA,,,,a,a\n",
            )
            .await;

        let err = run(&storage, MockConfig::default()).await.unwrap_err();
        assert!(matches!(err, ConvertError::InvalidConfigValue { .. }));
        assert!(storage.get_file("../en/Game.po").await.is_none());
    }

    #[tokio::test]
    async fn test_escaping_follows_config() {
        let storage = MockStorage::default();
        storage
            .put(
                "localization.csv",
                "Key,Source,Source2,msgctxt,msgid,en\nA,,,,\"say \"\"hi\"\"\",x\n",
            )
            .await;

        run(&storage, MockConfig::default()).await.unwrap();
        let escaped = storage.get_file("en/Game.po").await.unwrap();
        assert!(escaped.contains("msgid \"say \\\"hi\\\"\"\n"));

        let raw_config = MockConfig {
            escape_strings: false,
            ..Default::default()
        };
        run(&storage, raw_config).await.unwrap();
        let raw = storage.get_file("en/Game.po").await.unwrap();
        assert!(raw.contains("msgid \"say \"hi\"\"\n"));
    }
}

use crate::domain::model::AlignMode;
use crate::utils::error::Result;
use async_trait::async_trait;

/// File access relative to the conversion root.
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;

    /// Like `read_file`, but a missing file is `Ok(None)`.
    fn read_optional(
        &self,
        path: &str,
    ) -> impl std::future::Future<Output = Result<Option<Vec<u8>>>> + Send;

    /// Replaces the file at `path`, creating parent directories as needed.
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Immediate subdirectories of the root, sorted by name.
    fn list_dirs(&self) -> impl std::future::Future<Output = Result<Vec<String>>> + Send;

    /// Human readable location of `path`, used in logs and results.
    fn display_path(&self, path: &str) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn record_file_name(&self) -> &str;
    fn table_file_name(&self) -> &str;
    fn primary_language(&self) -> Option<&str>;
    fn align_mode(&self) -> AlignMode;
    fn escape_strings(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    type Extracted: Send;
    type Transformed: Send;

    async fn extract(&self) -> Result<Self::Extracted>;
    async fn transform(&self, data: Self::Extracted) -> Result<Self::Transformed>;
    async fn load(&self, result: Self::Transformed) -> Result<String>;
}

use crate::core::Pipeline;
use crate::utils::error::{ConvertError, Result};
use std::time::Instant;
use tracing::Instrument;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    name: &'static str,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P, name: &'static str) -> Self {
        Self { pipeline, name }
    }

    /// Runs extract, transform and load in order, stopping at the first error.
    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        let span = tracing::info_span!("convert", direction = self.name);

        async {
            tracing::info!("Starting {} conversion", self.name);

            tracing::debug!("Extracting...");
            let raw_data = self.pipeline.extract().await?;

            tracing::debug!("Transforming...");
            let transformed = self.pipeline.transform(raw_data).await?;

            tracing::debug!("Loading...");
            let output_path = self.pipeline.load(transformed).await?;

            tracing::info!(
                "{} finished in {:?}, output: {}",
                self.name,
                started.elapsed(),
                output_path
            );
            Ok::<_, ConvertError>(output_path)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::collect_pipeline::tests::{po_record, MockConfig, MockStorage};
    use crate::core::collect_pipeline::CollectPipeline;
    use crate::core::emit_pipeline::EmitPipeline;

    #[tokio::test]
    async fn test_round_trip_through_engine() {
        let storage = MockStorage::default();
        let en = format!(
            "# English\n{}{}",
            po_record("A", "Apple", "Apple"),
            po_record("B", "Banana", "Banana")
        );
        let ja = format!(
            "{}{}",
            po_record("A", "Apple", "リンゴ"),
            po_record("B", "Banana", "バナナ")
        );
        storage.put("en/Game.po", &en).await;
        storage.put("ja/Game.po", &ja).await;

        let collect = EtlEngine::new(
            CollectPipeline::new(storage.clone(), MockConfig::default()),
            "po2csv",
        );
        assert_eq!(collect.run().await.unwrap(), "mem://localization.csv");

        let emit = EtlEngine::new(
            EmitPipeline::new(storage.clone(), MockConfig::default()),
            "csv2po",
        );
        emit.run().await.unwrap();

        assert_eq!(storage.get_file("en/Game.po").await.unwrap(), format!("{}\n", en));
        assert_eq!(storage.get_file("ja/Game.po").await.unwrap(), format!("{}\n", ja));
    }

    #[tokio::test]
    async fn test_engine_stops_at_first_error() {
        let storage = MockStorage::default();
        storage.put("en/Game.po", &po_record("A", "a", "a")).await;
        storage.put("fr/Game.po", "").await;

        let engine = EtlEngine::new(
            CollectPipeline::new(storage.clone(), MockConfig::default()),
            "po2csv",
        );
        let err = engine.run().await.unwrap_err();

        assert!(matches!(err, ConvertError::MisalignedRecords { .. }));
        assert!(storage.get_file("localization.csv").await.is_none());
    }
}

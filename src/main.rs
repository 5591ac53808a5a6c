use clap::Parser;
use po_table::utils::{logger, validation::Validate};
use po_table::{
    CliConfig, CollectPipeline, ConvertError, Direction, EmitPipeline, EtlEngine, LocalStorage,
    Settings,
};

fn report_and_exit(stage: &str, e: &ConvertError) -> ! {
    tracing::error!(
        "❌ {} failed: {} (Category: {:?}, Severity: {:?})",
        stage,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

fn load_settings(config: &CliConfig) -> po_table::Result<Settings> {
    let settings = config.to_settings()?;
    settings.validate()?;
    Ok(settings)
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose, config.log_format);

    tracing::info!("Starting po-table");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let settings = match load_settings(&config) {
        Ok(settings) => settings,
        Err(e) => report_and_exit("Configuration", &e),
    };

    let storage = LocalStorage::new(settings.root.clone());
    let result = match settings.direction {
        Direction::Po2Csv => {
            let pipeline = CollectPipeline::new(storage, settings);
            EtlEngine::new(pipeline, "po2csv").run().await
        }
        Direction::Csv2Po => {
            let pipeline = EmitPipeline::new(storage, settings);
            EtlEngine::new(pipeline, "csv2po").run().await
        }
    };

    match result {
        Ok(output_path) => {
            tracing::info!("✅ Conversion completed successfully");
            println!("✅ Output saved to: {}", output_path);
        }
        Err(e) => report_and_exit("Conversion", &e),
    }
}

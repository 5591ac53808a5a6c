pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, Settings};
pub use core::{collect_pipeline::CollectPipeline, emit_pipeline::EmitPipeline, etl::EtlEngine};
pub use domain::model::{AlignMode, Direction};
pub use utils::error::{ConvertError, Result};

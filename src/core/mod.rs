pub mod collect_pipeline;
pub mod emit_pipeline;
pub mod etl;

pub use crate::domain::model::{
    AlignMode, Direction, LanguageDocument, LanguageFile, LanguageSet, Record, Table,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;

pub mod coerce;
pub mod etl;
pub mod export;
pub mod extract;
pub mod filter;
pub mod legend;
pub mod normalize;
pub mod orchestrator;
pub mod pipeline;
pub mod unify;

pub use crate::domain::model::{RawTable, TransformResult, UnifiedTable};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage, TableExtractor};
pub use crate::utils::error::Result;

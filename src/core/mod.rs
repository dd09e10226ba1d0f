pub mod etl;
pub mod images;
pub mod pairs;
pub mod pipeline;
pub mod profiles;
pub mod spec;

pub use crate::domain::model::{Profile, ProfileKind, SourceBatch, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod sources;
pub mod storage;

pub use config::Config;
pub use error::{PipelineError, Result};

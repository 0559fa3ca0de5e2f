pub mod config;
pub mod error;
pub mod harmonize;
pub mod integrate;
pub mod io;
pub mod pipeline;
pub mod postprocess;
pub mod prep;
pub mod schema;
pub mod summary;
pub mod union;

pub use config::HarmonizeConfig;
pub use error::{PipelineError, Result};
pub use summary::RunSummary;

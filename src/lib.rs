pub mod config;
pub mod error;
pub mod extractor;
pub mod loader;
pub mod partitioner;
pub mod validator;
pub mod zone;

pub use config::ExtractorConfig;
pub use error::ZoneExtractionError;
pub use partitioner::{run, RunReport};

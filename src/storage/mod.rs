pub mod cache;
pub mod config;

pub use cache::SourceHashCache;
pub use config::{Config, ConfigError};

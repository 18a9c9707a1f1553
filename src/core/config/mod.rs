pub mod defaults;
pub mod service;
pub mod types;
pub mod validation;

pub use service::{redact_uri, ConfigService};
pub use types::{AppConfig, DatabaseConfig, ModelConfig, RagConfig, ServerConfig};

mod settings;

pub use settings::{OtelConfig, ProviderConfig, ServerConfig, Settings};

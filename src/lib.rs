// Public modules
pub mod chat;
pub mod client;
pub mod credentials;
pub mod error;
pub mod observability;
pub mod provider;
pub mod registry;
pub mod render;
pub mod types;

// Re-exports
pub use client::OpenAi;
pub use credentials::{ApiKey, CREDENTIAL_ENV, CredentialStore};
pub use error::{Error, Result};
pub use observability::register_biometrics;
pub use provider::CompletionProvider;
pub use registry::{ModelDescriptor, ModelRegistry, TEMPERATURE_MAX, TEMPERATURE_MIN};
pub use types::*;

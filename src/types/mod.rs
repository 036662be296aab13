// Public modules
pub mod chat_completion;
pub mod chat_completion_params;
pub mod message;

// Re-exports
pub use chat_completion::{ChatCompletion, Choice, Usage};
pub use chat_completion_params::ChatCompletionParams;
pub use message::{Message, Role};

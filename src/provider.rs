//! The completion provider seam.
//!
//! The session drives any backend through this trait. The production
//! implementation is [`crate::OpenAi`]; tests substitute deterministic
//! stubs.

use crate::credentials::ApiKey;
use crate::error::Result;
use crate::types::{ChatCompletion, ChatCompletionParams};

/// A chat-completion backend.
///
/// A handle is bound to exactly one credential. The session caches the
/// handle together with the credential generation it was built from and
/// binds a fresh one whenever the credential changes, so implementations
/// never need to detect stale credentials themselves.
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync + Sized {
    /// Build a handle bound to the given credential.
    fn bind(credential: &ApiKey) -> Result<Self>;

    /// Perform one chat completion round trip.
    ///
    /// Exactly one request per call; retry policy belongs to the caller.
    async fn complete(&self, params: ChatCompletionParams) -> Result<ChatCompletion>;
}

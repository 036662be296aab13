//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns the conversation
//! state machine: the credential store, the model registry, the message
//! history, and the lifecycle state. All mutation flows through its methods.

use crate::chat::config::ChatConfig;
use crate::client::OpenAi;
use crate::credentials::CredentialStore;
use crate::error::{Error, Result};
use crate::observability::{SESSION_CLEARS, SESSION_TURN_FAILURES, SESSION_TURNS};
use crate::provider::CompletionProvider;
use crate::registry::{ModelDescriptor, ModelRegistry};
use crate::types::{ChatCompletionParams, Message, Role, Usage};

/// System prompt sent when the caller has not configured one.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Lifecycle state of a chat session.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SessionState {
    /// Submit preconditions unmet: no credential, or the selected model is
    /// a placeholder.
    Idle,
    /// Credential present and the selected model usable; submits are
    /// accepted.
    Ready,
    /// A turn is in flight; further submits are rejected until it
    /// completes.
    AwaitingReply,
}

/// A provider handle plus the credential generation it was bound from.
struct Binding<P> {
    generation: u64,
    provider: P,
}

/// A chat session that manages conversation state and provider interactions.
///
/// The session re-checks its preconditions on every submit, appends the user
/// turn only after a provider handle is bound, and keeps the user turn in
/// history even when the provider call fails.
///
/// # Examples
///
/// ```
/// use colloquy::chat::{ChatConfig, ChatSession};
/// use colloquy::{
///     ApiKey, ChatCompletion, ChatCompletionParams, Choice, CompletionProvider,
///     CredentialStore, Message, Result,
/// };
///
/// struct Canned;
///
/// #[async_trait::async_trait]
/// impl CompletionProvider for Canned {
///     fn bind(_: &ApiKey) -> Result<Self> {
///         Ok(Canned)
///     }
///
///     async fn complete(&self, params: ChatCompletionParams) -> Result<ChatCompletion> {
///         Ok(ChatCompletion::new(
///             params.model,
///             vec![Choice::new(Message::assistant("four"))],
///         ))
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let mut store = CredentialStore::new();
/// store.set("sk-example");
/// let mut session = ChatSession::<Canned>::with_credentials(ChatConfig::default(), store);
/// let reply = session.submit("What is two plus two?").await.unwrap();
/// assert_eq!(reply, "four");
/// assert_eq!(session.history().len(), 2);
/// # });
/// ```
pub struct ChatSession<P: CompletionProvider> {
    credentials: CredentialStore,
    registry: ModelRegistry,
    history: Vec<Message>,
    state: SessionState,
    system_prompt: Option<String>,
    binding: Option<Binding<P>>,
    total_prompt_tokens: u64,
    total_completion_tokens: u64,
    last_turn_usage: Option<Usage>,
    request_count: u64,
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone)]
pub struct SessionStats {
    /// Display name of the current model.
    pub model: String,
    /// The number of messages in the conversation.
    pub message_count: usize,
    /// The runtime sampling temperature, if set.
    pub temperature: Option<f32>,
    /// The system prompt override, if any.
    pub system_prompt: Option<String>,
    /// The lifecycle state at snapshot time.
    pub state: SessionState,
    /// Total prompt tokens across all successful turns.
    pub total_prompt_tokens: u64,
    /// Total completion tokens across all successful turns.
    pub total_completion_tokens: u64,
    /// Total number of provider requests dispatched.
    pub total_requests: u64,
    /// Prompt tokens for the last turn, if the provider reported usage.
    pub last_turn_prompt_tokens: Option<u64>,
    /// Completion tokens for the last turn, if the provider reported usage.
    pub last_turn_completion_tokens: Option<u64>,
}

impl ChatSession<OpenAi> {
    /// Creates a new session over the production OpenAI client, adopting
    /// the OPENAI_API_KEY environment variable when present.
    pub fn new(config: ChatConfig) -> Self {
        Self::with_credentials(config, CredentialStore::from_env())
    }
}

impl<P: CompletionProvider> ChatSession<P> {
    /// Creates a new session with an explicit credential store.
    pub fn with_credentials(config: ChatConfig, credentials: CredentialStore) -> Self {
        let mut session = Self {
            credentials,
            registry: ModelRegistry::new(),
            history: Vec::new(),
            state: SessionState::Idle,
            system_prompt: config.system_prompt,
            binding: None,
            total_prompt_tokens: 0,
            total_completion_tokens: 0,
            last_turn_usage: None,
            request_count: 0,
        };
        session.refresh_state();
        session
    }

    /// Submits one user turn and returns the assistant's reply.
    ///
    /// Preconditions are re-checked on every call, in order: no turn may be
    /// in flight, a credential must be set, and the selected model must be
    /// usable. Failing a precondition (or failing to bind a provider
    /// handle) appends nothing to history.
    ///
    /// Once the preconditions pass, the user message is appended and stays
    /// appended: a provider failure leaves the lone user message in history
    /// and the session ready for the next submit. On success exactly one
    /// assistant message is appended and its text returned.
    pub async fn submit(&mut self, user_text: &str) -> Result<String> {
        if self.state == SessionState::AwaitingReply {
            return Err(Error::turn_in_flight("a previous submit has not completed"));
        }
        if !self.credentials.is_set() {
            return Err(Error::missing_credential(
                "no API key is set; provide one before submitting a turn",
            ));
        }
        if !self.registry.current_usable() {
            return Err(Error::model_unavailable(
                self.registry.current().display_name.clone(),
            ));
        }
        self.ensure_binding()?;

        self.history.push(Message::user(user_text));
        self.state = SessionState::AwaitingReply;

        let mut params = ChatCompletionParams::new(
            self.registry.current().provider_id.clone(),
            self.outbound_messages(),
        );
        if let Some(temperature) = self.registry.temperature() {
            params = params.with_temperature(temperature);
        }

        let outcome = match self.binding.as_ref() {
            Some(binding) => binding.provider.complete(params).await,
            None => Err(Error::missing_credential(
                "no API key is set; provide one before submitting a turn",
            )),
        };
        self.request_count = self.request_count.saturating_add(1);
        self.refresh_state();

        match outcome {
            Ok(completion) => {
                let Some(text) = completion.assistant_text() else {
                    SESSION_TURN_FAILURES.click();
                    return Err(Error::invalid_response(
                        "response carried no assistant text",
                    ));
                };
                let text = text.to_string();
                self.history.push(Message::assistant(text.clone()));
                self.record_usage(completion.usage);
                SESSION_TURNS.click();
                Ok(text)
            }
            Err(err) => {
                SESSION_TURN_FAILURES.click();
                Err(err)
            }
        }
    }

    /// Clears the conversation history.
    ///
    /// Legal from any state; the credential and model selection are
    /// untouched.
    pub fn clear(&mut self) {
        self.history.clear();
        SESSION_CLEARS.click();
    }

    /// Returns the conversation history, oldest first.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Returns the number of messages in the conversation.
    pub fn message_count(&self) -> usize {
        self.history.len()
    }

    /// Returns the lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Stores the API credential; an empty value clears it.
    pub fn set_credential(&mut self, value: &str) {
        self.credentials.set(value);
        self.refresh_state();
    }

    /// Returns true when a credential is stored.
    pub fn credential_set(&self) -> bool {
        self.credentials.is_set()
    }

    /// Selects a model by display name.
    ///
    /// Switching models resets the runtime temperature to the new model's
    /// declared default; reselecting the current model changes nothing.
    pub fn select_model(&mut self, display_name: &str) -> Result<()> {
        self.registry.select(display_name)?;
        self.refresh_state();
        Ok(())
    }

    /// Returns the registry's descriptors in definition order.
    pub fn models(&self) -> &[ModelDescriptor] {
        self.registry.list()
    }

    /// Returns the currently selected model descriptor.
    pub fn current_model(&self) -> &ModelDescriptor {
        self.registry.current()
    }

    /// Sets the runtime sampling temperature for the current selection.
    pub fn set_temperature(&mut self, temperature: f32) -> Result<()> {
        self.registry.set_temperature(temperature)
    }

    /// Resets the runtime temperature to the selection's declared default.
    pub fn reset_temperature(&mut self) {
        self.registry.reset_temperature();
    }

    /// Returns the runtime temperature, if set.
    pub fn temperature(&self) -> Option<f32> {
        self.registry.temperature()
    }

    /// Sets or clears the system prompt override.
    pub fn set_system_prompt(&mut self, prompt: Option<String>) {
        self.system_prompt = prompt;
    }

    /// Returns the system prompt override, if any.
    pub fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref()
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            model: self.registry.current().display_name.clone(),
            message_count: self.history.len(),
            temperature: self.registry.temperature(),
            system_prompt: self.system_prompt.clone(),
            state: self.state,
            total_prompt_tokens: self.total_prompt_tokens,
            total_completion_tokens: self.total_completion_tokens,
            total_requests: self.request_count,
            last_turn_prompt_tokens: self
                .last_turn_usage
                .map(|usage| u64::from(usage.prompt_tokens)),
            last_turn_completion_tokens: self
                .last_turn_usage
                .map(|usage| u64::from(usage.completion_tokens)),
        }
    }

    /// Binds a provider for the current credential, rebinding when the
    /// credential generation has moved since the cached handle was built.
    fn ensure_binding(&mut self) -> Result<()> {
        let generation = self.credentials.generation();
        if let Some(binding) = self.binding.as_ref()
            && binding.generation == generation
        {
            return Ok(());
        }
        let Some(credential) = self.credentials.get() else {
            return Err(Error::missing_credential(
                "no API key is set; provide one before submitting a turn",
            ));
        };
        let provider = P::bind(credential)?;
        self.binding = Some(Binding {
            generation,
            provider,
        });
        Ok(())
    }

    /// Builds the message sequence actually sent to the provider.
    ///
    /// When no system message is stored, the configured prompt (or the
    /// default) is prepended to the outbound copy only; the stored history
    /// never contains it.
    fn outbound_messages(&self) -> Vec<Message> {
        if self.history.iter().any(|m| m.role == Role::System) {
            return self.history.clone();
        }
        let prompt = self
            .system_prompt
            .as_deref()
            .unwrap_or(DEFAULT_SYSTEM_PROMPT);
        let mut outbound = Vec::with_capacity(self.history.len() + 1);
        outbound.push(Message::system(prompt));
        outbound.extend(self.history.iter().cloned());
        outbound
    }

    fn record_usage(&mut self, usage: Option<Usage>) {
        if let Some(usage) = usage {
            self.total_prompt_tokens = self
                .total_prompt_tokens
                .saturating_add(u64::from(usage.prompt_tokens));
            self.total_completion_tokens = self
                .total_completion_tokens
                .saturating_add(u64::from(usage.completion_tokens));
        }
        self.last_turn_usage = usage;
    }

    fn refresh_state(&mut self) {
        self.state = if self.credentials.is_set() && self.registry.current_usable() {
            SessionState::Ready
        } else {
            SessionState::Idle
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::ApiKey;
    use crate::types::ChatCompletion;

    struct NullProvider;

    #[async_trait::async_trait]
    impl CompletionProvider for NullProvider {
        fn bind(_: &ApiKey) -> Result<Self> {
            Ok(NullProvider)
        }

        async fn complete(&self, _: ChatCompletionParams) -> Result<ChatCompletion> {
            Err(Error::invalid_response("unit tests never reach the provider"))
        }
    }

    fn session() -> ChatSession<NullProvider> {
        ChatSession::with_credentials(ChatConfig::default(), CredentialStore::new())
    }

    #[test]
    fn new_session_empty() {
        let session = session();
        assert_eq!(session.message_count(), 0);
        assert!(session.history().is_empty());
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.current_model().display_name, "GPT-4o");
    }

    #[test]
    fn clear_session() {
        let mut session = session();

        // Manually add a message for testing
        session.history.push(Message::user("test"));
        assert_eq!(session.message_count(), 1);

        session.clear();
        assert_eq!(session.message_count(), 0);

        session.clear();
        assert_eq!(session.message_count(), 0);
    }

    #[test]
    fn select_model() {
        let mut session = session();

        session.select_model("Gemini 2.5 Pro (Not Implemented)").unwrap();
        assert_eq!(
            session.current_model().display_name,
            "Gemini 2.5 Pro (Not Implemented)"
        );

        let err = session.select_model("GPT-5").unwrap_err();
        assert!(err.is_unknown_model());
        assert_eq!(
            session.current_model().display_name,
            "Gemini 2.5 Pro (Not Implemented)"
        );
    }

    #[test]
    fn set_system_prompt() {
        let mut session = session();

        assert!(session.system_prompt().is_none());

        session.set_system_prompt(Some("Be helpful".to_string()));
        assert_eq!(session.system_prompt(), Some("Be helpful"));

        session.set_system_prompt(None);
        assert!(session.system_prompt().is_none());
    }

    #[test]
    fn state_follows_preconditions() {
        let mut session = session();
        assert_eq!(session.state(), SessionState::Idle);

        session.set_credential("sk-test");
        assert_eq!(session.state(), SessionState::Ready);

        session
            .select_model("Claude 3.7 Opus (Not Implemented)")
            .unwrap();
        assert_eq!(session.state(), SessionState::Idle);

        session.select_model("GPT-4o").unwrap();
        assert_eq!(session.state(), SessionState::Ready);

        session.set_credential("");
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn outbound_synthesizes_system_message() {
        let mut session = session();
        session.history.push(Message::user("hi"));

        let outbound = session.outbound_messages();
        assert_eq!(outbound.len(), 2);
        assert_eq!(outbound[0], Message::system(DEFAULT_SYSTEM_PROMPT));
        assert_eq!(outbound[1], Message::user("hi"));

        session.set_system_prompt(Some("Be terse.".to_string()));
        let outbound = session.outbound_messages();
        assert_eq!(outbound[0], Message::system("Be terse."));

        // The stored history never gains the synthesized message.
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn outbound_respects_stored_system_message() {
        let mut session = session();
        session.history.push(Message::system("Already here"));
        session.history.push(Message::user("hi"));

        let outbound = session.outbound_messages();
        assert_eq!(outbound.len(), 2);
        assert_eq!(outbound[0], Message::system("Already here"));
    }

    #[test]
    fn stats_snapshot() {
        let mut session = session();
        session.set_credential("sk-test");
        session.set_temperature(0.9).unwrap();

        let stats = session.stats();
        assert_eq!(stats.model, "GPT-4o");
        assert_eq!(stats.message_count, 0);
        assert_eq!(stats.temperature, Some(0.9));
        assert_eq!(stats.state, SessionState::Ready);
        assert_eq!(stats.total_requests, 0);
        assert_eq!(stats.total_prompt_tokens, 0);
        assert!(stats.last_turn_prompt_tokens.is_none());
    }
}

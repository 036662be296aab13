//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use arrrg_derive::CommandLine;

/// Command-line arguments for the colloquy-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Model to select at startup, by display name.
    #[arrrg(optional, "Model to select (default: GPT-4o)", "MODEL")]
    pub model: Option<String>,

    /// System prompt to set context for the conversation.
    #[arrrg(optional, "System prompt for the conversation", "PROMPT")]
    pub system: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Display name of the model to select at startup. `None` keeps the
    /// registry's default selection.
    pub model: Option<String>,

    /// Optional system prompt to set conversation context.
    ///
    /// When unset, the session synthesizes a stock prompt on each request.
    pub system_prompt: Option<String>,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Model: the registry default
    /// - System prompt: unset (synthesized per request)
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            model: None,
            system_prompt: None,
            use_color: true,
        }
    }

    /// Sets the model to select at startup.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        ChatConfig {
            model: args.model,
            system_prompt: args.system,
            use_color: !args.no_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert!(config.model.is_none());
        assert!(config.system_prompt.is_none());
        assert!(config.use_color);
    }

    #[test]
    fn config_from_args_defaults() {
        let args = ChatArgs::default();
        let config = ChatConfig::from(args);
        assert!(config.model.is_none());
        assert!(config.system_prompt.is_none());
        assert!(config.use_color);
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            model: Some("Claude 3.7 Opus (Not Implemented)".to_string()),
            system: Some("You are helpful.".to_string()),
            no_color: true,
        };
        let config = ChatConfig::from(args);
        assert_eq!(
            config.model,
            Some("Claude 3.7 Opus (Not Implemented)".to_string())
        );
        assert_eq!(config.system_prompt, Some("You are helpful.".to_string()));
        assert!(!config.use_color);
    }

    #[test]
    fn config_builder_pattern() {
        let config = ChatConfig::new()
            .with_model("GPT-4o")
            .with_system_prompt("Test prompt")
            .without_color();

        assert_eq!(config.model, Some("GPT-4o".to_string()));
        assert_eq!(config.system_prompt, Some("Test prompt".to_string()));
        assert!(!config.use_color);
    }
}

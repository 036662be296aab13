use serde::{Deserialize, Serialize};

use crate::types::Message;

/// Token accounting for one completion request.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    /// Tokens consumed by the outbound message sequence.
    #[serde(default)]
    pub prompt_tokens: u32,

    /// Tokens generated for the assistant reply.
    #[serde(default)]
    pub completion_tokens: u32,

    /// Sum of prompt and completion tokens.
    #[serde(default)]
    pub total_tokens: u32,
}

impl Usage {
    /// Create a new `Usage` from prompt and completion token counts.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// One candidate completion within a response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Choice {
    /// Position of this choice in the response.
    #[serde(default)]
    pub index: u32,

    /// The assistant message for this choice.
    pub message: Message,

    /// Why generation stopped, when the provider reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

impl Choice {
    /// Create a new `Choice` wrapping the given message.
    pub fn new(message: Message) -> Self {
        Self {
            index: 0,
            message,
            finish_reason: Some("stop".to_string()),
        }
    }
}

/// A chat completion response body.
///
/// The shape follows the standard chat-completion wire contract; fields the
/// session does not consume are optional so responses from compatible
/// providers that omit them still parse.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletion {
    /// Provider-assigned identifier for this completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Object tag, `"chat.completion"` on conforming providers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,

    /// Unix timestamp of creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<u64>,

    /// The model that served the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Candidate completions; the session consumes the first.
    #[serde(default)]
    pub choices: Vec<Choice>,

    /// Token accounting, when the provider reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl ChatCompletion {
    /// Create a new `ChatCompletion` with the given model and choices.
    pub fn new(model: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self {
            id: None,
            object: None,
            created: None,
            model: Some(model.into()),
            choices,
            usage: None,
        }
    }

    /// Set the usage accounting.
    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Returns the assistant text of the first choice, if present.
    pub fn assistant_text(&self) -> Option<&str> {
        self.choices.first().map(|choice| choice.message.content.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;
    use serde_json::json;

    #[test]
    fn parse_standard_response() {
        let json = json!({
            "id": "chatcmpl-9QX8o",
            "object": "chat.completion",
            "created": 1717300000,
            "model": "gpt-4o-2024-05-13",
            "choices": [
                {
                    "index": 0,
                    "message": {"role": "assistant", "content": "Hello there."},
                    "finish_reason": "stop"
                }
            ],
            "usage": {"prompt_tokens": 14, "completion_tokens": 4, "total_tokens": 18}
        });

        let completion: ChatCompletion = serde_json::from_value(json).unwrap();
        assert_eq!(completion.assistant_text(), Some("Hello there."));
        assert_eq!(completion.choices[0].message.role, Role::Assistant);
        assert_eq!(completion.usage, Some(Usage::new(14, 4)));
    }

    #[test]
    fn parse_sparse_response() {
        // Compatible providers may omit everything but the choices.
        let json = json!({
            "choices": [
                {"message": {"role": "assistant", "content": "ok"}}
            ]
        });

        let completion: ChatCompletion = serde_json::from_value(json).unwrap();
        assert_eq!(completion.assistant_text(), Some("ok"));
        assert_eq!(completion.choices[0].index, 0);
        assert!(completion.usage.is_none());
    }

    #[test]
    fn assistant_text_empty_choices() {
        let completion = ChatCompletion::new("gpt-4o", vec![]);
        assert!(completion.assistant_text().is_none());
    }

    #[test]
    fn usage_totals() {
        let usage = Usage::new(50, 100);
        assert_eq!(usage.total_tokens, 150);
    }
}

use serde::{Deserialize, Serialize};

use crate::types::Message;

/// Parameters for one chat completion request.
///
/// This is the request body POSTed to `chat/completions`: a provider model
/// identifier, the ordered outbound message sequence, and an optional
/// sampling temperature. Unset parameters are omitted from the JSON body so
/// the provider applies its own defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionParams {
    /// The provider model identifier to run the completion against.
    pub model: String,

    /// The ordered message sequence for the conversation.
    pub messages: Vec<Message>,

    /// Sampling temperature in `[0.0, 2.0]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl ChatCompletionParams {
    /// Create new params with the given model and messages.
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: None,
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn params_minimal_json_shape() {
        let params = ChatCompletionParams::new("gpt-4o", vec![Message::user("hi")]);
        let json = to_value(&params).unwrap();

        assert_eq!(
            json,
            json!({
                "model": "gpt-4o",
                "messages": [
                    {"role": "user", "content": "hi"}
                ]
            })
        );
    }

    #[test]
    fn params_with_temperature() {
        let params = ChatCompletionParams::new(
            "gpt-4o",
            vec![
                Message::system("You are a helpful assistant."),
                Message::user("hi"),
            ],
        )
        .with_temperature(0.5);
        let json = to_value(&params).unwrap();

        assert_eq!(
            json,
            json!({
                "model": "gpt-4o",
                "messages": [
                    {"role": "system", "content": "You are a helpful assistant."},
                    {"role": "user", "content": "hi"}
                ],
                "temperature": 0.5
            })
        );
    }

    #[test]
    fn temperature_omitted_when_unset() {
        let params = ChatCompletionParams::new("gpt-4o", vec![]);
        let json = serde_json::to_string(&params).unwrap();
        assert!(!json.contains("temperature"));
    }
}

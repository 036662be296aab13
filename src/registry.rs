//! Model registry: the fixed catalog of selectable models.
//!
//! The registry maps human-readable display names to provider model
//! identifiers and per-model defaults, and tracks which entry is currently
//! selected along with the runtime temperature for that selection. Exactly
//! one entry is selected at any time; selection defaults to the first entry.

use crate::error::{Error, Result};

/// Lower bound of the accepted sampling temperature range.
pub const TEMPERATURE_MIN: f32 = 0.0;

/// Upper bound of the accepted sampling temperature range.
pub const TEMPERATURE_MAX: f32 = 2.0;

/// One selectable model and its declared defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDescriptor {
    /// Human-readable name shown to the user and used for selection.
    pub display_name: String,

    /// Identifier sent to the provider on the wire.
    pub provider_id: String,

    /// Whether this entry can actually serve requests.
    /// Placeholder entries are selectable but refuse submits.
    pub implemented: bool,

    /// Declared default sampling temperature, if the model tunes one.
    pub default_temperature: Option<f32>,
}

impl ModelDescriptor {
    /// Create a descriptor for an implemented model with a default
    /// temperature.
    pub fn implemented(
        display_name: impl Into<String>,
        provider_id: impl Into<String>,
        default_temperature: f32,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            provider_id: provider_id.into(),
            implemented: true,
            default_temperature: Some(default_temperature),
        }
    }

    /// Create a placeholder descriptor that is listed but not usable.
    pub fn placeholder(display_name: impl Into<String>, provider_id: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            provider_id: provider_id.into(),
            implemented: false,
            default_temperature: None,
        }
    }
}

/// The ordered model catalog plus the current selection.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    models: Vec<ModelDescriptor>,
    selected: usize,
    temperature: Option<f32>,
}

impl ModelRegistry {
    /// Create a registry with the stock catalog.
    pub fn new() -> Self {
        let models = vec![
            ModelDescriptor::implemented("GPT-4o", "gpt-4o", 0.7),
            ModelDescriptor::placeholder("Claude 3.7 Opus (Not Implemented)", "claude-3.7-opus"),
            ModelDescriptor::placeholder("Gemini 2.5 Pro (Not Implemented)", "gemini-2.5-pro"),
        ];
        let temperature = models[0].default_temperature;
        Self {
            models,
            selected: 0,
            temperature,
        }
    }

    /// Create a registry from a custom catalog.
    ///
    /// The first entry becomes the selection. Fails with a validation error
    /// on an empty catalog.
    pub fn with_models(models: Vec<ModelDescriptor>) -> Result<Self> {
        if models.is_empty() {
            return Err(Error::validation(
                "model catalog must not be empty",
                Some("models".to_string()),
            ));
        }
        let temperature = models[0].default_temperature;
        Ok(Self {
            models,
            selected: 0,
            temperature,
        })
    }

    /// Returns the catalog in definition order.
    pub fn list(&self) -> &[ModelDescriptor] {
        &self.models
    }

    /// Returns the currently selected descriptor.
    pub fn current(&self) -> &ModelDescriptor {
        &self.models[self.selected]
    }

    /// Select a model by display name.
    ///
    /// Fails with `UnknownModel` when the name is not in the catalog. When
    /// the selection actually changes, the runtime temperature resets to the
    /// new descriptor's declared default; reselecting the current model
    /// leaves runtime state untouched.
    pub fn select(&mut self, display_name: &str) -> Result<()> {
        let position = self
            .models
            .iter()
            .position(|m| m.display_name == display_name)
            .ok_or_else(|| Error::unknown_model(display_name))?;
        if position != self.selected {
            self.selected = position;
            self.temperature = self.models[position].default_temperature;
        }
        Ok(())
    }

    /// Returns true if the descriptor can serve requests.
    pub fn is_usable(&self, descriptor: &ModelDescriptor) -> bool {
        descriptor.implemented
    }

    /// Returns true if the current selection can serve requests.
    pub fn current_usable(&self) -> bool {
        self.current().implemented
    }

    /// Returns the runtime temperature for the current selection.
    pub fn temperature(&self) -> Option<f32> {
        self.temperature
    }

    /// Set the runtime temperature for the current selection.
    ///
    /// The value must fall in `[0.0, 2.0]`; NaN and out-of-range values fail
    /// with a validation error.
    pub fn set_temperature(&mut self, temperature: f32) -> Result<()> {
        if !(TEMPERATURE_MIN..=TEMPERATURE_MAX).contains(&temperature) {
            return Err(Error::validation(
                format!("temperature must be between {TEMPERATURE_MIN} and {TEMPERATURE_MAX}"),
                Some("temperature".to_string()),
            ));
        }
        self.temperature = Some(temperature);
        Ok(())
    }

    /// Reset the runtime temperature to the current selection's declared
    /// default.
    pub fn reset_temperature(&mut self) {
        self.temperature = self.current().default_temperature;
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

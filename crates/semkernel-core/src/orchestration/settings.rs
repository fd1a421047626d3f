//! Execution settings passed to model services.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    Text,
    JsonObject,
}

/// Sampling and output parameters for a prompt execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptExecutionSettings {
    pub service_id: Option<String>,
    pub model_id: Option<String>,
    pub temperature: f64,
    pub top_p: f64,
    pub presence_penalty: f64,
    pub frequency_penalty: f64,
    pub max_tokens: u32,
    pub results_per_prompt: u32,
    pub user: Option<String>,
    pub stop_sequences: Vec<String>,
    pub response_format: Option<ResponseFormat>,
}

impl PromptExecutionSettings {
    pub const DEFAULT_TEMPERATURE: f64 = 1.0;
    pub const DEFAULT_TOP_P: f64 = 1.0;
    pub const DEFAULT_PRESENCE_PENALTY: f64 = 0.0;
    pub const DEFAULT_FREQUENCY_PENALTY: f64 = 0.0;
    pub const DEFAULT_MAX_TOKENS: u32 = 256;
    pub const DEFAULT_RESULTS_PER_PROMPT: u32 = 1;
    pub const MAX_TEMPERATURE: f64 = 2.0;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_service_id(mut self, service_id: impl Into<String>) -> Self {
        self.service_id = Some(service_id.into());
        self
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    /// Temperature is clamped to `0.0..=2.0`
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature.clamp(0.0, Self::MAX_TEMPERATURE);
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = top_p.clamp(0.0, 1.0);
        self
    }

    pub fn with_presence_penalty(mut self, penalty: f64) -> Self {
        self.presence_penalty = penalty;
        self
    }

    pub fn with_frequency_penalty(mut self, penalty: f64) -> Self {
        self.frequency_penalty = penalty;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_results_per_prompt(mut self, results: u32) -> Self {
        self.results_per_prompt = results.max(1);
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_stop_sequence(mut self, stop: impl Into<String>) -> Self {
        self.stop_sequences.push(stop.into());
        self
    }

    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }
}

impl Default for PromptExecutionSettings {
    fn default() -> Self {
        Self {
            service_id: None,
            model_id: None,
            temperature: Self::DEFAULT_TEMPERATURE,
            top_p: Self::DEFAULT_TOP_P,
            presence_penalty: Self::DEFAULT_PRESENCE_PENALTY,
            frequency_penalty: Self::DEFAULT_FREQUENCY_PENALTY,
            max_tokens: Self::DEFAULT_MAX_TOKENS,
            results_per_prompt: Self::DEFAULT_RESULTS_PER_PROMPT,
            user: None,
            stop_sequences: Vec::new(),
            response_format: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_partial_json() {
        let settings: PromptExecutionSettings =
            serde_json::from_str(r#"{"max_tokens": 64, "response_format": "json_object"}"#).unwrap();
        assert_eq!(settings.max_tokens, 64);
        assert_eq!(settings.temperature, 1.0);
        assert_eq!(settings.results_per_prompt, 1);
        assert_eq!(settings.response_format, Some(ResponseFormat::JsonObject));
    }

    #[test]
    fn test_temperature_clamped() {
        assert_eq!(PromptExecutionSettings::new().with_temperature(3.5).temperature, 2.0);
        assert_eq!(PromptExecutionSettings::new().with_temperature(-1.0).temperature, 0.0);
    }
}

use std::path::Path;

use semkernel_core::PromptExecutionSettings;
use serde::{Deserialize, Serialize};

/// Semkernel configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemkernelConfig {
    /// Log level
    pub log_level: String,

    /// Delimiter used when rendering collections into prompts
    pub collection_delimiter: String,

    /// Settings applied to every invocation started from the app
    pub execution_settings: PromptExecutionSettings,

    /// Chat configuration
    pub chat: ChatConfig,
}

impl Default for SemkernelConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            collection_delimiter: ",".to_string(),
            execution_settings: PromptExecutionSettings::default(),
            chat: ChatConfig::default(),
        }
    }
}

impl SemkernelConfig {
    /// Load from configuration file; `.toml` files are parsed as TOML, anything else as JSON
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file {}: {}", path.display(), e))?;

        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            toml::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))
        } else {
            serde_json::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))
        }
    }
}

/// Chat configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// System prompt seeded into new conversations
    pub system_prompt: Option<String>,

    /// Chat completion service to use; the first registered one when unset
    pub service_id: Option<String>,

    /// Number of non-system messages kept from earlier turns
    pub max_history: Option<usize>,

    /// Reply prefix of the built-in echo service
    pub echo_prefix: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            system_prompt: None,
            service_id: None,
            max_history: None,
            echo_prefix: "Echo: ".to_string(),
        }
    }
}

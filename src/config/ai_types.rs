// Model provider configuration type definitions

use serde::Deserialize;

/// Default max tokens for a single continuation (ghost text stays short)
fn default_max_tokens() -> u32 {
    64
}

/// Suggestion provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProviderType {
    #[default]
    Anthropic,
    /// Offline phrase completion, needs no credentials
    Phrasebook,
}

impl AiProviderType {
    pub fn name(self) -> &'static str {
        match self {
            AiProviderType::Anthropic => "Anthropic",
            AiProviderType::Phrasebook => "Phrasebook",
        }
    }
}

/// Anthropic-specific configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicConfig {
    /// API key for Anthropic (required when the provider is enabled)
    pub api_key: Option<String>,
    /// Model to use (required - user must specify)
    pub model: Option<String>,
    /// Maximum tokens in a continuation
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        AnthropicConfig {
            api_key: None,
            model: None,
            max_tokens: default_max_tokens(),
        }
    }
}

/// `[ai]` section: where suggestions come from
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AiConfig {
    /// Whether model-backed suggestions are enabled
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub provider: AiProviderType,
    #[serde(default)]
    pub anthropic: AnthropicConfig,
}

impl AiConfig {
    /// Whether the selected provider has everything it needs
    pub fn is_configured(&self) -> bool {
        match self.provider {
            AiProviderType::Anthropic => {
                let present = |value: &Option<String>| {
                    value.as_ref().is_some_and(|v| !v.trim().is_empty())
                };
                present(&self.anthropic.api_key) && present(&self.anthropic.model)
            }
            AiProviderType::Phrasebook => true,
        }
    }
}

#[cfg(test)]
#[path = "ai_types_tests.rs"]
mod ai_types_tests;

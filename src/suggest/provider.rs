//! Suggestion provider abstraction
//!
//! A provider turns preceding text into a continuation. The engine treats it
//! as an opaque async function: it receives the leading text and a
//! cancellation token it may (but need not) honor.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::config::ai_types::{AiConfig, AiProviderType};

mod anthropic;
mod phrasebook;

pub use anthropic::AnthropicProvider;
pub use phrasebook::PhrasebookProvider;

/// Errors a provider can report
///
/// None of these reach the user: the engine treats every failure as
/// "no suggestion".
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProviderError {
    /// Provider is disabled or missing credentials
    #[error("[{provider}] not configured: {message}")]
    NotConfigured { provider: String, message: String },

    /// Network error during the request
    #[error("[{provider}] Network error: {message}")]
    Network { provider: String, message: String },

    /// API returned an error response
    #[error("[{provider}] API error ({code}): {message}")]
    Api {
        provider: String,
        code: u16,
        message: String,
    },

    /// Failed to build or parse a payload
    #[error("[{provider}] Parse error: {message}")]
    Parse { provider: String, message: String },

    /// Request was cancelled
    #[error("Request cancelled")]
    Cancelled,
}

/// Future returned by [`SuggestionProvider::suggest`]
pub type SuggestionFuture = BoxFuture<'static, Result<String, ProviderError>>;

/// Source of suggestion text
pub trait SuggestionProvider: Send + Sync {
    /// Display name used in logs
    fn name(&self) -> &str {
        "custom"
    }

    /// Produce a continuation for `leading_text`
    ///
    /// An empty string means "no suggestion".
    fn suggest(&self, leading_text: String, cancel_token: CancellationToken) -> SuggestionFuture;
}

/// Any async function `(leading_text, cancel_token) -> Result<String, ProviderError>`
/// is a provider.
impl<F, Fut> SuggestionProvider for F
where
    F: Fn(String, CancellationToken) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String, ProviderError>> + Send + 'static,
{
    fn suggest(&self, leading_text: String, cancel_token: CancellationToken) -> SuggestionFuture {
        Box::pin(self(leading_text, cancel_token))
    }
}

/// Create the provider selected by the `[ai]` section
///
/// Returns an error if the provider is disabled or missing required settings.
pub fn provider_from_config(
    config: &AiConfig,
) -> Result<Arc<dyn SuggestionProvider>, ProviderError> {
    let provider_name = config.provider.name();

    if !config.enabled {
        return Err(ProviderError::NotConfigured {
            provider: provider_name.to_string(),
            message: format!(
                "suggestions provider is disabled. Set 'enabled = true' in [ai] section with provider = \"{}\".",
                provider_name.to_lowercase()
            ),
        });
    }

    match config.provider {
        AiProviderType::Anthropic => {
            let api_key = config
                .anthropic
                .api_key
                .as_ref()
                .filter(|k| !k.trim().is_empty())
                .ok_or_else(|| ProviderError::NotConfigured {
                    provider: provider_name.to_string(),
                    message: "Missing API key. Add 'api_key' in [ai.anthropic] section."
                        .to_string(),
                })?;

            let model = config
                .anthropic
                .model
                .as_ref()
                .filter(|m| !m.trim().is_empty())
                .ok_or_else(|| ProviderError::NotConfigured {
                    provider: provider_name.to_string(),
                    message: "Missing model. Add 'model' in [ai.anthropic] section (e.g., 'claude-haiku-4-5-20251001')."
                        .to_string(),
                })?;

            Ok(Arc::new(AnthropicProvider::new(
                api_key.clone(),
                model.clone(),
                config.anthropic.max_tokens,
            )))
        }
        AiProviderType::Phrasebook => Ok(Arc::new(PhrasebookProvider::default())),
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod provider_tests;

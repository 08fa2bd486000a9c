//! Async Anthropic Claude API provider
//!
//! Streams a continuation from the Anthropic Messages API over SSE and
//! accumulates it into a single suggestion. Uses reqwest for HTTP and races
//! every chunk against the cancellation token.

use bytes::Bytes;
use futures::StreamExt;
use reqwest::Client;
use tokio_util::sync::CancellationToken;

use super::{ProviderError, SuggestionFuture, SuggestionProvider};
use crate::suggest::prompt::{build_prompt, normalize_continuation};

/// Anthropic API endpoint
const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Anthropic API version header
const ANTHROPIC_VERSION: &str = "2023-06-01";

const PROVIDER_NAME: &str = "Anthropic";

#[derive(Debug, Clone)]
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicProvider {
    pub fn new(api_key: String, model: String, max_tokens: u32) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            max_tokens,
        }
    }

    /// Request a continuation for `leading_text`
    ///
    /// # Returns
    /// * `Ok(text)` - Normalized continuation (may be empty)
    /// * `Err(ProviderError::Cancelled)` - Token fired before the stream ended
    /// * `Err(ProviderError::*)` - Network, API or payload errors
    pub async fn complete(
        &self,
        leading_text: &str,
        cancel_token: CancellationToken,
    ) -> Result<String, ProviderError> {
        if cancel_token.is_cancelled() {
            return Err(ProviderError::Cancelled);
        }

        let request_body = serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "stream": true,
            "messages": [
                {
                    "role": "user",
                    "content": build_prompt(leading_text)
                }
            ]
        });

        let body = serde_json::to_string(&request_body).map_err(|e| ProviderError::Parse {
            provider: PROVIDER_NAME.to_string(),
            message: e.to_string(),
        })?;

        let response = tokio::select! {
            biased;

            _ = cancel_token.cancelled() => return Err(ProviderError::Cancelled),

            response = self
                .client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .body(body)
                .send() => response.map_err(|e| ProviderError::Network {
                    provider: PROVIDER_NAME.to_string(),
                    message: e.to_string(),
                })?,
        };

        if !response.status().is_success() {
            let code = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ProviderError::Api {
                provider: PROVIDER_NAME.to_string(),
                code,
                message,
            });
        }

        let mut stream = response.bytes_stream();
        let mut sse_parser = SseParser::new();
        let mut continuation = String::new();

        loop {
            tokio::select! {
                biased;

                _ = cancel_token.cancelled() => {
                    log::debug!("Anthropic stream cancelled after {} bytes", continuation.len());
                    return Err(ProviderError::Cancelled);
                }

                chunk = stream.next() => {
                    match chunk {
                        Some(Ok(bytes)) => {
                            for text in sse_parser.parse_chunk(&bytes) {
                                continuation.push_str(&text);
                            }
                        }
                        Some(Err(e)) => {
                            return Err(ProviderError::Network {
                                provider: PROVIDER_NAME.to_string(),
                                message: e.to_string(),
                            });
                        }
                        None => break,
                    }
                }
            }
        }

        Ok(normalize_continuation(leading_text, &continuation))
    }
}

impl SuggestionProvider for AnthropicProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn suggest(&self, leading_text: String, cancel_token: CancellationToken) -> SuggestionFuture {
        let provider = self.clone();
        Box::pin(async move { provider.complete(&leading_text, cancel_token).await })
    }
}

/// SSE (Server-Sent Events) parser
///
/// Buffers incoming bytes and extracts text from complete
/// `content_block_delta` events.
struct SseParser {
    buffer: String,
}

impl SseParser {
    fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    /// Parse a chunk of bytes and return any complete text deltas
    fn parse_chunk(&mut self, bytes: &Bytes) -> Vec<String> {
        let mut results = Vec::new();

        match std::str::from_utf8(bytes) {
            Ok(text) => self.buffer.push_str(text),
            Err(_) => return results,
        }

        while let Some(newline_pos) = self.buffer.find('\n') {
            let line = self.buffer[..newline_pos].trim().to_string();
            self.buffer.drain(..=newline_pos);

            if line.is_empty() || line.starts_with("event:") {
                continue;
            }

            if let Some(data) = line.strip_prefix("data: ") {
                if data == "[DONE]" {
                    continue;
                }
                if let Some(text) = Self::parse_delta_text(data)
                    && !text.is_empty()
                {
                    results.push(text);
                }
            }
        }

        results
    }

    /// Extract `delta.text` from a `content_block_delta` event
    fn parse_delta_text(data: &str) -> Option<String> {
        let json: serde_json::Value = serde_json::from_str(data).ok()?;

        if json.get("type")?.as_str()? != "content_block_delta" {
            return None;
        }

        json.get("delta")?
            .get("text")?
            .as_str()
            .map(|s| s.to_string())
    }
}

#[cfg(test)]
#[path = "anthropic_tests.rs"]
mod anthropic_tests;

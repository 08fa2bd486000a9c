//! Suggestion worker thread
//!
//! Runs provider calls in a background thread so the event loop never blocks.
//! Requests arrive over a channel, each provider future is raced against its
//! cancellation token, and results are sent back with the measured latency.
//!
//! Panics inside a provider are logged instead of printed, since stderr output
//! would corrupt a terminal UI.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::time::Instant;

use super::fetch::{FetchRequest, FetchResponse};
use super::provider::{ProviderError, SuggestionProvider};

/// Spawn the suggestion worker thread
///
/// The thread owns a current-thread tokio runtime and exits when the request
/// channel closes.
pub fn spawn_worker(
    provider: Arc<dyn SuggestionProvider>,
    request_rx: Receiver<FetchRequest>,
    response_tx: Sender<FetchResponse>,
) {
    std::thread::spawn(move || {
        let prev_hook = panic::take_hook();
        panic::set_hook(Box::new(|panic_info| {
            log::error!(
                "Suggestion worker panic: {} at {:?}",
                panic_message(panic_info.payload()),
                panic_info.location()
            );
        }));

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    log::error!("Failed to create tokio runtime: {}", e);
                    return;
                }
            };
            rt.block_on(worker_loop(provider, request_rx, response_tx));
        }));

        panic::set_hook(prev_hook);

        if let Err(e) = result {
            log::error!(
                "Suggestion worker thread panicked: {}",
                panic_message(e.as_ref())
            );
        }
    });
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Process requests until the channel is closed
///
/// Blocking `recv()` is fine: this thread does nothing else.
async fn worker_loop(
    provider: Arc<dyn SuggestionProvider>,
    request_rx: Receiver<FetchRequest>,
    response_tx: Sender<FetchResponse>,
) {
    log::debug!("Suggestion worker started with {} provider", provider.name());
    while let Ok(request) = request_rx.recv() {
        let response = handle_fetch_async(provider.as_ref(), request).await;
        if response_tx.send(response).is_err() {
            break;
        }
    }
    log::debug!("Suggestion worker stopped");
}

/// Run one fetch, racing the provider against the cancellation token
async fn handle_fetch_async(
    provider: &dyn SuggestionProvider,
    request: FetchRequest,
) -> FetchResponse {
    let FetchRequest {
        leading_text,
        request_id,
        cancel_token,
    } = request;

    if cancel_token.is_cancelled() {
        return FetchResponse::Cancelled { request_id };
    }

    let started = Instant::now();
    let suggestion = provider.suggest(leading_text.clone(), cancel_token.clone());

    let result = tokio::select! {
        biased;

        _ = cancel_token.cancelled() => Err(ProviderError::Cancelled),
        result = suggestion => result,
    };

    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    match result {
        Ok(text) => FetchResponse::Completed {
            request_id,
            leading_text,
            text,
            latency_ms,
        },
        Err(ProviderError::Cancelled) => FetchResponse::Cancelled { request_id },
        Err(e) => {
            log::debug!("{} provider failed: {}", provider.name(), e);
            FetchResponse::Failed {
                request_id,
                message: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod worker_tests;

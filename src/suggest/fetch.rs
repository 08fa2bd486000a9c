//! Fetch coordination
//!
//! Owns the suggestion cache and the channels to the worker thread. At most
//! one fetch is in flight at a time; issuing a new one cancels the previous
//! fetch's token and makes its eventual result stale.

use std::sync::mpsc::{Receiver, Sender, TryRecvError};

use tokio_util::sync::CancellationToken;

use super::cache::SuggestionCache;

/// Request sent to the worker thread
#[derive(Debug)]
pub struct FetchRequest {
    pub leading_text: String,
    /// Monotonic id used to discard stale responses
    pub request_id: u64,
    pub cancel_token: CancellationToken,
}

/// Response from the worker thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResponse {
    /// Provider returned text (possibly empty)
    Completed {
        request_id: u64,
        leading_text: String,
        text: String,
        latency_ms: u64,
    },
    /// Provider failed; treated like an empty result
    Failed { request_id: u64, message: String },
    /// Token fired before the provider finished
    Cancelled { request_id: u64 },
}

impl FetchResponse {
    pub fn request_id(&self) -> u64 {
        match self {
            FetchResponse::Completed { request_id, .. }
            | FetchResponse::Failed { request_id, .. }
            | FetchResponse::Cancelled { request_id } => *request_id,
        }
    }
}

/// Result of [`FetchCoordinator::request`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Cache hit; no fetch was issued
    CacheHit(String),
    /// Cache miss; a fetch with this id was sent to the worker
    Dispatched(u64),
    /// Cache miss and no worker to ask
    Unavailable,
}

/// A fresh, non-empty provider result ready for the staleness check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResolution {
    pub request_id: u64,
    pub leading_text: String,
    pub text: String,
    pub latency_ms: u64,
}

#[derive(Debug)]
struct InFlight {
    request_id: u64,
    leading_text: String,
    cancel_token: CancellationToken,
}

#[derive(Debug, Default)]
pub struct FetchCoordinator {
    cache: SuggestionCache,
    request_tx: Option<Sender<FetchRequest>>,
    response_rx: Option<Receiver<FetchResponse>>,
    next_request_id: u64,
    in_flight: Option<InFlight>,
}

impl FetchCoordinator {
    pub fn new(cache_capacity: usize) -> Self {
        Self {
            cache: SuggestionCache::new(cache_capacity),
            ..Self::default()
        }
    }

    /// Set the channels to a running worker
    pub fn set_channels(
        &mut self,
        request_tx: Sender<FetchRequest>,
        response_rx: Receiver<FetchResponse>,
    ) {
        self.cancel_in_flight();
        self.request_tx = Some(request_tx);
        self.response_rx = Some(response_rx);
    }

    pub fn is_connected(&self) -> bool {
        self.request_tx.is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight_id(&self) -> Option<u64> {
        self.in_flight.as_ref().map(|f| f.request_id)
    }

    /// Leading text of the fetch in flight
    pub fn in_flight_text(&self) -> Option<&str> {
        self.in_flight.as_ref().map(|f| f.leading_text.as_str())
    }

    pub fn cache(&self) -> &SuggestionCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut SuggestionCache {
        &mut self.cache
    }

    /// Serve `leading_text` from the cache or dispatch a fetch for it
    ///
    /// Any fetch already in flight is cancelled first.
    pub fn request(&mut self, leading_text: &str) -> FetchOutcome {
        self.cancel_in_flight();

        if let Some(text) = self.cache.get(leading_text) {
            log::debug!("Cache hit for {:?}", leading_text);
            return FetchOutcome::CacheHit(text);
        }

        let Some(request_tx) = &self.request_tx else {
            return FetchOutcome::Unavailable;
        };

        self.next_request_id += 1;
        let request_id = self.next_request_id;
        let cancel_token = CancellationToken::new();

        let request = FetchRequest {
            leading_text: leading_text.to_string(),
            request_id,
            cancel_token: cancel_token.clone(),
        };

        if request_tx.send(request).is_err() {
            log::debug!("Suggestion worker is gone, dropping channels");
            self.disconnect();
            return FetchOutcome::Unavailable;
        }

        log::debug!("Dispatched fetch {} for {:?}", request_id, leading_text);
        self.in_flight = Some(InFlight {
            request_id,
            leading_text: leading_text.to_string(),
            cancel_token,
        });
        FetchOutcome::Dispatched(request_id)
    }

    /// Cancel the fetch in flight, if any; its result will be ignored
    pub fn cancel_in_flight(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            log::debug!("Cancelling fetch {}", in_flight.request_id);
            in_flight.cancel_token.cancel();
        }
    }

    /// Drain worker responses
    ///
    /// Non-empty results are cached even when stale. Only the result of the
    /// fetch currently in flight is returned.
    pub fn poll(&mut self) -> Vec<FetchResolution> {
        let Some(response_rx) = &self.response_rx else {
            return Vec::new();
        };

        let mut responses = Vec::new();
        let mut disconnected = false;
        loop {
            match response_rx.try_recv() {
                Ok(response) => responses.push(response),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }

        let mut resolutions = Vec::new();
        for response in responses {
            if let Some(resolution) = self.process_response(response) {
                resolutions.push(resolution);
            }
        }

        if disconnected {
            log::debug!("Suggestion worker disconnected");
            self.disconnect();
        }

        resolutions
    }

    fn process_response(&mut self, response: FetchResponse) -> Option<FetchResolution> {
        let request_id = response.request_id();
        let current = self.in_flight_id() == Some(request_id);
        if current {
            self.in_flight = None;
        }

        match response {
            FetchResponse::Completed {
                leading_text,
                text,
                latency_ms,
                ..
            } => {
                if text.is_empty() {
                    log::debug!("Fetch {} returned nothing", request_id);
                    return None;
                }
                self.cache.set(leading_text.clone(), text.clone());
                if !current {
                    log::debug!("Ignoring stale result from fetch {}", request_id);
                    return None;
                }
                Some(FetchResolution {
                    request_id,
                    leading_text,
                    text,
                    latency_ms,
                })
            }
            FetchResponse::Failed { message, .. } => {
                log::debug!("Fetch {} failed: {}", request_id, message);
                None
            }
            FetchResponse::Cancelled { .. } => {
                log::debug!("Fetch {} cancelled", request_id);
                None
            }
        }
    }

    fn disconnect(&mut self) {
        self.cancel_in_flight();
        self.request_tx = None;
        self.response_rx = None;
    }
}

#[cfg(test)]
#[path = "fetch_tests.rs"]
mod fetch_tests;

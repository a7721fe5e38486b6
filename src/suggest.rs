//! Debounced place autocomplete.
//!
//! Each edit of the place text restarts a quiet-period timer. When the timer
//! fires, a search is dispatched on its own task and runs to completion; only
//! the timer can be cancelled. Every scheduling step bumps a generation
//! counter and a response is applied only while its generation is current, so
//! a slow reply to an older query never overwrites a newer list.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tokio::{sync::watch, task::JoinHandle};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::{
    config::SearchSettings,
    geocoding::{PlaceSearch, PlaceSuggestion},
};

/// What the place input shows beneath itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuggestionState {
    pub suggestions: Vec<PlaceSuggestion>,
    /// A search has been dispatched and its reply is still pending
    pub loading: bool,
    /// Message of the last failed search; cleared by the next query or retry
    pub error: Option<String>,
}

pub struct SuggestionResolver {
    search: Arc<dyn PlaceSearch>,
    settings: SearchSettings,
    state: Arc<watch::Sender<SuggestionState>>,
    generation: Arc<AtomicU64>,
    pending: Option<JoinHandle<()>>,
    last_query: Option<String>,
}

impl SuggestionResolver {
    pub fn new(search: Arc<dyn PlaceSearch>, settings: SearchSettings) -> Self {
        let (state, _) = watch::channel(SuggestionState::default());
        Self {
            search,
            settings,
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
            pending: None,
            last_query: None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SuggestionState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> SuggestionState {
        self.state.borrow().clone()
    }

    /// Reacts to a new place text. Must be called from within a Tokio runtime.
    pub fn on_place_text_changed(&mut self, text: &str) {
        let generation = self.advance();

        if text.chars().count() < self.settings.min_query_chars {
            self.last_query = None;
            self.state.send_replace(SuggestionState::default());
            return;
        }

        self.last_query = Some(text.to_string());

        let search = self.search.clone();
        let state = self.state.clone();
        let current = self.generation.clone();
        let query = text.to_string();
        let limit = self.settings.limit;
        let debounce = self.settings.debounce;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            dispatch(search, state, current, generation, query, limit);
        }));
    }

    /// Re-issues the last query right away if the previous search failed.
    ///
    /// Returns whether a request was dispatched.
    pub fn retry(&mut self) -> bool {
        let failed = self.state.borrow().error.is_some();
        let Some(query) = self.last_query.clone().filter(|_| failed) else {
            return false;
        };

        let generation = self.advance();
        info!("Retrying place search for: {}", query);
        dispatch(
            self.search.clone(),
            self.state.clone(),
            self.generation.clone(),
            generation,
            query,
            self.settings.limit,
        );
        true
    }

    /// Drops the list and any pending or in-flight search.
    pub fn clear(&mut self) {
        self.advance();
        self.last_query = None;
        self.state.send_replace(SuggestionState::default());
    }

    /// Cancels the pending timer and starts a new generation.
    fn advance(&mut self) -> u64 {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl Drop for SuggestionResolver {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

/// Applies `update` only while `generation` is current.
///
/// The comparison runs under the watch lock, so a `clear` that bumps the
/// generation and then resets the state cannot be overtaken by a stale write.
fn publish_if_current(
    state: &watch::Sender<SuggestionState>,
    current: &AtomicU64,
    generation: u64,
    update: impl FnOnce(&mut SuggestionState),
) -> bool {
    state.send_if_modified(|s| {
        if current.load(Ordering::SeqCst) != generation {
            return false;
        }
        update(s);
        true
    })
}

fn dispatch(
    search: Arc<dyn PlaceSearch>,
    state: Arc<watch::Sender<SuggestionState>>,
    current: Arc<AtomicU64>,
    generation: u64,
    query: String,
    limit: usize,
) {
    let started = publish_if_current(&state, &current, generation, |s| {
        s.loading = true;
        s.error = None;
    });
    if !started {
        return;
    }

    let span = info_span!("place_search", query = %query, generation);
    tokio::spawn(
        async move {
            let outcome = search.search(&query, limit).await;

            let applied = publish_if_current(&state, &current, generation, |s| match outcome {
                Ok(suggestions) => {
                    info!("Place search returned {} suggestions", suggestions.len());
                    *s = SuggestionState {
                        suggestions,
                        loading: false,
                        error: None,
                    };
                }
                Err(e) => {
                    warn!("Place search failed: {}", e);
                    *s = SuggestionState {
                        suggestions: Vec::new(),
                        loading: false,
                        error: Some(e.to_string()),
                    };
                }
            });
            if !applied {
                debug!("Discarding stale place search result");
            }
        }
        .instrument(span),
    );
}

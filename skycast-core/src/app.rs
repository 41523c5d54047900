//! Application state and fetch/summary orchestration.
//!
//! [`App`] is a plain state machine: tickets go out when an asynchronous
//! operation starts and come back when it completes, and the machine decides
//! what (if anything) the completion may change. The async flows at the
//! bottom wire the machine to a provider and a summarizer.
//!
//! Two disciplines keep concurrent completions honest:
//! - every fetch carries a monotonically increasing sequence number, and a
//!   completion is applied only if its number is the highest observed so far;
//! - every summary is keyed to the snapshot generation it was built from, and
//!   a result for a superseded generation is discarded.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::location::search_query;
use crate::model::{LocationQuery, SummaryRequest, WeatherSnapshot};
use crate::notice::Notice;
use crate::provider::{FetchError, WeatherProvider};
use crate::summary::{Summarizer, request_summary};
use crate::theme::Theme;

/// View-facing state.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// True exactly while a weather fetch is in flight.
    pub loading: bool,
    /// True exactly while a summary keyed to the current snapshot is in flight.
    pub loading_ai_summary: bool,
    pub snapshot: Option<WeatherSnapshot>,
    pub search_text: String,
    pub summary: Option<String>,
    pub theme: Theme,
}

/// Identifies one fetch attempt.
#[derive(Debug)]
pub struct FetchTicket {
    seq: u64,
}

/// Ties a summary request to the snapshot generation it was built from.
#[derive(Debug)]
pub struct SummaryTicket {
    generation: u64,
    pub request: SummaryRequest,
}

/// What a fetch completion amounted to.
#[derive(Debug)]
pub enum FetchCompletion {
    /// Snapshot replaced; start a summary keyed to it.
    Applied(SummaryTicket),
    /// Attempt failed; prior snapshot retained, notice to surface.
    Failed(Notice),
    /// Superseded by a newer attempt; discarded entirely.
    Stale,
}

#[derive(Debug, Default)]
pub struct App {
    state: UiState,
    /// Last issued fetch sequence number.
    issued_seq: u64,
    /// Highest sequence number whose completion has been observed.
    seen_seq: u64,
    fetches_in_flight: usize,
    /// Bumped on every snapshot replacement.
    snapshot_generation: u64,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.state.search_text = text.into();
    }

    /// Turn the current search text into a query, or reject blank input.
    pub fn submit_search(&mut self) -> Result<LocationQuery, Notice> {
        search_query(&self.state.search_text).ok_or(Notice::EmptySearch)
    }

    /// Issue a ticket for a new fetch attempt and raise the loading flag.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued_seq += 1;
        self.fetches_in_flight += 1;
        self.state.loading = true;
        FetchTicket { seq: self.issued_seq }
    }

    /// Settle a ticket without a result: nothing changes beyond loading.
    /// The ticket does not count as "seen", so it cannot supersede a real
    /// fetch that is still in flight.
    pub fn skip_fetch(&mut self, _ticket: FetchTicket) {
        self.settle_loading();
    }

    /// Settle a ticket with the provider's outcome.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<WeatherSnapshot, FetchError>,
    ) -> FetchCompletion {
        self.settle_loading();

        let stale = ticket.seq <= self.seen_seq;
        self.seen_seq = self.seen_seq.max(ticket.seq);
        if stale {
            debug!(seq = ticket.seq, "discarding superseded fetch result");
            return FetchCompletion::Stale;
        }

        match outcome {
            Ok(snapshot) => {
                self.snapshot_generation += 1;
                self.state.theme = Theme::classify(Some(&snapshot));
                let request = SummaryRequest::from(&snapshot);
                self.state.snapshot = Some(snapshot);
                self.state.loading_ai_summary = true;
                FetchCompletion::Applied(SummaryTicket {
                    generation: self.snapshot_generation,
                    request,
                })
            }
            // The previous snapshot is retained on failure; the UI keeps
            // showing the last good data.
            Err(e) => FetchCompletion::Failed(Notice::FetchFailed(e.to_string())),
        }
    }

    /// Apply a summary result, unless its snapshot has been superseded.
    pub fn complete_summary(&mut self, ticket: SummaryTicket, summary: String) -> bool {
        if ticket.generation != self.snapshot_generation {
            debug!(generation = ticket.generation, "discarding stale summary result");
            return false;
        }

        self.state.loading_ai_summary = false;
        self.state.summary = Some(summary);
        true
    }

    /// The loading flag clears whenever the last in-flight fetch settles,
    /// regardless of the outcome.
    fn settle_loading(&mut self) {
        self.fetches_in_flight = self.fetches_in_flight.saturating_sub(1);
        self.state.loading = self.fetches_in_flight > 0;
    }
}

/// App state shared between the UI loop and spawned tasks.
pub type SharedApp = Arc<Mutex<App>>;

/// Fresh app state behind a shared handle.
pub fn new_shared() -> SharedApp {
    Arc::new(Mutex::new(App::new()))
}

/// Run one fetch: ticket out, provider call, completion applied.
///
/// On success a summary task is spawned and its handle returned, so the
/// weather fetch and the summary request run concurrently without blocking
/// each other; callers that want the summary before exiting can await the
/// handle, everyone else drops it.
pub async fn fetch_flow(
    app: SharedApp,
    provider: Arc<dyn WeatherProvider>,
    summarizer: Arc<dyn Summarizer>,
    notices: UnboundedSender<Notice>,
    query: LocationQuery,
) -> Option<JoinHandle<()>> {
    if query.is_none() {
        let mut app = app.lock();
        let ticket = app.begin_fetch();
        app.skip_fetch(ticket);
        return None;
    }

    let ticket = app.lock().begin_fetch();
    let outcome = provider.current_weather(&query).await;

    let completion = app.lock().complete_fetch(ticket, outcome);
    match completion {
        FetchCompletion::Applied(summary_ticket) => {
            let app = app.clone();
            Some(tokio::spawn(async move {
                summary_flow(app, summarizer, summary_ticket).await;
            }))
        }
        FetchCompletion::Failed(notice) => {
            let _ = notices.send(notice);
            None
        }
        FetchCompletion::Stale => None,
    }
}

/// Request a summary for one snapshot generation and apply the result.
pub async fn summary_flow(app: SharedApp, summarizer: Arc<dyn Summarizer>, ticket: SummaryTicket) {
    let summary = request_summary(summarizer.as_ref(), &ticket.request).await;
    app.lock().complete_summary(ticket, summary);
}

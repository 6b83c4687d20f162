//! `Session` - stage handlers driving the provider.

use futures::future::join_all;
use moviesearch_api::omdb::{OmdbApi, OmdbReply, PlotLength, SearchParams};
use tokio::sync::watch;
use tracing::instrument;

use crate::enrich::{EnrichmentPolicy, build_genre_index};
use crate::state::{GenreFilter, SessionState, SortOrder};

/// Shown when the provider reports no match without a message.
pub const NO_RESULTS_MESSAGE: &str = "No results found";

/// Shown when the search request itself fails.
pub const SEARCH_FAILED_MESSAGE: &str = "Failed to fetch movies";

/// Shown when a detail request fails.
pub const DETAILS_FAILED_MESSAGE: &str = "Failed to fetch movie details";

/// One browsing session against the provider.
///
/// The session is the only writer of its [`SessionState`]. Each stage
/// applies its result in a single `send_modify`, so readers never see a
/// half-applied search. A new search never waits for an older one: the
/// older one keeps running, but its outcome and its genres are dropped.
/// Nothing is cancelled: a detail that arrives after going back still
/// opens.
#[derive(Debug)]
pub struct Session<A> {
    /// Provider client.
    api: A,
    /// Current state; receivers observe every update.
    state: watch::Sender<SessionState>,
    /// Failure handling for the enrichment batch.
    policy: EnrichmentPolicy,
    /// Plot length requested by the detail stage.
    plot: PlotLength,
}

impl<A: OmdbApi> Session<A> {
    /// Creates a session with default state.
    #[must_use]
    pub fn new(api: A) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            api,
            state,
            policy: EnrichmentPolicy::default(),
            plot: PlotLength::default(),
        }
    }

    /// Sets the enrichment failure policy.
    #[must_use]
    pub const fn enrichment_policy(mut self, policy: EnrichmentPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the initial sort order.
    #[must_use]
    pub fn sort_order(self, order: SortOrder) -> Self {
        self.state.send_modify(|s| s.sort_order = order);
        self
    }

    /// Sets the plot length requested when opening a detail.
    #[must_use]
    pub const fn plot_length(mut self, plot: PlotLength) -> Self {
        self.plot = plot;
        self
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Subscribes to state updates.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Runs the search and enrichment stages for the first page of `query`.
    pub async fn search(&self, query: &str) {
        self.search_page(query, 1).await;
    }

    /// Runs the search and enrichment stages for one page of `query`.
    ///
    /// An empty or whitespace-only query does nothing. The loading flag
    /// stays set until enrichment settles, but results are published as
    /// soon as the search answers.
    #[instrument(skip_all, fields(page = page))]
    pub async fn search_page(&self, query: &str, page: u32) {
        let query = query.trim();
        if query.is_empty() {
            tracing::debug!("Ignoring empty query");
            return;
        }

        let params = SearchParams::new(query).page(page);
        let mut generation = 0;
        self.state
            .send_modify(|s| generation = s.begin_search(query, params.page));
        self.run_search(generation, &params).await;
    }

    /// Searches the next page of the current query, if there is one.
    pub async fn next_page(&self) {
        self.step_page(true).await;
    }

    /// Searches the previous page of the current query, if there is one.
    pub async fn prev_page(&self) {
        self.step_page(false).await;
    }

    /// Picks the adjacent page and starts its search in one state update.
    #[instrument(skip_all, fields(forward = forward))]
    async fn step_page(&self, forward: bool) {
        let mut ticket: Option<(u64, String, u32)> = None;
        self.state.send_if_modified(|s| {
            ticket = s.begin_page_step(forward);
            ticket.is_some()
        });

        match ticket {
            Some((generation, query, page)) => {
                let params = SearchParams::new(query).page(page);
                self.run_search(generation, &params).await;
            }
            None => tracing::debug!("No adjacent page"),
        }
    }

    /// Sends the search request and applies its outcome.
    async fn run_search(&self, generation: u64, params: &SearchParams) {
        let query = params.query.as_str();
        match self.api.search(params).await {
            Ok(OmdbReply::Found(found)) => {
                tracing::debug!(
                    query,
                    page = params.page,
                    count = found.results.len(),
                    total = found.total_results,
                    "Search returned results"
                );
                let ids: Vec<String> = found.results.iter().map(|r| r.imdb_id.clone()).collect();
                let applied = self.apply_if_current(generation, |s| {
                    s.apply_results(query, params.page, found);
                });
                if applied {
                    self.enrich(generation, &ids).await;
                }
            }
            Ok(OmdbReply::NotFound { error }) => {
                tracing::debug!(query, ?error, "Search returned no results");
                let message = error.unwrap_or_else(|| String::from(NO_RESULTS_MESSAGE));
                self.apply_if_current(generation, |s| s.apply_no_results(query, message));
            }
            Err(e) => {
                tracing::warn!(query, error = %format!("{e:#}"), "Search request failed");
                self.apply_if_current(generation, |s| {
                    s.apply_search_failure(SEARCH_FAILED_MESSAGE);
                });
            }
        }

        self.state.send_modify(SessionState::end_request);
    }

    /// Looks up every result concurrently and rebuilds the genre index.
    ///
    /// All lookups settle before the index is applied.
    #[instrument(skip_all, fields(count = ids.len()))]
    async fn enrich(&self, generation: u64, ids: &[String]) {
        let lookups = ids
            .iter()
            .map(|id| self.api.movie_details(id, PlotLength::Short));
        let replies = join_all(lookups).await;

        match build_genre_index(ids, replies, self.policy) {
            Ok(index) => {
                tracing::debug!(genres = index.genres().len(), "Enrichment complete");
                self.apply_if_current(generation, |s| s.apply_genre_index(index));
            }
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "Enrichment failed");
                self.apply_if_current(generation, SessionState::clear_genres);
            }
        }
    }

    /// Applies `update` only while `generation` is the latest search.
    fn apply_if_current(&self, generation: u64, update: impl FnOnce(&mut SessionState)) -> bool {
        let applied = self.state.send_if_modified(|s| {
            if !s.is_current(generation) {
                return false;
            }
            update(s);
            true
        });
        if !applied {
            tracing::debug!(generation, "Dropping outcome of a superseded search");
        }
        applied
    }

    /// Runs the detail stage for `imdb_id`.
    ///
    /// A provider-level miss leaves the view as it is and sets no error.
    /// Every call issues a new request.
    #[instrument(skip_all)]
    pub async fn select(&self, imdb_id: &str) {
        self.state.send_modify(SessionState::begin_request);

        match self.api.movie_details(imdb_id, self.plot).await {
            Ok(OmdbReply::Found(detail)) => {
                tracing::debug!(imdb_id, title = %detail.title, "Opening detail view");
                self.state.send_modify(|s| s.show_detail(detail));
            }
            Ok(OmdbReply::NotFound { error }) => {
                tracing::debug!(imdb_id, ?error, "Detail lookup returned no detail");
            }
            Err(e) => {
                tracing::warn!(imdb_id, error = %format!("{e:#}"), "Detail request failed");
                self.state
                    .send_modify(|s| s.apply_detail_failure(DETAILS_FAILED_MESSAGE));
            }
        }

        self.state.send_modify(SessionState::end_request);
    }

    /// Returns to the list view.
    pub fn back(&self) {
        self.state.send_modify(SessionState::back);
    }

    /// Flips the year sort direction.
    pub fn toggle_sort(&self) {
        self.state.send_modify(SessionState::toggle_sort);
    }

    /// Selects a genre filter.
    pub fn set_genre_filter(&self, filter: GenreFilter) {
        self.state.send_modify(|s| s.set_genre_filter(filter));
    }
}

//! Session state record and its transitions.

use std::collections::BTreeSet;
use std::fmt;

use moviesearch_api::omdb::{MovieDetail, ResultSummary, SearchPage};
use serde::Deserialize;

use crate::derive::derive_visible;
use crate::enrich::GenreIndex;

/// Results the provider returns per page.
pub const RESULTS_PER_PAGE: u32 = 10;

/// Year sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum SortOrder {
    /// Oldest first.
    #[serde(rename = "asc")]
    Ascending,
    /// Newest first.
    #[default]
    #[serde(rename = "desc")]
    Descending,
}

impl SortOrder {
    /// Returns the opposite direction.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ascending => "Ascending",
            Self::Descending => "Descending",
        }
    }
}

/// Genre filter selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GenreFilter {
    /// No filtering.
    #[default]
    All,
    /// Keep results whose genre string contains this text.
    Genre(String),
}

impl GenreFilter {
    /// Sentinel value meaning "no filter".
    pub const ALL: &'static str = "all";

    /// Parses a selector value; `"all"` maps to [`GenreFilter::All`].
    #[must_use]
    pub fn from_selection(value: &str) -> Self {
        if value == Self::ALL {
            Self::All
        } else {
            Self::Genre(String::from(value))
        }
    }
}

impl fmt::Display for GenreFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(Self::ALL),
            Self::Genre(genre) => f.write_str(genre),
        }
    }
}

/// Which view is active.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewState {
    /// Result list.
    #[default]
    List,
    /// Full detail of one movie.
    Detail(Box<MovieDetail>),
}

/// State of one browsing session.
///
/// Stage handlers replace fields wholesale; results of two different
/// searches are never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct SessionState {
    /// Query whose results are shown.
    pub query: String,
    /// Search results in provider order.
    pub results: Vec<ResultSummary>,
    /// Genres of the current results.
    pub genre_index: GenreIndex,
    /// Selected genre filter.
    pub genre_filter: GenreFilter,
    /// Year sort direction.
    pub sort_order: SortOrder,
    /// Active view.
    pub view: ViewState,
    /// Message from the last failed operation.
    pub error: Option<String>,
    /// Current result page (0 before the first search).
    pub page: u32,
    /// Total matches reported by the provider.
    pub total_results: u32,
    /// Requests currently outstanding.
    in_flight: usize,
    /// Generation of the latest submitted search.
    generation: u64,
    /// Query and page of the latest search that has not answered yet.
    pending: Option<(String, u32)>,
}

impl SessionState {
    /// Whether any request is outstanding.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Genre tags offered by the genre selector.
    #[must_use]
    pub const fn genres(&self) -> &BTreeSet<String> {
        self.genre_index.genres()
    }

    /// Results after filtering and sorting.
    #[must_use]
    pub fn visible_results(&self) -> Vec<&ResultSummary> {
        derive_visible(
            &self.results,
            &self.genre_index,
            &self.genre_filter,
            self.sort_order,
        )
    }

    /// Movie shown in the detail view, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&MovieDetail> {
        match &self.view {
            ViewState::List => None,
            ViewState::Detail(detail) => Some(detail.as_ref()),
        }
    }

    /// Number of result pages for the current query.
    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        self.total_results.div_ceil(RESULTS_PER_PAGE)
    }

    /// Flips the sort direction.
    pub const fn toggle_sort(&mut self) {
        self.sort_order = self.sort_order.toggled();
    }

    /// Replaces the genre filter.
    pub fn set_genre_filter(&mut self, filter: GenreFilter) {
        self.genre_filter = filter;
    }

    /// Returns to the list view. Nothing else changes.
    pub fn back(&mut self) {
        self.view = ViewState::List;
    }

    /// Registers a new search and returns its generation.
    pub(crate) fn begin_search(&mut self, query: &str, page: u32) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.pending = Some((String::from(query), page));
        self.error = None;
        self.begin_request();
        self.generation
    }

    /// Whether `generation` belongs to the latest submitted search.
    pub(crate) const fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Registers a search for the page next to the latest requested one.
    ///
    /// Returns the generation, query and page to fetch, or `None` when
    /// there is no such page.
    pub(crate) fn begin_page_step(&mut self, forward: bool) -> Option<(u64, String, u32)> {
        let (query, page) = match &self.pending {
            Some((query, _)) if *query != self.query => return None,
            Some((query, page)) => (query.clone(), *page),
            None => (self.query.clone(), self.page),
        };
        let target = if forward {
            if page == 0 || page >= self.total_pages() {
                return None;
            }
            page.saturating_add(1)
        } else {
            if page <= 1 {
                return None;
            }
            page.saturating_sub(1)
        };
        let generation = self.begin_search(&query, target);
        Some((generation, query, target))
    }

    pub(crate) const fn begin_request(&mut self) {
        self.in_flight = self.in_flight.saturating_add(1);
    }

    pub(crate) const fn end_request(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// A search succeeded: results and genres start over.
    pub(crate) fn apply_results(&mut self, query: &str, page: u32, found: SearchPage) {
        self.query = String::from(query);
        self.page = page;
        self.total_results = found.total_results;
        self.results = found.results;
        self.genre_index = GenreIndex::default();
        self.error = None;
        self.pending = None;
    }

    /// The provider answered `Response: "False"` to a search.
    pub(crate) fn apply_no_results(&mut self, query: &str, message: String) {
        self.query = String::from(query);
        self.page = 0;
        self.total_results = 0;
        self.results.clear();
        self.genre_index = GenreIndex::default();
        self.error = Some(message);
        self.pending = None;
    }

    /// The search request itself failed. Prior results stay in place.
    pub(crate) fn apply_search_failure(&mut self, message: &str) {
        self.error = Some(String::from(message));
        self.pending = None;
    }

    pub(crate) fn apply_genre_index(&mut self, index: GenreIndex) {
        self.genre_index = index;
    }

    pub(crate) fn clear_genres(&mut self) {
        self.genre_index = GenreIndex::default();
    }

    pub(crate) fn show_detail(&mut self, detail: MovieDetail) {
        self.view = ViewState::Detail(Box::new(detail));
    }

    pub(crate) fn apply_detail_failure(&mut self, message: &str) {
        self.error = Some(String::from(message));
    }
}

//! Search session for moviesearch.
//!
//! Owns the view state of one browsing session and drives the
//! search → enrichment → presentation → detail pipeline against an
//! [`OmdbApi`](moviesearch_api::omdb::OmdbApi) implementation.

/// Presentation derivation (filter then sort).
pub mod derive;
/// Genre index built by the enrichment stage.
pub mod enrich;
/// Stage handlers driving the provider.
pub mod session;
/// Session state record.
pub mod state;

pub use derive::{derive_visible, parse_year};
pub use enrich::{EnrichmentPolicy, GenreIndex};
pub use session::{DETAILS_FAILED_MESSAGE, NO_RESULTS_MESSAGE, SEARCH_FAILED_MESSAGE, Session};
pub use state::{GenreFilter, SessionState, SortOrder, ViewState};

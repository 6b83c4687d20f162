//! OMDb API client module.
//!
//! Handles HTTP requests to the OMDb endpoint and decodes
//! search results and per-title details.

mod api;
mod client;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalOmdbApi, OmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{OmdbClient, OmdbClientBuilder};
#[allow(clippy::module_name_repetitions)]
pub use types::{
    GENRE_DELIMITER, IMDB_TITLE_BASE_URL, MovieDetail, NOT_AVAILABLE, OmdbReply,
    PLACEHOLDER_POSTER_URL, PlotLength, ResultSummary, SearchPage, SearchParams, imdb_title_url,
    poster_or_placeholder,
};

//! `OmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{MovieDetail, OmdbReply, PlotLength, SearchPage, SearchParams};

/// OMDb API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
///
/// A provider-level "not found" is returned as [`OmdbReply::NotFound`];
/// only transport and decoding failures are errors.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(OmdbApi: Send)]
pub trait LocalOmdbApi {
    /// Searches titles (`s=`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn search(&self, params: &SearchParams) -> Result<OmdbReply<SearchPage>>;

    /// Looks up a single title by IMDb identifier (`i=`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_details(&self, imdb_id: &str, plot: PlotLength)
    -> Result<OmdbReply<MovieDetail>>;
}

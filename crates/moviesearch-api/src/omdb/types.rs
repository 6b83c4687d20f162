//! OMDb API response types and request parameters.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Sentinel the provider uses for missing values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Image shown in place of a missing poster.
pub const PLACEHOLDER_POSTER_URL: &str = "https://via.placeholder.com/300x450?text=No+Poster";

/// Delimiter between genre tags in the `Genre` field.
pub const GENRE_DELIMITER: &str = ", ";

/// IMDb title page prefix.
pub const IMDB_TITLE_BASE_URL: &str = "https://www.imdb.com/title";

/// Returns the IMDb page of a title.
#[must_use]
pub fn imdb_title_url(imdb_id: &str) -> String {
    format!("{IMDB_TITLE_BASE_URL}/{imdb_id}/")
}

/// Returns the poster URL, or the placeholder when the provider has none.
#[must_use]
pub fn poster_or_placeholder(poster: &str) -> &str {
    if poster == NOT_AVAILABLE || poster.is_empty() {
        PLACEHOLDER_POSTER_URL
    } else {
        poster
    }
}

/// A request the provider answered.
///
/// `Response: "False"` is not an HTTP failure; it arrives as a regular
/// payload and is carried here as a value rather than an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OmdbReply<T> {
    /// `Response: "True"` with the decoded payload.
    Found(T),
    /// `Response: "False"`.
    NotFound {
        /// Provider message (e.g. "Movie not found!").
        error: Option<String>,
    },
}

impl<T> OmdbReply<T> {
    /// Returns the payload if the provider found something.
    #[must_use]
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound { .. } => None,
        }
    }
}

/// Fields shared by every OMDb response.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error", default)]
    error: Option<String>,
}

impl Envelope {
    fn is_success(&self) -> bool {
        self.response.eq_ignore_ascii_case("true")
    }
}

/// Decodes a response body into a reply.
///
/// The `Response` flag is read first; the payload is only decoded when
/// it is `"True"`.
pub(crate) fn parse_reply<T: DeserializeOwned>(body: &str) -> Result<OmdbReply<T>> {
    let envelope: Envelope =
        serde_json::from_str(body).context("failed to decode OMDb response envelope")?;
    if !envelope.is_success() {
        return Ok(OmdbReply::NotFound {
            error: envelope.error,
        });
    }
    let payload: T = serde_json::from_str(body).context("failed to decode OMDb payload")?;
    Ok(OmdbReply::Found(payload))
}

/// Returns the provider error if `body` is an OMDb failure envelope.
pub(crate) fn parse_error_envelope(body: &str) -> Option<Option<String>> {
    let envelope: Envelope = serde_json::from_str(body).ok()?;
    (!envelope.is_success()).then_some(envelope.error)
}

// --- Search ---

/// Query parameters for a search-by-title request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Title to search for (`s`).
    pub query: String,
    /// One-based result page (`page`).
    pub page: u32,
}

impl SearchParams {
    /// Creates parameters for the first page of `query`.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
        }
    }

    /// Sets the result page. Pages below 1 are clamped to 1.
    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }
}

/// Decoded body of a successful search.
#[derive(Debug, Deserialize)]
struct RawSearchPage {
    #[serde(rename = "Search", default)]
    search: Vec<ResultSummary>,
    #[serde(rename = "totalResults", default)]
    total_results: Option<String>,
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawSearchPage")]
pub struct SearchPage {
    /// Summaries in provider order.
    pub results: Vec<ResultSummary>,
    /// Total number of matches across all pages.
    pub total_results: u32,
}

impl From<RawSearchPage> for SearchPage {
    fn from(raw: RawSearchPage) -> Self {
        let fallback = u32::try_from(raw.search.len()).unwrap_or(u32::MAX);
        let total_results = raw
            .total_results
            .and_then(|t| t.trim().parse().ok())
            .unwrap_or(fallback);
        Self {
            results: raw.search,
            total_results,
        }
    }
}

/// A single search result.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResultSummary {
    /// IMDb identifier (e.g. `tt0372784`).
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    /// Title.
    #[serde(rename = "Title")]
    pub title: String,
    /// Release year as text (`"2005"`, or a range such as `"2011–2019"`).
    #[serde(rename = "Year")]
    pub year: String,
    /// Poster URL or `"N/A"`.
    #[serde(rename = "Poster", default = "not_available")]
    pub poster: String,
    /// Media type (`movie`, `series`, `episode`).
    #[serde(rename = "Type", default)]
    pub kind: Option<String>,
}

impl ResultSummary {
    /// Returns the poster URL, falling back to the placeholder.
    #[must_use]
    pub fn poster_url(&self) -> &str {
        poster_or_placeholder(&self.poster)
    }
}

// --- Lookup by identifier ---

/// Plot length requested from a lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlotLength {
    /// Short plot (provider default).
    #[default]
    Short,
    /// Full plot.
    Full,
}

impl PlotLength {
    /// Returns the `plot` query parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Full => "full",
        }
    }
}

/// Full record returned by a lookup by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MovieDetail {
    /// IMDb identifier.
    #[serde(rename = "imdbID", default)]
    pub imdb_id: String,
    /// Title.
    #[serde(rename = "Title", default)]
    pub title: String,
    /// Release year as text.
    #[serde(rename = "Year", default)]
    pub year: String,
    /// Rating certificate (e.g. `PG-13`).
    #[serde(rename = "Rated", default)]
    pub rated: Option<String>,
    /// Release date (e.g. `15 Jun 2005`).
    #[serde(rename = "Released", default)]
    pub released: Option<String>,
    /// Runtime (e.g. `140 min`).
    #[serde(rename = "Runtime", default)]
    pub runtime: Option<String>,
    /// Comma-space delimited genre tags.
    #[serde(rename = "Genre", default)]
    pub genre: Option<String>,
    /// Director(s).
    #[serde(rename = "Director", default)]
    pub director: Option<String>,
    /// Main cast.
    #[serde(rename = "Actors", default)]
    pub actors: Option<String>,
    /// Plot text.
    #[serde(rename = "Plot", default)]
    pub plot: Option<String>,
    /// Spoken languages.
    #[serde(rename = "Language", default)]
    pub language: Option<String>,
    /// Production countries.
    #[serde(rename = "Country", default)]
    pub country: Option<String>,
    /// Poster URL or `"N/A"`.
    #[serde(rename = "Poster", default = "not_available")]
    pub poster: String,
    /// IMDb rating as text (e.g. `8.2`).
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: Option<String>,
    /// Media type.
    #[serde(rename = "Type", default)]
    pub kind: Option<String>,
}

impl MovieDetail {
    /// Splits the genre field into tags, in provider order.
    ///
    /// A missing field, an empty string or `"N/A"` yields no tags.
    #[must_use]
    pub fn genres(&self) -> Vec<&str> {
        self.genre
            .as_deref()
            .filter(|g| *g != NOT_AVAILABLE)
            .map(|g| {
                g.split(GENRE_DELIMITER)
                    .filter(|tag| !tag.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the poster URL, falling back to the placeholder.
    #[must_use]
    pub fn poster_url(&self) -> &str {
        poster_or_placeholder(&self.poster)
    }
}

fn not_available() -> String {
    String::from(NOT_AVAILABLE)
}

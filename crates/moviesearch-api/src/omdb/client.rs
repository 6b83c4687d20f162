//! `OmdbClient` - OMDb API client implementation.

use anyhow::{Context, Result, bail};
use reqwest::Client;
use tracing::instrument;
use url::Url;

use super::api::OmdbApi;
use super::types::{
    MovieDetail, OmdbReply, PlotLength, SearchPage, SearchParams, parse_error_envelope,
    parse_reply,
};

/// Default base URL for the OMDb API.
const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";

/// OMDb API client.
///
/// Requests carry no retry, backoff or timeout; a hung request stays
/// pending until the server answers or the connection drops.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct OmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// API key sent as the `apikey` query parameter.
    api_key: String,
}

/// Builder for `OmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct OmdbClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
}

impl OmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            user_agent: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_key` is not set.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<OmdbClient> {
        let api_key = self.api_key.context("api_key is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(OmdbClient {
            http_client,
            base_url,
            api_key,
        })
    }
}

impl OmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> OmdbClientBuilder {
        OmdbClientBuilder::new()
    }

    /// Sends a GET request with the API key and decodes the OMDb envelope.
    ///
    /// Non-2xx responses whose body is an OMDb failure envelope (e.g. an
    /// invalid key) are returned as `NotFound`; any other non-2xx status
    /// is an error.
    #[instrument(skip_all)]
    async fn get_reply<T: serde::de::DeserializeOwned>(
        &self,
        query: &[(&str, String)],
    ) -> Result<OmdbReply<T>> {
        tracing::debug!(url = %self.base_url, ?query, "OMDb API request");

        let request = self
            .http_client
            .get(self.base_url.clone())
            .query(&[("apikey", self.api_key.as_str())])
            .query(query)
            .build()
            .context("failed to build request")?;

        let result = self.http_client.execute(request).await;
        let response = result.context("OMDb request failed")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("failed to read response body")?;

        if !status.is_success() {
            if let Some(error) = parse_error_envelope(&body) {
                tracing::debug!(%status, ?error, "OMDb API returned an error envelope");
                return Ok(OmdbReply::NotFound { error });
            }
            bail!("OMDb API error (HTTP {status}): {body}");
        }

        parse_reply(&body)
    }
}

impl OmdbApi for OmdbClient {
    #[instrument(skip_all)]
    async fn search(&self, params: &SearchParams) -> Result<OmdbReply<SearchPage>> {
        let mut query: Vec<(&str, String)> = vec![("s", params.query.clone())];
        if params.page > 1 {
            query.push(("page", params.page.to_string()));
        }

        self.get_reply(&query)
            .await
            .with_context(|| format!("OMDb search failed: {}", params.query))
    }

    #[instrument(skip_all)]
    async fn movie_details(
        &self,
        imdb_id: &str,
        plot: PlotLength,
    ) -> Result<OmdbReply<MovieDetail>> {
        let query = [
            ("i", String::from(imdb_id)),
            ("plot", String::from(plot.as_str())),
        ];

        self.get_reply(&query)
            .await
            .with_context(|| format!("OMDb lookup failed: {imdb_id}"))
    }
}

//! Genre index built from the per-result detail lookups.

use std::collections::{BTreeSet, HashMap};

use anyhow::Result;
use moviesearch_api::omdb::{MovieDetail, OmdbReply};
use serde::Deserialize;

/// How a transport failure inside the enrichment batch is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnrichmentPolicy {
    /// Any failed lookup voids the whole genre update.
    #[default]
    AllOrNothing,
    /// Failed lookups are skipped; the rest still contribute.
    BestEffort,
}

/// Genres seen during one enrichment run.
///
/// Holds both the deduplicated tag set offered to the genre selector and
/// each identifier's raw genre string, which the filter matches against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreIndex {
    /// Raw `Genre` field per identifier.
    by_id: HashMap<String, String>,
    /// Union of all tags.
    genres: BTreeSet<String>,
}

impl GenreIndex {
    /// Records the genres of `detail` under `imdb_id`.
    pub fn insert(&mut self, imdb_id: &str, detail: &MovieDetail) {
        let Some(raw) = detail.genre.as_ref() else {
            return;
        };
        self.genres
            .extend(detail.genres().into_iter().map(String::from));
        self.by_id.insert(String::from(imdb_id), raw.clone());
    }

    /// Returns the deduplicated genre tags, sorted.
    #[must_use]
    pub const fn genres(&self) -> &BTreeSet<String> {
        &self.genres
    }

    /// Returns the raw genre string recorded for `imdb_id`.
    #[must_use]
    pub fn genre_of(&self, imdb_id: &str) -> Option<&str> {
        self.by_id.get(imdb_id).map(String::as_str)
    }

    /// Whether the genre string of `imdb_id` contains `needle`.
    ///
    /// This is a substring match against the whole string, not a tag
    /// comparison: `"Crime"` also matches `"True Crime"`.
    #[must_use]
    pub fn matches(&self, imdb_id: &str, needle: &str) -> bool {
        self.genre_of(imdb_id).is_some_and(|g| g.contains(needle))
    }

    /// Whether no genres were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genres.is_empty() && self.by_id.is_empty()
    }
}

/// Folds the settled lookups of one enrichment batch into a genre index.
///
/// `replies` must be in the same order as `ids`. Provider-level misses
/// contribute nothing.
///
/// # Errors
///
/// With [`EnrichmentPolicy::AllOrNothing`], returns the first transport
/// failure in the batch.
pub(crate) fn build_genre_index(
    ids: &[String],
    replies: Vec<Result<OmdbReply<MovieDetail>>>,
    policy: EnrichmentPolicy,
) -> Result<GenreIndex> {
    let mut index = GenreIndex::default();
    for (imdb_id, reply) in ids.iter().zip(replies) {
        match reply {
            Ok(OmdbReply::Found(detail)) => index.insert(imdb_id, &detail),
            Ok(OmdbReply::NotFound { error }) => {
                tracing::debug!(%imdb_id, ?error, "Genre lookup returned no detail");
            }
            Err(e) => match policy {
                EnrichmentPolicy::AllOrNothing => {
                    return Err(e.context(format!("genre lookup failed: {imdb_id}")));
                }
                EnrichmentPolicy::BestEffort => {
                    tracing::debug!(%imdb_id, error = %e, "Skipping failed genre lookup");
                }
            },
        }
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use anyhow::anyhow;

    use super::*;

    fn detail(genre: Option<&str>) -> MovieDetail {
        MovieDetail {
            genre: genre.map(String::from),
            ..MovieDetail::default()
        }
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| String::from(*s)).collect()
    }

    #[test]
    fn test_union_is_deduplicated() {
        // Arrange
        let replies = vec![
            Ok(OmdbReply::Found(detail(Some("Action, Drama")))),
            Ok(OmdbReply::Found(detail(Some("Drama, Comedy")))),
        ];

        // Act
        let index =
            build_genre_index(&ids(&["tt1", "tt2"]), replies, EnrichmentPolicy::default())
                .unwrap();

        // Assert
        let genres: Vec<&str> = index.genres().iter().map(String::as_str).collect();
        assert_eq!(genres, vec!["Action", "Comedy", "Drama"]);
        assert_eq!(index.genre_of("tt2"), Some("Drama, Comedy"));
    }

    #[test]
    fn test_missing_genre_and_not_found_contribute_nothing() {
        // Arrange
        let replies = vec![
            Ok(OmdbReply::Found(detail(None))),
            Ok(OmdbReply::NotFound {
                error: Some(String::from("Incorrect IMDb ID.")),
            }),
            Ok(OmdbReply::Found(detail(Some("Horror")))),
        ];

        // Act
        let index = build_genre_index(
            &ids(&["tt1", "tt2", "tt3"]),
            replies,
            EnrichmentPolicy::AllOrNothing,
        )
        .unwrap();

        // Assert
        assert_eq!(index.genres().len(), 1);
        assert!(index.genre_of("tt1").is_none());
        assert!(index.genre_of("tt2").is_none());
        assert!(index.matches("tt3", "Horror"));
    }

    #[test]
    fn test_all_or_nothing_fails_on_any_transport_error() {
        // Arrange
        let replies = vec![
            Ok(OmdbReply::Found(detail(Some("Action")))),
            Err(anyhow!("connection reset")),
        ];

        // Act
        let result = build_genre_index(
            &ids(&["tt1", "tt2"]),
            replies,
            EnrichmentPolicy::AllOrNothing,
        );

        // Assert
        let err = format!("{:#}", result.unwrap_err());
        assert!(err.contains("tt2"));
        assert!(err.contains("connection reset"));
    }

    #[test]
    fn test_best_effort_skips_failed_lookups() {
        // Arrange
        let replies = vec![
            Err(anyhow!("connection reset")),
            Ok(OmdbReply::Found(detail(Some("Action, Crime")))),
        ];

        // Act
        let index = build_genre_index(
            &ids(&["tt1", "tt2"]),
            replies,
            EnrichmentPolicy::BestEffort,
        )
        .unwrap();

        // Assert
        assert_eq!(index.genres().len(), 2);
        assert!(index.genre_of("tt1").is_none());
    }

    #[test]
    fn test_matches_is_substring_based() {
        // Arrange
        let mut index = GenreIndex::default();
        index.insert("tt1", &detail(Some("Action, True Crime")));

        // Act & Assert
        assert!(index.matches("tt1", "Crime"));
        assert!(index.matches("tt1", "Act"));
        assert!(!index.matches("tt1", "Drama"));
        assert!(!index.matches("tt9", "Action"));
    }

    #[test]
    fn test_policy_config_names() {
        // Arrange
        #[derive(Deserialize)]
        struct Wrapper {
            policy: EnrichmentPolicy,
        }

        // Act
        let all: Wrapper = toml::from_str(r#"policy = "all-or-nothing""#).unwrap();
        let best: Wrapper = toml::from_str(r#"policy = "best-effort""#).unwrap();

        // Assert
        assert_eq!(all.policy, EnrichmentPolicy::AllOrNothing);
        assert_eq!(best.policy, EnrichmentPolicy::BestEffort);
    }
}

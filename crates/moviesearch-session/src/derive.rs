//! Displayed result sequence, derived from state on every read.

use std::cmp::Ordering;

use moviesearch_api::omdb::ResultSummary;

use crate::enrich::GenreIndex;
use crate::state::{GenreFilter, SortOrder};

/// Parses the leading integer of a year field.
///
/// `"2005"` → 2005, `"2011–2019"` → 2011, `"N/A"` → `None`.
#[must_use]
pub fn parse_year(year: &str) -> Option<u32> {
    let trimmed = year.trim_start();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed.get(..end)?.parse().ok()
}

/// Orders two parsed years; unparsable years go last in both directions.
fn compare_years(a: Option<u32>, b: Option<u32>, order: SortOrder) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match order {
            SortOrder::Ascending => a.cmp(&b),
            SortOrder::Descending => b.cmp(&a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Filters then sorts `results`.
///
/// The filter keeps a result when its genre string (from `index`)
/// contains the selected genre as a substring. The sort is stable, so
/// results from the same year keep their provider order.
#[must_use]
pub fn derive_visible<'a>(
    results: &'a [ResultSummary],
    index: &GenreIndex,
    filter: &GenreFilter,
    order: SortOrder,
) -> Vec<&'a ResultSummary> {
    let mut visible: Vec<&ResultSummary> = match filter {
        GenreFilter::All => results.iter().collect(),
        GenreFilter::Genre(genre) => results
            .iter()
            .filter(|r| index.matches(&r.imdb_id, genre))
            .collect(),
    };
    visible.sort_by(|a, b| compare_years(parse_year(&a.year), parse_year(&b.year), order));
    visible
}

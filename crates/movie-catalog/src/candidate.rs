//! Normalized search results.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Wire format of release dates in catalog responses.
const RELEASE_DATE_FORMAT: &str = "%Y-%m-%d";

/// A movie returned by a catalog search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieCandidate {
    /// Catalog identifier.
    pub id: i64,
    /// Movie title as the catalog spells it.
    pub title: String,
    /// Release date, `None` when the catalog has no confirmed date.
    pub release_date: Option<NaiveDate>,
}

impl MovieCandidate {
    /// Release date as an instant (midnight UTC).
    pub fn release_instant(&self) -> Option<DateTime<Utc>> {
        self.release_date
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    /// Whether the release lies strictly after `now`. Unknown dates never do.
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.release_instant().is_some_and(|release| release > now)
    }
}

/// Parse a catalog release date. An empty string means "unknown".
pub fn parse_release_date(value: &str) -> Result<Option<NaiveDate>, CatalogError> {
    if value.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(value, RELEASE_DATE_FORMAT)
        .map(Some)
        .map_err(|source| CatalogError::InvalidReleaseDate {
            value: value.to_string(),
            source,
        })
}

/// Sort newest release first. Unknown dates order as the minimum and end up last.
pub fn sort_by_release_desc(candidates: &mut [MovieCandidate]) {
    candidates.sort_by(|a, b| b.release_date.cmp(&a.release_date));
}

/// Keep candidates whose title contains `query`, ignoring case. Order is preserved.
pub fn filter_exact(candidates: Vec<MovieCandidate>, query: &str) -> Vec<MovieCandidate> {
    let query = query.to_lowercase();
    candidates
        .into_iter()
        .filter(|candidate| candidate.title.to_lowercase().contains(&query))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn candidate(id: i64, title: &str, date: Option<(i32, u32, u32)>) -> MovieCandidate {
        MovieCandidate {
            id,
            title: title.to_string(),
            release_date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
        }
    }

    #[test]
    fn test_parse_release_date() {
        assert_eq!(
            parse_release_date("2019-02-14").unwrap(),
            NaiveDate::from_ymd_opt(2019, 2, 14)
        );
        assert_eq!(parse_release_date("").unwrap(), None);
    }

    #[test]
    fn test_parse_release_date_rejects_garbage() {
        let err = parse_release_date("14.02.2019").unwrap_err();
        assert!(matches!(err, CatalogError::InvalidReleaseDate { ref value, .. } if value == "14.02.2019"));
    }

    #[test]
    fn test_sort_descending_with_unknown_last() {
        let mut movies = vec![
            candidate(1, "Old", Some((1999, 1, 1))),
            candidate(2, "Unknown", None),
            candidate(3, "New", Some((2019, 2, 14))),
            candidate(4, "Middle", Some((2010, 6, 1))),
        ];
        sort_by_release_desc(&mut movies);

        let ids: Vec<i64> = movies.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 4, 1, 2]);
    }

    #[test]
    fn test_sort_keeps_unknown_dates_in_arrival_order() {
        let mut movies = vec![
            candidate(1, "A", None),
            candidate(2, "B", Some((2001, 1, 1))),
            candidate(3, "C", None),
        ];
        sort_by_release_desc(&mut movies);

        let ids: Vec<i64> = movies.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_filter_exact_is_case_insensitive_substring() {
        let movies = vec![
            candidate(1, "Julia", Some((2008, 1, 1))),
            candidate(2, "Julie & Julia", Some((2009, 1, 1))),
            candidate(3, "Julius Caesar", Some((1953, 1, 1))),
            candidate(4, "JULIA", None),
        ];
        let kept = filter_exact(movies, "Julia");

        let ids: Vec<i64> = kept.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 4]);
    }

    #[test]
    fn test_is_upcoming() {
        let now = Utc.with_ymd_and_hms(2019, 1, 1, 12, 0, 0).unwrap();
        assert!(candidate(1, "A", Some((2019, 1, 2))).is_upcoming(now));
        // Midnight of the same day is already in the past.
        assert!(!candidate(2, "B", Some((2019, 1, 1))).is_upcoming(now));
        assert!(!candidate(3, "C", None).is_upcoming(now));
    }
}

//! Helpers for STAC's `datetime` / `start_datetime` / `end_datetime` trio.
//!
//! A STAC [Item](crate::Item) describes its temporal extent either with a
//! single, nullable `datetime` or with a `start_datetime`/`end_datetime`
//! pair. This module has the shared parsing and range logic both
//! [Item](crate::Item) and [Extent](crate::Extent) build on.

use crate::{Error, Result};
use chrono::{DateTime, Utc};

/// Parses an RFC 3339 datetime string.
///
/// # Examples
///
/// ```
/// stac::datetime::parse("2020-01-01T00:00:00Z").unwrap();
/// ```
pub fn parse(s: &str) -> Result<DateTime<Utc>> {
    s.parse::<DateTime<Utc>>().map_err(Error::from)
}

/// Returns `true` if `datetime` falls within `[start, end]`, treating a
/// missing bound as unbounded on that side.
pub fn in_range(
    datetime: DateTime<Utc>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> bool {
    start.is_none_or(|start| datetime >= start) && end.is_none_or(|end| datetime <= end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses() {
        assert!(parse("2020-01-01T00:00:00Z").is_ok());
        assert!(parse("not-a-date").is_err());
    }

    #[test]
    fn range() {
        let start = parse("2020-01-01T00:00:00Z").unwrap();
        let middle = parse("2020-06-01T00:00:00Z").unwrap();
        let end = parse("2020-12-31T00:00:00Z").unwrap();
        assert!(in_range(middle, Some(start), Some(end)));
        assert!(!in_range(start - chrono::Duration::days(1), Some(start), Some(end)));
        assert!(in_range(middle, None, None));
    }
}

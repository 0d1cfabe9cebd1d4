// crates/core/src/filters.rs
//! Query-string filters shared by every filtered report.
//!
//! Parsing is best effort: a value that is not a positive integer is dropped
//! as if it had never been sent. Nothing here can fail.

use serde::Deserialize;

use crate::schema::SchemaMap;

/// Look-back window used when `time_range` is absent, empty or not a number.
pub const DEFAULT_TIME_RANGE_DAYS: u32 = 7;

/// Longest accepted window. SQLite's date modifiers yield NULL for offsets
/// far beyond this, which would silently empty every report.
pub const MAX_TIME_RANGE_DAYS: u32 = 36_500;

/// A validated dimension id: always a positive integer.
///
/// The field is private, so the only way to obtain one is [`DimensionId::parse`]
/// or [`DimensionId::new`], and the only thing a predicate can bind is the
/// inner `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DimensionId(i64);

impl DimensionId {
    pub fn new(id: i64) -> Option<Self> {
        (id > 0).then_some(DimensionId(id))
    }

    /// Parse a raw query-string value. `None` for empty, non-numeric,
    /// zero or negative input.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<i64>().ok().and_then(Self::new)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

/// Raw filter parameters exactly as they arrive on the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterQuery {
    pub time_range: Option<String>,
    pub region_id: Option<String>,
    pub channel_id: Option<String>,
    pub team_id: Option<String>,
    pub client_type_id: Option<String>,
}

impl FilterQuery {
    /// Build from decoded query-string pairs. The first occurrence of a key
    /// wins; unknown keys are ignored.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "time_range" => &mut query.time_range,
                "region_id" => &mut query.region_id,
                "channel_id" => &mut query.channel_id,
                "team_id" => &mut query.team_id,
                "client_type_id" => &mut query.client_type_id,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        query
    }
}

/// Normalized filters, ready for predicate construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSet {
    pub time_range_days: u32,
    pub region_id: Option<DimensionId>,
    pub channel_id: Option<DimensionId>,
    /// Only set when the layout has its own team dimension; otherwise a
    /// supplied `team_id` has been folded into `channel_id`.
    pub team_id: Option<DimensionId>,
    pub client_type_id: Option<DimensionId>,
}

impl Default for FilterSet {
    fn default() -> Self {
        Self {
            time_range_days: DEFAULT_TIME_RANGE_DAYS,
            region_id: None,
            channel_id: None,
            team_id: None,
            client_type_id: None,
        }
    }
}

impl FilterSet {
    /// Normalize raw parameters against the active schema layout.
    ///
    /// When the layout has no team dimension, `team_id` stands in for
    /// `channel_id`, but only if `channel_id` was not itself supplied.
    pub fn normalize(raw: &FilterQuery, map: &SchemaMap) -> Self {
        let parse = |v: &Option<String>| v.as_deref().and_then(DimensionId::parse);

        let time_range_days = raw
            .time_range
            .as_deref()
            .and_then(|v| v.trim().parse::<u32>().ok())
            .map(|days| days.min(MAX_TIME_RANGE_DAYS))
            .unwrap_or(DEFAULT_TIME_RANGE_DAYS);

        let mut channel_id = parse(&raw.channel_id);
        let mut team_id = parse(&raw.team_id);
        if !map.has_team_dimension() {
            channel_id = channel_id.or(team_id);
            team_id = None;
        }

        let client_type_id = if map.has_client_type_dimension() {
            parse(&raw.client_type_id)
        } else {
            None
        };

        Self {
            time_range_days,
            region_id: parse(&raw.region_id),
            channel_id,
            team_id,
            client_type_id,
        }
    }

    /// Same window, no dimension filters.
    pub fn window_only(&self) -> Self {
        Self {
            time_range_days: self.time_range_days,
            ..Self::default()
        }
    }

    /// The window as the textual day count the dashboard sends.
    pub fn time_range(&self) -> String {
        self.time_range_days.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaVariant;

    fn query(pairs: &[(&str, &str)]) -> FilterQuery {
        FilterQuery::from_pairs(pairs.iter().copied())
    }

    fn outcome(pairs: &[(&str, &str)]) -> FilterSet {
        FilterSet::normalize(&query(pairs), SchemaVariant::Outcome.map())
    }

    fn severity(pairs: &[(&str, &str)]) -> FilterSet {
        FilterSet::normalize(&query(pairs), SchemaVariant::Severity.map())
    }

    #[test]
    fn test_defaults_when_empty() {
        assert_eq!(outcome(&[]), FilterSet::default());
        assert_eq!(outcome(&[("time_range", "")]).time_range(), "7");
    }

    #[test]
    fn test_time_range_parsed() {
        assert_eq!(outcome(&[("time_range", "30")]).time_range_days, 30);
        assert_eq!(outcome(&[("time_range", "365")]).time_range(), "365");
    }

    #[test]
    fn test_huge_time_range_clamped() {
        assert_eq!(outcome(&[("time_range", "5000000")]).time_range_days, MAX_TIME_RANGE_DAYS);
        assert_eq!(outcome(&[("time_range", "36500")]).time_range_days, 36_500);
        // Beyond u32 is not a number at all.
        assert_eq!(outcome(&[("time_range", "99999999999")]).time_range_days, 7);
    }

    #[test]
    fn test_repeated_keys_keep_first_value() {
        let q = FilterQuery::from_pairs([
            ("region_id", "1"),
            ("region_id", "2"),
            ("utm_source", "mail"),
            ("time_range", "30"),
            ("time_range", "90"),
        ]);
        assert_eq!(q.region_id.as_deref(), Some("1"));
        assert_eq!(q.time_range.as_deref(), Some("30"));
    }

    #[test]
    fn test_non_numeric_time_range_falls_back() {
        assert_eq!(outcome(&[("time_range", "7; DROP TABLE x")]).time_range_days, 7);
        assert_eq!(outcome(&[("time_range", "-5")]).time_range_days, 7);
    }

    #[test]
    fn test_numeric_ids_kept() {
        let f = severity(&[("region_id", "3"), ("channel_id", " 2 "), ("client_type_id", "4")]);
        assert_eq!(f.region_id.map(DimensionId::get), Some(3));
        assert_eq!(f.channel_id.map(DimensionId::get), Some(2));
        assert_eq!(f.client_type_id.map(DimensionId::get), Some(4));
    }

    #[test]
    fn test_garbage_ids_dropped() {
        let f = severity(&[
            ("region_id", "north"),
            ("channel_id", "1 OR 1=1"),
            ("team_id", "0"),
            ("client_type_id", "-2"),
        ]);
        assert_eq!(f, FilterSet::default());
    }

    #[test]
    fn test_team_aliases_channel_when_no_team_dimension() {
        let f = outcome(&[("team_id", "5")]);
        assert_eq!(f.channel_id.map(DimensionId::get), Some(5));
        assert_eq!(f.team_id, None);
    }

    #[test]
    fn test_channel_wins_over_team_alias() {
        let f = outcome(&[("team_id", "5"), ("channel_id", "2")]);
        assert_eq!(f.channel_id.map(DimensionId::get), Some(2));
        assert_eq!(f.team_id, None);
    }

    #[test]
    fn test_bad_channel_lets_team_alias_through() {
        let f = outcome(&[("team_id", "5"), ("channel_id", "abc")]);
        assert_eq!(f.channel_id.map(DimensionId::get), Some(5));
    }

    #[test]
    fn test_team_is_independent_with_team_dimension() {
        let f = severity(&[("team_id", "5"), ("channel_id", "2")]);
        assert_eq!(f.channel_id.map(DimensionId::get), Some(2));
        assert_eq!(f.team_id.map(DimensionId::get), Some(5));
    }

    #[test]
    fn test_client_type_dropped_without_dimension() {
        assert_eq!(outcome(&[("client_type_id", "1")]).client_type_id, None);
    }

    #[test]
    fn test_window_only_keeps_days() {
        let f = severity(&[("time_range", "90"), ("region_id", "1")]);
        let w = f.window_only();
        assert_eq!(w.time_range_days, 90);
        assert_eq!(w.region_id, None);
    }

    #[test]
    fn test_dimension_id_bounds() {
        assert_eq!(DimensionId::new(0), None);
        assert_eq!(DimensionId::new(-1), None);
        assert_eq!(DimensionId::parse("+12").map(DimensionId::get), Some(12));
        assert_eq!(DimensionId::parse("1.5"), None);
    }
}

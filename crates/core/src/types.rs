// crates/core/src/types.rs
//! Public JSON contract consumed by the dashboard.
//!
//! Field names here are stable regardless of which schema layout backs the
//! store.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::shape::Severity;

/// `{ "data": [...] }` envelope used by the list reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: Vec<T>,
}

impl<T> From<Vec<T>> for DataResponse<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

// ============================================================================
// Filter dimensions
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
pub struct RegionOption {
    #[ts(type = "number")]
    pub region_id: i64,
    pub region_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
pub struct ChannelOption {
    #[ts(type = "number")]
    pub channel_id: i64,
    pub channel_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
pub struct TeamOption {
    #[ts(type = "number")]
    pub team_id: i64,
    pub team_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
pub struct ClientTypeOption {
    #[ts(type = "number")]
    pub client_type_id: i64,
    pub client_type_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
pub struct AgentOption {
    #[ts(type = "number")]
    pub agent_id: i64,
    pub agent_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
pub struct TimeRangeOption {
    pub label: String,
    pub value: String,
}

/// The fixed time-range choices offered by the dashboard.
pub fn time_range_options() -> Vec<TimeRangeOption> {
    [
        ("Last 7 days", "7"),
        ("Last 30 days", "30"),
        ("Last 90 days", "90"),
        ("Last 12 months", "365"),
    ]
    .into_iter()
    .map(|(label, value)| TimeRangeOption {
        label: label.to_string(),
        value: value.to_string(),
    })
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
pub struct FilterDimensions {
    pub regions: Vec<RegionOption>,
    pub teams: Vec<TeamOption>,
    pub channels: Vec<ChannelOption>,
    pub client_types: Vec<ClientTypeOption>,
    pub agents: Vec<AgentOption>,
    pub time_ranges: Vec<TimeRangeOption>,
}

// ============================================================================
// Mission brief
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
#[serde(rename_all = "lowercase")]
pub enum TileKind {
    Number,
    Percent,
    Decimal,
}

/// Counts are JSON numbers; formatted values are strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TileValue {
    Count(i64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
pub struct Tile {
    pub id: String,
    pub label: String,
    #[ts(type = "number | string")]
    pub value: TileValue,
    #[serde(rename = "type")]
    pub kind: TileKind,
}

impl Tile {
    pub fn new(id: &str, label: &str, value: TileValue, kind: TileKind) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            value,
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
pub struct TilesResponse {
    pub tiles: Vec<Tile>,
}

impl TilesResponse {
    pub fn tile(&self, id: &str) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == id)
    }
}

// ============================================================================
// Field signal
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
pub struct PulsePoint {
    pub calendar_date: String,
    #[ts(type = "number")]
    pub conversation_count: i64,
    pub avg_sentiment: f64,
    /// Converted conversations that day; the name is kept for the dashboard.
    #[ts(type = "number")]
    pub high_severity_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
pub struct IssueSummary {
    /// 1-based rank in the returned list.
    #[ts(type = "number")]
    pub issue_id: i64,
    pub issue_name: String,
    #[ts(type = "number")]
    pub volume: i64,
    pub avg_sentiment: f64,
    pub severity_score: f64,
    #[ts(type = "number")]
    pub conversions: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
pub struct SeverityCount {
    pub severity: Severity,
    #[ts(type = "number")]
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
pub struct Hotspot {
    #[ts(type = "number")]
    pub region_id: i64,
    pub region_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[ts(type = "number")]
    pub conversation_count: i64,
    pub avg_risk: f64,
}

// ============================================================================
// Field ops
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
pub struct AgentPerformance {
    #[ts(type = "number")]
    pub agent_id: i64,
    pub agent_name: String,
    #[ts(type = "number")]
    pub conversation_count: i64,
    pub avg_sentiment: f64,
    #[ts(type = "number")]
    pub conversions: i64,
    pub avg_quality: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
pub struct TeamPerformance {
    #[ts(type = "number")]
    pub team_id: i64,
    pub team_name: String,
    #[ts(type = "number")]
    pub conversation_count: i64,
    pub avg_sentiment: f64,
    #[ts(type = "number")]
    pub conversions: i64,
    pub avg_quality: f64,
}

// ============================================================================
// Field strategy
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
pub struct OutcomeCount {
    pub outcome_name: String,
    pub outcome_id: String,
    #[ts(type = "number")]
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
pub struct RegionRisk {
    #[ts(type = "number")]
    pub region_id: i64,
    pub region_name: String,
    #[ts(type = "number")]
    pub conversation_count: i64,
    pub avg_risk: f64,
    pub avg_sentiment: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
pub struct OutcomeTrendPoint {
    pub calendar_date: String,
    pub outcome_name: String,
    #[ts(type = "number")]
    pub outcome_count: i64,
}

// ============================================================================
// Field HQ
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
pub struct DataQuality {
    #[ts(type = "number")]
    pub total_conversations: i64,
    /// Conversations carrying a sentiment value.
    #[ts(type = "number")]
    pub sentiment_coverage: i64,
    pub sentiment_coverage_pct: f64,
    #[ts(type = "number")]
    pub entity_mentions: i64,
    #[ts(type = "number")]
    pub issues_classified: i64,
    /// RFC 3339 time the report was produced.
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_serializes_type_field() {
        let tile = Tile::new("conv_rate", "Appointment Rate", TileValue::Text("66.7%".into()), TileKind::Percent);
        let json = serde_json::to_value(&tile).unwrap();
        assert_eq!(json["type"], "percent");
        assert_eq!(json["value"], "66.7%");
    }

    #[test]
    fn test_count_tile_value_is_number() {
        let tile = Tile::new("conversations", "Total Conversations", TileValue::Count(3), TileKind::Number);
        let json = serde_json::to_value(&tile).unwrap();
        assert_eq!(json["value"], 3);
    }

    #[test]
    fn test_time_range_options() {
        let values: Vec<_> = time_range_options().into_iter().map(|o| o.value).collect();
        assert_eq!(values, vec!["7", "30", "90", "365"]);
    }

    #[test]
    fn test_data_response_envelope() {
        let resp: DataResponse<i64> = vec![1, 2].into();
        assert_eq!(serde_json::to_string(&resp).unwrap(), r#"{"data":[1,2]}"#);
    }
}

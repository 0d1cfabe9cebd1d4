// crates/core/src/schema.rs
//! Mapping from the two supported star-schema layouts onto the SQL fragments
//! the report catalog is rendered from.
//!
//! Report SQL is written once against the aliases `fc` (conversation fact),
//! `dd` (`dim_date`) and the per-report dimension aliases; a [`SchemaMap`]
//! fills in the column expressions and join conditions that differ between
//! layouts. Every fragment is a `&'static str`, so nothing in a map can carry
//! request data into query text.
//!
//! "Team" is the canonical grouping concept. On the `outcome` layout there is
//! no `dim_team`, so the team view is a projection of `dim_channel`
//! (`channel_id AS team_id`, `channel_name AS team_name`).

use std::fmt;
use std::str::FromStr;

use crate::error::SchemaError;

/// Which physical star-schema layout the store uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaVariant {
    /// `fact_conversation` keyed by `call_date`, with `outcome_status`,
    /// `has_appointment` and `conversion_confidence` columns.
    Outcome,
    /// `fact_conversation` keyed by `date_id`, with `severity`,
    /// `is_converted`, `risk_score`, plus a separate `fact_outcome`.
    Severity,
}

impl SchemaVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVariant::Outcome => "outcome",
            SchemaVariant::Severity => "severity",
        }
    }

    /// Table whose presence identifies the `severity` layout.
    pub const SEVERITY_MARKER_TABLE: &'static str = "dim_issue";

    /// The fragment table for this layout.
    pub fn map(&self) -> &'static SchemaMap {
        match self {
            SchemaVariant::Outcome => &OUTCOME_MAP,
            SchemaVariant::Severity => &SEVERITY_MAP,
        }
    }
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaVariant {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "outcome" => Ok(SchemaVariant::Outcome),
            "severity" => Ok(SchemaVariant::Severity),
            other => Err(SchemaError::UnknownVariant(other.to_string())),
        }
    }
}

/// A lookup dimension and how the fact table references it.
#[derive(Debug)]
pub struct DimensionTable {
    pub table: &'static str,
    pub id: &'static str,
    pub name: &'static str,
    /// Foreign-key column on `fc`.
    pub fact_key: &'static str,
    /// Equality clause with a single `?` placeholder for the id.
    pub filter_clause: &'static str,
}

/// Where outcome events come from.
#[derive(Debug)]
pub struct OutcomeSource {
    /// Joined onto the scoped conversations `fc`.
    pub scoped_join: &'static str,
    /// Joined onto `dim_date dd` for the per-day trend.
    pub date_join: &'static str,
    pub label: &'static str,
    pub id: &'static str,
    /// Expression counted distinct per outcome.
    pub event: &'static str,
}

/// Per-layout SQL fragments.
#[derive(Debug)]
pub struct SchemaMap {
    pub variant: SchemaVariant,
    /// Join condition between `fc` and `dd`.
    pub date_join: &'static str,
    /// Lower bound on `dd.calendar_date`; one `?` for the day count.
    pub joined_date_bound: &'static str,
    /// Lower bound on the fact table's own date column; one `?` for the day count.
    pub raw_date_bound: &'static str,
    pub sentiment: &'static str,
    /// Boolean expression, true when the conversation converted.
    pub converted: &'static str,
    /// Tile labels for the conversion count and rate.
    pub conversions_label: &'static str,
    pub conversion_rate_label: &'static str,
    /// Confidence in 0..1.
    pub confidence: &'static str,
    /// Risk in 0..100, stored or derived from confidence.
    pub risk: &'static str,
    /// Agent/team quality measure.
    pub quality: &'static str,
    /// Expression yielding `'HIGH'`, `'MEDIUM'` or `'LOW'`.
    pub severity_label: &'static str,
    /// Extra join needed to resolve `issue_label`.
    pub issue_join: &'static str,
    pub issue_label: &'static str,
    /// Column whose distinct non-null values count as classified issues.
    pub issue_key: &'static str,
    pub region: DimensionTable,
    pub channel: DimensionTable,
    pub team: DimensionTable,
    pub agent: DimensionTable,
    pub client_type: Option<DimensionTable>,
    pub outcome: OutcomeSource,
    /// Optional entity-mention table; may be absent from the store.
    pub entity_table: &'static str,
}

impl SchemaMap {
    /// Whether `team_id` names its own dimension rather than aliasing channel.
    pub fn has_team_dimension(&self) -> bool {
        self.team.table != self.channel.table
    }

    pub fn has_client_type_dimension(&self) -> bool {
        self.client_type.is_some()
    }
}

const REGION: DimensionTable = DimensionTable {
    table: "dim_region",
    id: "region_id",
    name: "region_name",
    fact_key: "fc.region_id",
    filter_clause: "fc.region_id = ?",
};

const CHANNEL: DimensionTable = DimensionTable {
    table: "dim_channel",
    id: "channel_id",
    name: "channel_name",
    fact_key: "fc.channel_id",
    filter_clause: "fc.channel_id = ?",
};

const AGENT: DimensionTable = DimensionTable {
    table: "dim_agent",
    id: "agent_id",
    name: "agent_name",
    fact_key: "fc.agent_id",
    filter_clause: "fc.agent_id = ?",
};

const JOINED_DATE_BOUND: &str = "dd.calendar_date >= date('now', '-' || ? || ' days')";

static OUTCOME_MAP: SchemaMap = SchemaMap {
    variant: SchemaVariant::Outcome,
    date_join: "fc.call_date = dd.calendar_date",
    joined_date_bound: JOINED_DATE_BOUND,
    raw_date_bound: "fc.call_date >= date('now', '-' || ? || ' days')",
    sentiment: "fc.overall_sentiment",
    converted: "fc.has_appointment = 1",
    conversions_label: "Appointments",
    conversion_rate_label: "Appointment Rate",
    confidence: "fc.conversion_confidence",
    risk: "(100.0 - fc.conversion_confidence * 100.0)",
    quality: "fc.conversion_confidence",
    severity_label: "CASE WHEN fc.conversion_confidence >= 0.7 THEN 'HIGH' \
                     WHEN fc.conversion_confidence >= 0.4 THEN 'MEDIUM' \
                     ELSE 'LOW' END",
    issue_join: "",
    issue_label: "fc.outcome_status",
    issue_key: "fc.outcome_status",
    region: REGION,
    channel: CHANNEL,
    team: CHANNEL,
    agent: AGENT,
    client_type: None,
    outcome: OutcomeSource {
        scoped_join: "",
        date_join: "LEFT JOIN fact_conversation fc ON fc.call_date = dd.calendar_date",
        label: "fc.outcome_status",
        id: "fc.outcome_status",
        event: "fc.conversation_id",
    },
    entity_table: "fact_entity_mention",
};

static SEVERITY_MAP: SchemaMap = SchemaMap {
    variant: SchemaVariant::Severity,
    date_join: "fc.date_id = dd.date_id",
    joined_date_bound: JOINED_DATE_BOUND,
    raw_date_bound: "fc.date_id >= CAST(strftime('%Y%m%d', 'now', '-' || ? || ' days') AS INTEGER)",
    sentiment: "fc.sentiment_score",
    converted: "fc.is_converted = 1",
    conversions_label: "Conversions",
    conversion_rate_label: "Conversion Rate",
    confidence: "(1.0 - fc.risk_score / 100.0)",
    risk: "fc.risk_score",
    quality: "fc.quality_score",
    severity_label: "COALESCE(UPPER(fc.severity), 'LOW')",
    issue_join: "LEFT JOIN dim_issue di ON di.issue_id = fc.issue_id",
    issue_label: "di.issue_name",
    issue_key: "fc.issue_id",
    region: REGION,
    channel: CHANNEL,
    team: DimensionTable {
        table: "dim_team",
        id: "team_id",
        name: "team_name",
        fact_key: "fc.team_id",
        filter_clause: "fc.team_id = ?",
    },
    agent: AGENT,
    client_type: Some(DimensionTable {
        table: "dim_client_type",
        id: "client_type_id",
        name: "client_type_name",
        fact_key: "fc.client_type_id",
        filter_clause: "fc.client_type_id = ?",
    }),
    outcome: OutcomeSource {
        scoped_join: "JOIN fact_outcome fo ON fo.conversation_id = fc.conversation_id \
                      LEFT JOIN dim_outcome dout ON dout.outcome_id = fo.outcome_id",
        date_join: "LEFT JOIN fact_outcome fo ON fo.date_id = dd.date_id \
                    LEFT JOIN dim_outcome dout ON dout.outcome_id = fo.outcome_id",
        label: "dout.outcome_name",
        id: "CAST(fo.outcome_id AS TEXT)",
        event: "fo.outcome_event_id",
    },
    entity_table: "fact_conversation_entities",
};

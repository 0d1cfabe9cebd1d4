// crates/db/src/fixtures.rs
//! Table definitions for both supported layouts plus small seeding helpers.
//!
//! The API itself never writes; these exist so tests (and anyone standing up
//! an empty store) get tables that match what the report catalog expects.
//! Seeds are layout-agnostic: the same [`ConversationSeed`] lands in whichever
//! columns the handle's layout uses.

use chrono::{Duration, NaiveDate, Utc};
use fieldintel_core::{Severity, SchemaVariant};

use crate::{Database, DbResult};

pub const OUTCOME_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS dim_region (
    region_id INTEGER PRIMARY KEY,
    region_name TEXT NOT NULL,
    latitude REAL,
    longitude REAL
);
CREATE TABLE IF NOT EXISTS dim_channel (
    channel_id INTEGER PRIMARY KEY,
    channel_name TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS dim_agent (
    agent_id INTEGER PRIMARY KEY,
    agent_name TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS dim_date (
    date_id INTEGER PRIMARY KEY,
    calendar_date TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS fact_conversation (
    conversation_id INTEGER PRIMARY KEY AUTOINCREMENT,
    call_date TEXT NOT NULL,
    region_id INTEGER REFERENCES dim_region(region_id),
    channel_id INTEGER REFERENCES dim_channel(channel_id),
    agent_id INTEGER REFERENCES dim_agent(agent_id),
    overall_sentiment REAL,
    has_appointment INTEGER NOT NULL DEFAULT 0,
    conversion_confidence REAL,
    outcome_status TEXT,
    reason_for_outcome TEXT
);
"#;

pub const SEVERITY_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS dim_region (
    region_id INTEGER PRIMARY KEY,
    region_name TEXT NOT NULL,
    latitude REAL,
    longitude REAL
);
CREATE TABLE IF NOT EXISTS dim_team (
    team_id INTEGER PRIMARY KEY,
    team_name TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS dim_channel (
    channel_id INTEGER PRIMARY KEY,
    channel_name TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS dim_client_type (
    client_type_id INTEGER PRIMARY KEY,
    client_type_name TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS dim_agent (
    agent_id INTEGER PRIMARY KEY,
    agent_name TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS dim_issue (
    issue_id INTEGER PRIMARY KEY,
    issue_name TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS dim_outcome (
    outcome_id INTEGER PRIMARY KEY,
    outcome_name TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS dim_date (
    date_id INTEGER PRIMARY KEY,
    calendar_date TEXT NOT NULL,
    year INTEGER,
    month INTEGER,
    day INTEGER
);
CREATE TABLE IF NOT EXISTS fact_conversation (
    conversation_id INTEGER PRIMARY KEY AUTOINCREMENT,
    date_id INTEGER REFERENCES dim_date(date_id),
    region_id INTEGER REFERENCES dim_region(region_id),
    team_id INTEGER REFERENCES dim_team(team_id),
    channel_id INTEGER REFERENCES dim_channel(channel_id),
    client_type_id INTEGER REFERENCES dim_client_type(client_type_id),
    agent_id INTEGER REFERENCES dim_agent(agent_id),
    issue_id INTEGER REFERENCES dim_issue(issue_id),
    sentiment_score REAL,
    risk_score REAL,
    quality_score REAL,
    is_converted INTEGER,
    severity TEXT
);
CREATE TABLE IF NOT EXISTS fact_outcome (
    outcome_event_id INTEGER PRIMARY KEY AUTOINCREMENT,
    date_id INTEGER REFERENCES dim_date(date_id),
    outcome_id INTEGER REFERENCES dim_outcome(outcome_id),
    conversation_id INTEGER REFERENCES fact_conversation(conversation_id)
);
CREATE TABLE IF NOT EXISTS fact_conversation_entities (
    entity_id INTEGER PRIMARY KEY AUTOINCREMENT,
    conversation_id INTEGER REFERENCES fact_conversation(conversation_id),
    entity_name TEXT,
    entity_type TEXT
);
"#;

pub fn ddl(variant: SchemaVariant) -> &'static str {
    match variant {
        SchemaVariant::Outcome => OUTCOME_DDL,
        SchemaVariant::Severity => SEVERITY_DDL,
    }
}

pub const REGIONS: [(i64, &str, f64, f64); 5] = [
    (1, "North Region", 28.7041, 77.1025),
    (2, "South Region", 13.0827, 80.2707),
    (3, "East Region", 22.5726, 88.3639),
    (4, "West Region", 19.0760, 72.8777),
    (5, "Central Region", 23.2599, 77.4126),
];
pub const CHANNELS: [(i64, &str); 4] = [(1, "Phone"), (2, "Email"), (3, "Chat"), (4, "In-Person")];
pub const TEAMS: [(i64, &str); 4] = [
    (1, "Team Alpha"),
    (2, "Team Beta"),
    (3, "Team Gamma"),
    (4, "Team Delta"),
];
pub const CLIENT_TYPES: [(i64, &str); 4] = [
    (1, "Enterprise"),
    (2, "SMB"),
    (3, "Individual"),
    (4, "Partner"),
];
pub const AGENTS: [(i64, &str); 3] = [(1, "John Smith"), (2, "Sarah Johnson"), (3, "Mike Williams")];

/// One conversation to insert. `status` is the issue/outcome label: on the
/// `outcome` layout it is `outcome_status`, on the `severity` layout it
/// becomes both the issue name and a `fact_outcome` event.
#[derive(Debug, Clone, Default)]
pub struct ConversationSeed {
    pub days_ago: i64,
    pub region_id: Option<i64>,
    pub channel_id: Option<i64>,
    pub team_id: Option<i64>,
    pub client_type_id: Option<i64>,
    pub agent_id: Option<i64>,
    pub sentiment: Option<f64>,
    pub converted: bool,
    /// 0..1; stored as-is or as `risk_score = 100 - confidence * 100`.
    pub confidence: Option<f64>,
    pub status: Option<String>,
}

/// Calendar date `days_ago` days before today (UTC, matching SQLite `'now'`).
pub fn date_days_ago(days_ago: i64) -> NaiveDate {
    Utc::now().date_naive() - Duration::days(days_ago)
}

fn date_id(date: NaiveDate) -> i64 {
    date.format("%Y%m%d")
        .to_string()
        .parse()
        .unwrap_or_default()
}

/// Insert every lookup dimension the layout has.
pub async fn seed_dimensions(db: &Database) -> DbResult<()> {
    let pool = db.pool();
    for (id, name, lat, lon) in REGIONS {
        sqlx::query("INSERT OR IGNORE INTO dim_region VALUES (?1, ?2, ?3, ?4)")
            .bind(id)
            .bind(name)
            .bind(lat)
            .bind(lon)
            .execute(pool)
            .await?;
    }
    for (id, name) in CHANNELS {
        sqlx::query("INSERT OR IGNORE INTO dim_channel VALUES (?1, ?2)")
            .bind(id)
            .bind(name)
            .execute(pool)
            .await?;
    }
    for (id, name) in AGENTS {
        sqlx::query("INSERT OR IGNORE INTO dim_agent VALUES (?1, ?2)")
            .bind(id)
            .bind(name)
            .execute(pool)
            .await?;
    }
    if db.variant() == SchemaVariant::Severity {
        for (id, name) in TEAMS {
            sqlx::query("INSERT OR IGNORE INTO dim_team VALUES (?1, ?2)")
                .bind(id)
                .bind(name)
                .execute(pool)
                .await?;
        }
        for (id, name) in CLIENT_TYPES {
            sqlx::query("INSERT OR IGNORE INTO dim_client_type VALUES (?1, ?2)")
                .bind(id)
                .bind(name)
                .execute(pool)
                .await?;
        }
    }
    Ok(())
}

/// Insert `dim_date` rows for every day from `days_back` days ago through today.
pub async fn seed_dates(db: &Database, days_back: i64) -> DbResult<()> {
    for days_ago in 0..=days_back {
        let date = date_days_ago(days_ago);
        let calendar = date.format("%Y-%m-%d").to_string();
        match db.variant() {
            SchemaVariant::Outcome => {
                sqlx::query("INSERT OR IGNORE INTO dim_date (date_id, calendar_date) VALUES (?1, ?2)")
                    .bind(date_id(date))
                    .bind(calendar)
                    .execute(db.pool())
                    .await?;
            }
            SchemaVariant::Severity => {
                use chrono::Datelike;
                sqlx::query("INSERT OR IGNORE INTO dim_date VALUES (?1, ?2, ?3, ?4, ?5)")
                    .bind(date_id(date))
                    .bind(calendar)
                    .bind(date.year())
                    .bind(date.month())
                    .bind(date.day())
                    .execute(db.pool())
                    .await?;
            }
        }
    }
    Ok(())
}

/// Insert one conversation, returning its id.
pub async fn insert_conversation(db: &Database, seed: &ConversationSeed) -> DbResult<i64> {
    let date = date_days_ago(seed.days_ago);
    let pool = db.pool();
    let id = match db.variant() {
        SchemaVariant::Outcome => sqlx::query(
            r#"
            INSERT INTO fact_conversation
                (call_date, region_id, channel_id, agent_id, overall_sentiment,
                 has_appointment, conversion_confidence, outcome_status)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(date.format("%Y-%m-%d").to_string())
        .bind(seed.region_id)
        .bind(seed.channel_id.or(seed.team_id))
        .bind(seed.agent_id)
        .bind(seed.sentiment)
        .bind(i64::from(seed.converted))
        .bind(seed.confidence)
        .bind(seed.status.as_deref())
        .execute(pool)
        .await?
        .last_insert_rowid(),
        SchemaVariant::Severity => {
            let issue_id = match seed.status.as_deref() {
                Some(name) => Some(lookup_or_insert(db, "dim_issue", "issue_id", "issue_name", name).await?),
                None => None,
            };
            let id = sqlx::query(
                r#"
                INSERT INTO fact_conversation
                    (date_id, region_id, team_id, channel_id, client_type_id, agent_id,
                     issue_id, sentiment_score, risk_score, quality_score, is_converted, severity)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                "#,
            )
            .bind(date_id(date))
            .bind(seed.region_id)
            .bind(seed.team_id)
            .bind(seed.channel_id)
            .bind(seed.client_type_id)
            .bind(seed.agent_id)
            .bind(issue_id)
            .bind(seed.sentiment)
            .bind(seed.confidence.map(|c| 100.0 - c * 100.0))
            .bind(seed.confidence)
            .bind(i64::from(seed.converted))
            .bind(seed.confidence.map(|c| Severity::from_confidence(c).as_str()))
            .execute(pool)
            .await?
            .last_insert_rowid();

            if let Some(name) = seed.status.as_deref() {
                let outcome_id =
                    lookup_or_insert(db, "dim_outcome", "outcome_id", "outcome_name", name).await?;
                sqlx::query(
                    "INSERT INTO fact_outcome (date_id, outcome_id, conversation_id) VALUES (?1, ?2, ?3)",
                )
                .bind(date_id(date))
                .bind(outcome_id)
                .bind(id)
                .execute(pool)
                .await?;
            }
            id
        }
    };
    Ok(id)
}

/// Insert `count` entity mentions for a conversation, creating the layout's
/// entity table if the store lacks it.
pub async fn insert_entity_mentions(db: &Database, conversation_id: i64, count: usize) -> DbResult<()> {
    let table = db.schema().entity_table;
    sqlx::raw_sql(&format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            entity_id INTEGER PRIMARY KEY AUTOINCREMENT,
            conversation_id INTEGER,
            entity_name TEXT,
            entity_type TEXT
        )"
    ))
    .execute(db.pool())
    .await?;
    for n in 0..count {
        sqlx::query(&format!(
            "INSERT INTO {table} (conversation_id, entity_name, entity_type) VALUES (?1, ?2, 'PRODUCT')"
        ))
        .bind(conversation_id)
        .bind(format!("Entity_{n}"))
        .execute(db.pool())
        .await?;
    }
    Ok(())
}

async fn lookup_or_insert(
    db: &Database,
    table: &str,
    id_col: &str,
    name_col: &str,
    name: &str,
) -> DbResult<i64> {
    let existing: Option<(i64,)> =
        sqlx::query_as(&format!("SELECT {id_col} FROM {table} WHERE {name_col} = ?1"))
            .bind(name)
            .fetch_optional(db.pool())
            .await?;
    if let Some((id,)) = existing {
        return Ok(id);
    }
    let id = sqlx::query(&format!("INSERT INTO {table} ({name_col}) VALUES (?1)"))
        .bind(name)
        .execute(db.pool())
        .await?
        .last_insert_rowid();
    Ok(id)
}

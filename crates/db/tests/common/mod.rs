//! Shared setup for store-level report tests.
#![allow(dead_code)]

use fieldintel_db::fixtures::{self, ConversationSeed};
use fieldintel_db::{Database, SchemaVariant};

pub const VARIANTS: [SchemaVariant; 2] = [SchemaVariant::Outcome, SchemaVariant::Severity];

/// In-memory store with every dimension and the last 30 days of calendar.
pub async fn seeded_db(variant: SchemaVariant) -> Database {
    let db = Database::new_in_memory(variant).await.unwrap();
    fixtures::seed_dimensions(&db).await.unwrap();
    fixtures::seed_dates(&db, 30).await.unwrap();
    db
}

pub async fn insert(db: &Database, seed: ConversationSeed) -> i64 {
    fixtures::insert_conversation(db, &seed).await.unwrap()
}

/// A conversation dated today in region 1 on channel/team 1 with agent 1.
pub fn today() -> ConversationSeed {
    ConversationSeed {
        days_ago: 0,
        region_id: Some(1),
        channel_id: Some(1),
        team_id: Some(1),
        client_type_id: Some(1),
        agent_id: Some(1),
        ..ConversationSeed::default()
    }
}

//! Integration tests for the data-quality snapshot.

use fieldintel_db::fixtures::{self, ConversationSeed};
use fieldintel_db::SchemaVariant;
use pretty_assertions::assert_eq;

mod common;
use common::{insert, seeded_db, today, VARIANTS};

#[tokio::test]
async fn test_data_quality_counts() {
    for variant in VARIANTS {
        let db = seeded_db(variant).await;
        insert(&db, ConversationSeed { sentiment: Some(0.2), status: Some("Billing".into()), ..today() }).await;
        insert(&db, ConversationSeed { sentiment: Some(0.1), status: Some("Billing".into()), ..today() }).await;
        // Unfiltered: a year-old row still counts.
        insert(&db, ConversationSeed { days_ago: 365, status: Some("Refund".into()), ..today() }).await;

        let quality = db.data_quality().await.unwrap();
        assert_eq!(quality.total_conversations, 3, "{variant}");
        assert_eq!(quality.sentiment_coverage, 2);
        assert_eq!(quality.sentiment_coverage_pct, 66.7);
        assert_eq!(quality.issues_classified, 2);
        assert!(chrono::DateTime::parse_from_rfc3339(&quality.timestamp).is_ok());
    }
}

#[tokio::test]
async fn test_data_quality_without_entity_table() {
    let db = seeded_db(SchemaVariant::Outcome).await;
    assert!(!db.table_exists(db.schema().entity_table).await.unwrap());

    let quality = db.data_quality().await.unwrap();
    assert_eq!(quality.entity_mentions, 0);
    assert_eq!(quality.total_conversations, 0);
    assert_eq!(quality.sentiment_coverage_pct, 0.0);
}

#[tokio::test]
async fn test_data_quality_counts_entity_mentions() {
    for variant in VARIANTS {
        let db = seeded_db(variant).await;
        let id = insert(&db, today()).await;
        fixtures::insert_entity_mentions(&db, id, 3).await.unwrap();

        let quality = db.data_quality().await.unwrap();
        assert_eq!(quality.entity_mentions, 3, "{variant}");
    }
}

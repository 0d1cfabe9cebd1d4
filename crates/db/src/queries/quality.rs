// crates/db/src/queries/quality.rs
// Field HQ data-quality snapshot.

use crate::{Database, DbResult};
use chrono::{SecondsFormat, Utc};
use fieldintel_core::shape::percentage;
use fieldintel_core::DataQuality;

impl Database {
    /// Whole-store coverage numbers, unfiltered. A missing entity table
    /// counts as zero mentions.
    pub async fn data_quality(&self) -> DbResult<DataQuality> {
        let map = self.schema();
        let mut conn = self.pool().acquire().await?;

        let (total_conversations, sentiment_coverage, issues_classified): (i64, i64, i64) =
            sqlx::query_as(&format!(
                r#"
                SELECT
                    COUNT(*),
                    COUNT({sentiment}),
                    COUNT(DISTINCT {issue_key})
                FROM fact_conversation fc
                "#,
                sentiment = map.sentiment,
                issue_key = map.issue_key,
            ))
            .fetch_one(&mut *conn)
            .await?;

        let (has_entities,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        )
        .bind(map.entity_table)
        .fetch_one(&mut *conn)
        .await?;

        let entity_mentions = if has_entities > 0 {
            let (count,): (i64,) =
                sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", map.entity_table))
                    .fetch_one(&mut *conn)
                    .await?;
            count
        } else {
            0
        };

        Ok(DataQuality {
            total_conversations,
            sentiment_coverage,
            sentiment_coverage_pct: percentage(sentiment_coverage, total_conversations),
            entity_mentions,
            issues_classified,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        })
    }
}

// crates/db/src/queries/health.rs
use crate::{Database, DbResult};

impl Database {
    /// Total conversations in the store, unfiltered.
    pub async fn conversation_count(&self) -> DbResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM fact_conversation")
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }
}

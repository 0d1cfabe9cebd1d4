// crates/db/src/queries/ops.rs
// Field ops: per-agent and per-team performance.

use super::{bind_all, Scope};
use crate::{Database, DbResult};
use fieldintel_core::shape::avg;
use fieldintel_core::{
    AgentPerformance, DateMode, DimensionTable, FilterSet, SchemaMap, TeamPerformance,
};

/// `(id, name, conversations, avg sentiment, conversions, avg quality)`
type PerformanceRow = (i64, String, i64, Option<f64>, i64, Option<f64>);

impl Database {
    /// Every agent, busiest first.
    pub async fn agent_performance(&self, filters: &FilterSet) -> DbResult<Vec<AgentPerformance>> {
        let map = self.schema();
        let rows = self.performance_by(map, &map.agent, filters).await?;
        Ok(rows
            .into_iter()
            .map(
                |(agent_id, agent_name, conversation_count, sentiment, conversions, quality)| {
                    AgentPerformance {
                        agent_id,
                        agent_name,
                        conversation_count,
                        avg_sentiment: avg(sentiment, 2),
                        conversions,
                        avg_quality: avg(quality, 2),
                    }
                },
            )
            .collect())
    }

    /// Every team, busiest first. On layouts without a team table this is
    /// the channel list under team names.
    pub async fn team_performance(&self, filters: &FilterSet) -> DbResult<Vec<TeamPerformance>> {
        let map = self.schema();
        let rows = self.performance_by(map, &map.team, filters).await?;
        Ok(rows
            .into_iter()
            .map(
                |(team_id, team_name, conversation_count, sentiment, conversions, quality)| {
                    TeamPerformance {
                        team_id,
                        team_name,
                        conversation_count,
                        avg_sentiment: avg(sentiment, 2),
                        conversions,
                        avg_quality: avg(quality, 2),
                    }
                },
            )
            .collect())
    }

    async fn performance_by(
        &self,
        map: &SchemaMap,
        dim: &DimensionTable,
        filters: &FilterSet,
    ) -> DbResult<Vec<PerformanceRow>> {
        let scope = Scope::new(filters, DateMode::DateJoin, map);
        let sql = format!(
            r#"
            {cte}
            SELECT
                d.{id},
                d.{name},
                COUNT(DISTINCT fc.conversation_id) AS conversation_count,
                AVG({sentiment}),
                COUNT(DISTINCT CASE WHEN {converted} THEN fc.conversation_id END),
                AVG({quality})
            FROM {table} d
            LEFT JOIN scoped fc ON {fact_key} = d.{id}
            GROUP BY d.{id}, d.{name}
            ORDER BY conversation_count DESC, d.{id}
            "#,
            cte = scope.cte(),
            id = dim.id,
            name = dim.name,
            table = dim.table,
            fact_key = dim.fact_key,
            sentiment = map.sentiment,
            converted = map.converted,
            quality = map.quality,
        );

        let rows = bind_all(sqlx::query_as(&sql), scope.binds())
            .fetch_all(self.pool())
            .await?;
        Ok(rows)
    }
}

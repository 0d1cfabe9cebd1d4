// crates/db/src/queries/strategy.rs
// Field strategy: outcome mix, regional risk, outcome trend.

use super::{bind_all, Scope};
use crate::{Database, DbResult};
use fieldintel_core::shape::{avg, label_or_unknown};
use fieldintel_core::{
    DateMode, FilterSet, OutcomeCount, OutcomeTrendPoint, Predicate, RegionRisk,
};

impl Database {
    /// Distinct outcome events per outcome label, most frequent first.
    pub async fn outcome_distribution(&self, filters: &FilterSet) -> DbResult<Vec<OutcomeCount>> {
        let map = self.schema();
        let scope = Scope::new(filters, DateMode::DateJoin, map);
        let label = format!("NULLIF(TRIM({}), '')", map.outcome.label);
        let sql = format!(
            r#"
            {cte}
            SELECT
                {label},
                {id},
                COUNT(DISTINCT {event}) AS outcome_count
            FROM scoped fc
            {join}
            GROUP BY {label}, {id}
            ORDER BY outcome_count DESC, COALESCE({label}, 'Unknown')
            "#,
            cte = scope.cte(),
            id = map.outcome.id,
            event = map.outcome.event,
            join = map.outcome.scoped_join,
        );

        let rows: Vec<(Option<String>, Option<String>, i64)> =
            bind_all(sqlx::query_as(&sql), scope.binds())
                .fetch_all(self.pool())
                .await?;

        Ok(rows
            .into_iter()
            .map(|(name, id, count)| OutcomeCount {
                outcome_name: label_or_unknown(name),
                outcome_id: label_or_unknown(id),
                count,
            })
            .collect())
    }

    /// Every region ordered by mean risk, riskiest first.
    pub async fn risk_by_region(&self, filters: &FilterSet) -> DbResult<Vec<RegionRisk>> {
        let map = self.schema();
        let scope = Scope::new(filters, DateMode::DateJoin, map);
        let sql = format!(
            r#"
            {cte}
            SELECT
                d.{id},
                d.{name},
                COUNT(DISTINCT fc.conversation_id),
                AVG({risk}),
                AVG({sentiment})
            FROM {table} d
            LEFT JOIN scoped fc ON {fact_key} = d.{id}
            GROUP BY d.{id}, d.{name}
            ORDER BY COALESCE(AVG({risk}), 0) DESC, d.{id}
            "#,
            cte = scope.cte(),
            id = map.region.id,
            name = map.region.name,
            table = map.region.table,
            fact_key = map.region.fact_key,
            risk = map.risk,
            sentiment = map.sentiment,
        );

        let rows: Vec<(i64, String, i64, Option<f64>, Option<f64>)> =
            bind_all(sqlx::query_as(&sql), scope.binds())
                .fetch_all(self.pool())
                .await?;

        Ok(rows
            .into_iter()
            .map(
                |(region_id, region_name, conversation_count, risk, sentiment)| RegionRisk {
                    region_id,
                    region_name,
                    conversation_count,
                    avg_risk: avg(risk, 2),
                    avg_sentiment: avg(sentiment, 2),
                },
            )
            .collect())
    }

    /// Outcome events per day and outcome over the window. Only the window
    /// applies: dimension filters never narrow the trend.
    pub async fn outcome_trend(&self, filters: &FilterSet) -> DbResult<Vec<OutcomeTrendPoint>> {
        let map = self.schema();
        let window = Predicate::date_window(filters.time_range_days, DateMode::DateJoin, map);
        let label = format!("NULLIF(TRIM({}), '')", map.outcome.label);
        let sql = format!(
            r#"
            SELECT
                dd.calendar_date,
                {label},
                COUNT(DISTINCT {event})
            FROM dim_date dd
            {join}
            WHERE {window} AND dd.calendar_date <= date('now')
            GROUP BY dd.calendar_date, {label}
            ORDER BY dd.calendar_date, COALESCE({label}, 'Unknown')
            "#,
            event = map.outcome.event,
            join = map.outcome.date_join,
            window = window.sql(),
        );

        let rows: Vec<(String, Option<String>, i64)> =
            bind_all(sqlx::query_as(&sql), window.binds())
                .fetch_all(self.pool())
                .await?;

        Ok(rows
            .into_iter()
            .map(|(calendar_date, name, outcome_count)| OutcomeTrendPoint {
                calendar_date,
                outcome_name: label_or_unknown(name),
                outcome_count,
            })
            .collect())
    }
}

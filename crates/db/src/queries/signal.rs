// crates/db/src/queries/signal.rs
// Field signal: daily pulse, top issues, severity mix, regional hotspots.

use std::collections::BTreeMap;

use super::{bind_all, Scope};
use crate::{Database, DbResult};
use fieldintel_core::shape::{avg, label_or_unknown};
use fieldintel_core::{
    DateMode, FilterSet, Hotspot, IssueSummary, PulsePoint, Severity, SeverityCount,
};

/// Rows returned by the top-issues report.
const TOP_ISSUES_LIMIT: i64 = 10;

impl Database {
    /// One point per calendar day in the window, including days with no
    /// conversations, oldest first.
    pub async fn daily_pulse(&self, filters: &FilterSet) -> DbResult<Vec<PulsePoint>> {
        let map = self.schema();
        let scope = Scope::new(filters, DateMode::DateJoin, map);
        let sql = format!(
            r#"
            {cte}
            SELECT
                dd.calendar_date,
                COUNT(DISTINCT fc.conversation_id),
                AVG({sentiment}),
                COUNT(DISTINCT CASE WHEN {converted} THEN fc.conversation_id END)
            FROM dim_date dd
            LEFT JOIN scoped fc ON {date_join}
            WHERE {window} AND dd.calendar_date <= date('now')
            GROUP BY dd.calendar_date
            ORDER BY dd.calendar_date
            "#,
            cte = scope.cte(),
            sentiment = map.sentiment,
            converted = map.converted,
            date_join = map.date_join,
            window = map.joined_date_bound,
        );

        let mut binds = scope.binds().to_vec();
        binds.push(i64::from(filters.time_range_days));

        let rows: Vec<(String, i64, Option<f64>, i64)> = bind_all(sqlx::query_as(&sql), &binds)
            .fetch_all(self.pool())
            .await?;

        Ok(rows
            .into_iter()
            .map(
                |(calendar_date, conversation_count, sentiment, high_severity_count)| PulsePoint {
                    calendar_date,
                    conversation_count,
                    avg_sentiment: avg(sentiment, 2),
                    high_severity_count,
                },
            )
            .collect())
    }

    /// Ten most frequent issue classifications, ranked 1..=10.
    ///
    /// Bounded on the fact table's own date column rather than `dim_date`,
    /// so conversations on days missing from the calendar still count.
    pub async fn top_issues(&self, filters: &FilterSet) -> DbResult<Vec<IssueSummary>> {
        let map = self.schema();
        let scope = Scope::new(filters, DateMode::RawDateColumn, map);
        let label = format!("NULLIF(TRIM({}), '')", map.issue_label);
        let sql = format!(
            r#"
            {cte}
            SELECT
                {label},
                COUNT(DISTINCT fc.conversation_id) AS volume,
                AVG({sentiment}),
                AVG(CASE
                    WHEN {converted} THEN 3
                    WHEN {confidence} > 0.5 THEN 2
                    ELSE 1
                END),
                COUNT(DISTINCT CASE WHEN {converted} THEN fc.conversation_id END)
            FROM scoped fc
            {issue_join}
            GROUP BY {label}
            ORDER BY volume DESC, COALESCE({label}, 'Unknown')
            LIMIT {limit}
            "#,
            cte = scope.cte(),
            sentiment = map.sentiment,
            converted = map.converted,
            confidence = map.confidence,
            issue_join = map.issue_join,
            limit = TOP_ISSUES_LIMIT,
        );

        let rows: Vec<(Option<String>, i64, Option<f64>, Option<f64>, i64)> =
            bind_all(sqlx::query_as(&sql), scope.binds())
                .fetch_all(self.pool())
                .await?;

        Ok(rows
            .into_iter()
            .zip(1..)
            .map(
                |((name, volume, sentiment, severity, conversions), issue_id)| IssueSummary {
                    issue_id,
                    issue_name: label_or_unknown(name),
                    volume,
                    avg_sentiment: avg(sentiment, 2),
                    severity_score: avg(severity, 2),
                    conversions,
                },
            )
            .collect())
    }

    /// Conversation count per severity bucket, `HIGH` first. Buckets with no
    /// conversations are left out.
    pub async fn severity_distribution(
        &self,
        filters: &FilterSet,
    ) -> DbResult<Vec<SeverityCount>> {
        let map = self.schema();
        let scope = Scope::new(filters, DateMode::DateJoin, map);
        let sql = format!(
            r#"
            {cte}
            SELECT {severity}, COUNT(DISTINCT fc.conversation_id)
            FROM scoped fc
            GROUP BY {severity}
            "#,
            cte = scope.cte(),
            severity = map.severity_label,
        );

        let rows: Vec<(String, i64)> = bind_all(sqlx::query_as(&sql), scope.binds())
            .fetch_all(self.pool())
            .await?;

        // Stored labels may vary in spelling; fold them into the three buckets.
        let mut buckets: BTreeMap<Severity, i64> = BTreeMap::new();
        for (label, count) in rows {
            *buckets.entry(Severity::from_label(&label)).or_default() += count;
        }

        Ok(buckets
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(severity, count)| SeverityCount { severity, count })
            .collect())
    }

    /// Every region with its conversation count and mean risk, including
    /// regions with nothing in the window.
    pub async fn hotspots(&self, filters: &FilterSet) -> DbResult<Vec<Hotspot>> {
        let map = self.schema();
        let scope = Scope::new(filters, DateMode::DateJoin, map);
        let sql = format!(
            r#"
            {cte}
            SELECT
                d.{id},
                d.{name},
                d.latitude,
                d.longitude,
                COUNT(DISTINCT fc.conversation_id),
                AVG({risk})
            FROM {table} d
            LEFT JOIN scoped fc ON {fact_key} = d.{id}
            GROUP BY d.{id}, d.{name}, d.latitude, d.longitude
            ORDER BY d.{id}
            "#,
            cte = scope.cte(),
            id = map.region.id,
            name = map.region.name,
            table = map.region.table,
            fact_key = map.region.fact_key,
            risk = map.risk,
        );

        let rows: Vec<(i64, String, Option<f64>, Option<f64>, i64, Option<f64>)> =
            bind_all(sqlx::query_as(&sql), scope.binds())
                .fetch_all(self.pool())
                .await?;

        Ok(rows
            .into_iter()
            .map(
                |(region_id, region_name, latitude, longitude, conversation_count, risk)| Hotspot {
                    region_id,
                    region_name,
                    latitude,
                    longitude,
                    conversation_count,
                    avg_risk: avg(risk, 2),
                },
            )
            .collect())
    }
}

// crates/db/src/queries/tiles.rs
// Mission brief KPI tiles.

use super::{bind_all, Scope};
use crate::{Database, DbResult};
use fieldintel_core::shape::{decimal_label, or_zero, percent_label};
use fieldintel_core::{DateMode, FilterSet, Tile, TileKind, TileValue, TilesResponse};

impl Database {
    /// Headline numbers for the filtered conversation set, in one statement.
    pub async fn mission_brief_tiles(&self, filters: &FilterSet) -> DbResult<TilesResponse> {
        let map = self.schema();
        let scope = Scope::new(filters, DateMode::DateJoin, map);
        let sql = format!(
            r#"
            {cte}
            SELECT
                COUNT(DISTINCT fc.conversation_id),
                COUNT(DISTINCT CASE WHEN {converted} THEN fc.conversation_id END),
                AVG({sentiment}),
                AVG({risk})
            FROM scoped fc
            "#,
            cte = scope.cte(),
            converted = map.converted,
            sentiment = map.sentiment,
            risk = map.risk,
        );

        let (total, conversions, sentiment, risk): (i64, i64, Option<f64>, Option<f64>) =
            bind_all(sqlx::query_as(&sql), scope.binds())
                .fetch_one(self.pool())
                .await?;

        Ok(TilesResponse {
            tiles: vec![
                Tile::new(
                    "conversations",
                    "Total Conversations",
                    TileValue::Count(total),
                    TileKind::Number,
                ),
                Tile::new(
                    "conversions",
                    map.conversions_label,
                    TileValue::Count(conversions),
                    TileKind::Number,
                ),
                Tile::new(
                    "conv_rate",
                    map.conversion_rate_label,
                    TileValue::Text(percent_label(conversions, total)),
                    TileKind::Percent,
                ),
                Tile::new(
                    "sentiment",
                    "Avg Sentiment",
                    TileValue::Text(decimal_label(or_zero(sentiment), 2)),
                    TileKind::Decimal,
                ),
                Tile::new(
                    "risk",
                    "Avg Risk Score",
                    TileValue::Text(decimal_label(or_zero(risk), 1)),
                    TileKind::Decimal,
                ),
            ],
        })
    }
}

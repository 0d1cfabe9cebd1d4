// crates/db/src/queries/mod.rs
// Report catalog: one `impl Database` block per dashboard area.

mod dimensions;
mod health;
mod ops;
mod quality;
mod signal;
mod strategy;
mod tiles;

use fieldintel_core::{DateMode, FilterSet, Predicate, SchemaMap};
use sqlx::query::QueryAs;
use sqlx::Sqlite;

/// The filtered conversation set as a `scoped` CTE plus its bind values.
///
/// Report templates refer to `scoped fc`, so the `fc.*` fragments from the
/// schema map apply unchanged on top of it.
pub(crate) struct Scope {
    cte: String,
    binds: Vec<i64>,
}

impl Scope {
    pub(crate) fn new(filters: &FilterSet, mode: DateMode, map: &SchemaMap) -> Self {
        let predicate = Predicate::build(filters, mode, map);
        let source = match mode {
            DateMode::DateJoin => format!(
                "fact_conversation fc JOIN dim_date dd ON {}",
                map.date_join
            ),
            DateMode::RawDateColumn => "fact_conversation fc".to_string(),
        };
        Self {
            cte: format!(
                "WITH scoped AS (SELECT fc.* FROM {source} WHERE {})",
                predicate.sql()
            ),
            binds: predicate.binds().to_vec(),
        }
    }

    pub(crate) fn cte(&self) -> &str {
        &self.cte
    }

    pub(crate) fn binds(&self) -> &[i64] {
        &self.binds
    }
}

/// Bind every value in order onto positional `?` placeholders.
pub(crate) fn bind_all<'q, O>(
    mut query: QueryAs<'q, Sqlite, O, <Sqlite as sqlx::Database>::Arguments<'q>>,
    binds: &[i64],
) -> QueryAs<'q, Sqlite, O, <Sqlite as sqlx::Database>::Arguments<'q>> {
    for value in binds {
        query = query.bind(*value);
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldintel_core::{DimensionId, SchemaVariant};

    #[test]
    fn test_scope_date_join_mode() {
        let map = SchemaVariant::Outcome.map();
        let filters = FilterSet {
            region_id: DimensionId::new(2),
            ..FilterSet::default()
        };
        let scope = Scope::new(&filters, DateMode::DateJoin, map);
        assert!(scope.cte().contains("JOIN dim_date dd ON fc.call_date = dd.calendar_date"));
        assert!(scope.cte().contains("fc.region_id = ?"));
        assert_eq!(scope.binds(), &[7, 2]);
    }

    #[test]
    fn test_scope_raw_mode_skips_date_join() {
        let map = SchemaVariant::Severity.map();
        let scope = Scope::new(&FilterSet::default(), DateMode::RawDateColumn, map);
        assert!(!scope.cte().contains("dim_date"));
        assert!(scope.cte().contains("fc.date_id >="));
        assert_eq!(scope.binds(), &[7]);
    }
}

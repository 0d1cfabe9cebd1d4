// crates/core/src/predicate.rs
//! Turns a [`FilterSet`] into a parameter-bound SQL predicate.
//!
//! Clauses are `&'static str` fragments taken from the [`SchemaMap`] and the
//! only bound values are integers, so request data can never reach the query
//! text. Callers splice [`Predicate::sql`] into a template and bind
//! [`Predicate::binds`] in order.

use crate::filters::{DimensionId, FilterSet};
use crate::schema::SchemaMap;

/// Which date column the lower bound applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateMode {
    /// `dd.calendar_date`; the query joins `dim_date dd`.
    DateJoin,
    /// The fact table's own date column; no `dim_date` join needed.
    RawDateColumn,
}

/// A conjunction of clauses with positional `?` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    clauses: Vec<&'static str>,
    binds: Vec<i64>,
}

impl Predicate {
    /// Date lower bound followed by equality clauses for every present id,
    /// in region → channel → team → client type order.
    pub fn build(filters: &FilterSet, mode: DateMode, map: &SchemaMap) -> Self {
        let mut predicate = Self::date_window(filters.time_range_days, mode, map);

        predicate.push_id(map.region.filter_clause, filters.region_id);
        predicate.push_id(map.channel.filter_clause, filters.channel_id);
        if map.has_team_dimension() {
            predicate.push_id(map.team.filter_clause, filters.team_id);
        }
        if let Some(client_type) = &map.client_type {
            predicate.push_id(client_type.filter_clause, filters.client_type_id);
        }
        predicate
    }

    /// Only the date lower bound.
    pub fn date_window(days: u32, mode: DateMode, map: &SchemaMap) -> Self {
        let clause = match mode {
            DateMode::DateJoin => map.joined_date_bound,
            DateMode::RawDateColumn => map.raw_date_bound,
        };
        Self {
            clauses: vec![clause],
            binds: vec![i64::from(days)],
        }
    }

    fn push_id(&mut self, clause: &'static str, id: Option<DimensionId>) {
        if let Some(id) = id {
            self.clauses.push(clause);
            self.binds.push(id.get());
        }
    }

    pub fn sql(&self) -> String {
        self.clauses.join(" AND ")
    }

    pub fn clauses(&self) -> &[&'static str] {
        &self.clauses
    }

    pub fn binds(&self) -> &[i64] {
        &self.binds
    }
}

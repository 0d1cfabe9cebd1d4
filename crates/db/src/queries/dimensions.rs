// crates/db/src/queries/dimensions.rs
// Filter dropdown contents.

use crate::{Database, DbResult};
use fieldintel_core::{
    time_range_options, AgentOption, ChannelOption, ClientTypeOption, DimensionTable,
    FilterDimensions, RegionOption, TeamOption,
};
use sqlx::SqliteConnection;

async fn list_dimension(
    conn: &mut SqliteConnection,
    dim: &DimensionTable,
) -> DbResult<Vec<(i64, String)>> {
    let sql = format!(
        "SELECT {id}, {name} FROM {table} ORDER BY {name}, {id}",
        id = dim.id,
        name = dim.name,
        table = dim.table
    );
    let rows = sqlx::query_as(&sql).fetch_all(conn).await?;
    Ok(rows)
}

impl Database {
    /// Every dimension list the dashboard filters offer, plus the fixed
    /// time-range choices. Teams are the channel list on layouts without
    /// their own team table; client types are empty there.
    pub async fn filter_dimensions(&self) -> DbResult<FilterDimensions> {
        let map = self.schema();
        let mut conn = self.pool().acquire().await?;

        let regions = list_dimension(&mut conn, &map.region)
            .await?
            .into_iter()
            .map(|(region_id, region_name)| RegionOption {
                region_id,
                region_name,
            })
            .collect();

        let channels = list_dimension(&mut conn, &map.channel)
            .await?
            .into_iter()
            .map(|(channel_id, channel_name)| ChannelOption {
                channel_id,
                channel_name,
            })
            .collect();

        let teams = list_dimension(&mut conn, &map.team)
            .await?
            .into_iter()
            .map(|(team_id, team_name)| TeamOption { team_id, team_name })
            .collect();

        let client_types = match &map.client_type {
            Some(dim) => list_dimension(&mut conn, dim)
                .await?
                .into_iter()
                .map(|(client_type_id, client_type_name)| ClientTypeOption {
                    client_type_id,
                    client_type_name,
                })
                .collect(),
            None => Vec::new(),
        };

        let agents = list_dimension(&mut conn, &map.agent)
            .await?
            .into_iter()
            .map(|(agent_id, agent_name)| AgentOption {
                agent_id,
                agent_name,
            })
            .collect();

        Ok(FilterDimensions {
            regions,
            teams,
            channels,
            client_types,
            agents,
            time_ranges: time_range_options(),
        })
    }
}

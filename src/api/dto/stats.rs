//! DTOs for internal statistics.

use serde::{Deserialize, Serialize};

use crate::domain::entities::StoreStats;

/// Counts over non-deleted records.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub urls: i64,
    pub users: i64,
}

impl From<StoreStats> for StatsResponse {
    fn from(stats: StoreStats) -> Self {
        Self {
            urls: stats.non_deleted_record_count,
            users: stats.distinct_owner_count,
        }
    }
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Audit record written once per recorded activity. Never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ActivityLogEntry {
    pub activity_id: Uuid,
    pub user_id: String,
    pub activity_type: String,
    pub timestamp: i64,
}

impl ActivityLogEntry {
    pub fn new(user_id: impl Into<String>, activity_type: impl Into<String>, timestamp: i64) -> Self {
        Self {
            activity_id: Uuid::new_v4(),
            user_id: user_id.into(),
            activity_type: activity_type.into(),
            timestamp,
        }
    }
}

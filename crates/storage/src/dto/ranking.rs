use serde::Deserialize;
use utoipa::IntoParams;

use crate::models::RankingCursor;

#[derive(Debug, Deserialize, IntoParams)]
pub struct RankingQuery {
    #[serde(default = "super::common::default_limit")]
    pub page_size: u32,
    /// Score of the last user on the previous page
    pub last_score: Option<f64>,
    /// Id of the last user on the previous page
    pub last_id: Option<String>,
}

impl RankingQuery {
    /// Both halves of the cursor or neither.
    pub fn cursor(&self) -> Result<Option<RankingCursor>, String> {
        match (self.last_score, &self.last_id) {
            (Some(score), Some(id)) => Ok(Some(RankingCursor::new(score, id.clone()))),
            (None, None) => Ok(None),
            _ => Err("last_score and last_id must be provided together".to_string()),
        }
    }
}

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UserProfile;

/// Position of the last user on a ranked page: `(score, id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RankingCursor {
    pub score: f64,
    pub user_id: String,
}

impl RankingCursor {
    pub fn new(score: f64, user_id: impl Into<String>) -> Self {
        Self {
            score,
            user_id: user_id.into(),
        }
    }

    pub fn after(user: &UserProfile) -> Self {
        Self::new(user.potential_score, user.id.clone())
    }

    /// True when `user` sorts strictly after this cursor in ranking order.
    pub fn precedes(&self, user: &UserProfile) -> bool {
        user.potential_score < self.score
            || (user.potential_score == self.score && user.id > self.user_id)
    }
}

/// Ranking order: score descending, then id ascending.
pub fn ranking_order(a: &UserProfile, b: &UserProfile) -> Ordering {
    b.potential_score
        .total_cmp(&a.potential_score)
        .then_with(|| a.id.cmp(&b.id))
}

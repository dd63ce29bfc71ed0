use serde::Serialize;
use utoipa::ToSchema;

use super::potential_score::compute_potential_score;
use crate::error::{Result, StorageError};
use crate::models::{ActivityLogEntry, UserChanges};
use crate::repository::UserStore;

/// Result of recording one activity.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ActivityOutcome {
    pub user_id: String,
    pub activity_type: String,
    pub recorded_at: i64,
    /// Refreshed score, or `None` when the refresh failed and the stored score is stale.
    pub potential_score: Option<f64>,
}

pub struct ActivityRecorder<'a> {
    store: &'a dyn UserStore,
}

impl<'a> ActivityRecorder<'a> {
    pub fn new(store: &'a dyn UserStore) -> Self {
        Self { store }
    }

    /// Marks the user active at `now`, logs the activity, then refreshes the score.
    ///
    /// The three writes are not transactional. A failed score refresh leaves the
    /// previous score in place and is reported through the outcome instead of an error.
    pub async fn record(&self, user_id: &str, activity_type: &str, now: i64) -> Result<ActivityOutcome> {
        let activity_type = activity_type.trim();
        if activity_type.is_empty() {
            return Err(StorageError::Validation(
                "activity_type must not be empty".to_string(),
            ));
        }

        let mut profile = self
            .store
            .get_user(user_id)
            .await?
            .ok_or_else(|| StorageError::user_not_found(user_id))?;

        let touch = UserChanges::touch(now);
        self.store.update_user(user_id, &touch).await?;
        touch.apply_to(&mut profile);

        self.store
            .append_activity(&ActivityLogEntry::new(user_id, activity_type, now))
            .await?;

        let score = compute_potential_score(
            profile.average_rating,
            profile.rental_count,
            profile.last_active_at,
            now,
        );

        let potential_score = match self.store.update_user(user_id, &UserChanges::score(score)).await {
            Ok(()) => Some(score),
            Err(e) => {
                tracing::warn!(
                    ?e,
                    user_id,
                    activity_type,
                    "potential score refresh failed; stored score is stale"
                );
                None
            }
        };

        tracing::debug!(user_id, activity_type, ?potential_score, "recorded activity");

        Ok(ActivityOutcome {
            user_id: user_id.to_string(),
            activity_type: activity_type.to_string(),
            recorded_at: now,
            potential_score,
        })
    }
}

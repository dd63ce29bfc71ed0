use super::activity_recorder::ActivityRecorder;
use super::potential_score::compute_potential_score;
use crate::dto::user::{CreateUserRequest, UpdateUserRequest};
use crate::error::{Result, StorageError};
use crate::models::{UserChanges, UserProfile};
use crate::repository::UserStore;

/// Activity tag written whenever a profile is fetched.
pub const PROFILE_VIEW_ACTIVITY: &str = "profile_view";

pub struct ProfileService<'a> {
    store: &'a dyn UserStore,
}

impl<'a> ProfileService<'a> {
    pub fn new(store: &'a dyn UserStore) -> Self {
        Self { store }
    }

    /// Create a profile active at `now`, with its initial score already computed.
    pub async fn create(&self, request: &CreateUserRequest, now: i64) -> Result<UserProfile> {
        let average_rating = request.average_rating.unwrap_or(0.0);
        let rental_count = request.rental_count.unwrap_or(0);

        let profile = UserProfile {
            id: request.user_id.clone(),
            email: request.email.clone(),
            display_name: request.display_name.clone(),
            photo_url: request.photo_url.clone(),
            average_rating,
            rental_count,
            last_active_at: now,
            potential_score: compute_potential_score(average_rating, rental_count, now, now),
            created_at: now,
            updated_at: now,
        };

        self.store.insert_user(&profile).await?;
        tracing::info!(user_id = %profile.id, score = profile.potential_score, "created user profile");

        Ok(profile)
    }

    /// Fetch a profile, counting the read as a `profile_view` activity.
    pub async fn get(&self, user_id: &str, now: i64) -> Result<UserProfile> {
        ActivityRecorder::new(self.store)
            .record(user_id, PROFILE_VIEW_ACTIVITY, now)
            .await?;

        self.store
            .get_user(user_id)
            .await?
            .ok_or_else(|| StorageError::user_not_found(user_id))
    }

    /// Profiles ordered by id. An unknown `start_after` id restarts from the beginning.
    pub async fn list(&self, limit: u32, start_after: Option<&str>) -> Result<Vec<UserProfile>> {
        if let Some(id) = start_after
            && self.store.get_user(id).await?.is_some()
        {
            return self.store.list_users(limit, Some(id)).await;
        }

        self.store.list_users(limit, None).await
    }

    /// Merge the request into the profile, mark it active and refresh its score.
    pub async fn update(
        &self,
        user_id: &str,
        request: &UpdateUserRequest,
        now: i64,
    ) -> Result<UserProfile> {
        let mut profile = self
            .store
            .get_user(user_id)
            .await?
            .ok_or_else(|| StorageError::user_not_found(user_id))?;

        let mut changes = UserChanges::from(request);
        changes.last_active_at = Some(now);
        changes.updated_at = Some(now);
        changes.apply_to(&mut profile);

        profile.potential_score = compute_potential_score(
            profile.average_rating,
            profile.rental_count,
            profile.last_active_at,
            now,
        );
        changes.potential_score = Some(profile.potential_score);

        self.store.update_user(user_id, &changes).await?;

        Ok(profile)
    }
}

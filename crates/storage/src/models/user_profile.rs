use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A user profile together with its cached potential score.
///
/// All timestamps are epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub average_rating: f64,
    pub rental_count: u32,
    pub last_active_at: i64,
    pub potential_score: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Merge-update applied to a stored profile. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub average_rating: Option<f64>,
    pub rental_count: Option<u32>,
    pub last_active_at: Option<i64>,
    pub potential_score: Option<f64>,
    pub updated_at: Option<i64>,
}

impl UserChanges {
    pub fn touch(now: i64) -> Self {
        Self {
            last_active_at: Some(now),
            updated_at: Some(now),
            ..Self::default()
        }
    }

    pub fn score(potential_score: f64) -> Self {
        Self {
            potential_score: Some(potential_score),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(&self, profile: &mut UserProfile) {
        if let Some(ref email) = self.email {
            profile.email = Some(email.clone());
        }
        if let Some(ref display_name) = self.display_name {
            profile.display_name = Some(display_name.clone());
        }
        if let Some(ref photo_url) = self.photo_url {
            profile.photo_url = Some(photo_url.clone());
        }
        if let Some(average_rating) = self.average_rating {
            profile.average_rating = average_rating;
        }
        if let Some(rental_count) = self.rental_count {
            profile.rental_count = rental_count;
        }
        if let Some(last_active_at) = self.last_active_at {
            profile.last_active_at = last_active_at;
        }
        if let Some(potential_score) = self.potential_score {
            profile.potential_score = potential_score;
        }
        if let Some(updated_at) = self.updated_at {
            profile.updated_at = updated_at;
        }
    }
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::UserChanges;

/// Request payload for creating a user profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 128, message = "User id must be between 1 and 128 characters"))]
    pub user_id: String,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(max = 255))]
    pub display_name: Option<String>,

    #[validate(url)]
    #[validate(length(max = 500))]
    pub photo_url: Option<String>,

    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    pub average_rating: Option<f64>,

    #[validate(range(max = 1000000))]
    pub rental_count: Option<u32>,
}

/// Request payload for updating a user profile. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(max = 255))]
    pub display_name: Option<String>,

    #[validate(url)]
    #[validate(length(max = 500))]
    pub photo_url: Option<String>,

    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    pub average_rating: Option<f64>,

    #[validate(range(max = 1000000))]
    pub rental_count: Option<u32>,
}

impl From<&UpdateUserRequest> for UserChanges {
    fn from(request: &UpdateUserRequest) -> Self {
        Self {
            email: request.email.clone(),
            display_name: request.display_name.clone(),
            photo_url: request.photo_url.clone(),
            average_rating: request.average_rating,
            rental_count: request.rental_count,
            ..Self::default()
        }
    }
}

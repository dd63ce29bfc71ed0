use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RecordActivityRequest {
    #[validate(length(
        min = 1,
        max = 64,
        message = "Activity type must be between 1 and 64 characters"
    ))]
    pub activity_type: String,
}

use storage::{
    dto::{
        common::ListUsersParams,
        user::{CreateUserRequest, UpdateUserRequest},
    },
    error::Result,
    models::UserProfile,
    repository::UserStore,
    services::{ActivityOutcome, ActivityRecorder, ProfileService},
};

/// List users ordered by id
pub async fn list_users(store: &dyn UserStore, params: &ListUsersParams) -> Result<Vec<UserProfile>> {
    let service = ProfileService::new(store);
    service.list(params.limit, params.start_after.as_deref()).await
}

/// Get a user, recording the view as activity
pub async fn get_user(store: &dyn UserStore, user_id: &str, now: i64) -> Result<UserProfile> {
    let service = ProfileService::new(store);
    service.get(user_id, now).await
}

/// Create a new user profile
pub async fn create_user(
    store: &dyn UserStore,
    request: &CreateUserRequest,
    now: i64,
) -> Result<UserProfile> {
    let service = ProfileService::new(store);
    service.create(request, now).await
}

/// Update a user profile
pub async fn update_user(
    store: &dyn UserStore,
    user_id: &str,
    request: &UpdateUserRequest,
    now: i64,
) -> Result<UserProfile> {
    let service = ProfileService::new(store);
    service.update(user_id, request, now).await
}

/// Record an activity and refresh the user's potential score
pub async fn record_activity(
    store: &dyn UserStore,
    user_id: &str,
    activity_type: &str,
    now: i64,
) -> Result<ActivityOutcome> {
    let recorder = ActivityRecorder::new(store);
    recorder.record(user_id, activity_type, now).await
}

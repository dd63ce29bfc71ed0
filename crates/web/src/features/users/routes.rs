use axum::{
    Router,
    routing::{get, post},
};
use storage::Database;

use super::handlers::{create_user, get_user, list_users, record_activity, update_user};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:user_id", get(get_user).put(update_user))
        .route("/:user_id/activity", post(record_activity))
}

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use storage::{Database, dto::common::ApiResponse, services::BatchOutcome};

use crate::error::WebError;
use crate::features::now_millis;

use super::services;

#[utoipa::path(
    post,
    path = "/api/admin/scores/recompute-all",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Potential scores recomputed", body = ApiResponse<BatchOutcome>),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Recomputation failed")
    ),
    tag = "admin"
)]
pub async fn recompute_all_scores(State(db): State<Database>) -> Result<Response, WebError> {
    let outcome = services::recompute_all_scores(db.store(), now_millis()).await?;

    let message = format!(
        "Successfully recomputed potential scores for {} users",
        outcome.updated
    );

    Ok(Json(ApiResponse::ok(outcome).with_message(message)).into_response())
}

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{common::ApiResponse, ranking::RankingQuery},
    services::RankedPage,
};

use crate::error::WebError;
use crate::extract::ApiQuery;

use super::services;

#[utoipa::path(
    get,
    path = "/api/rankings/potential",
    params(RankingQuery),
    responses(
        (status = 200, description = "Users ranked by potential score", body = ApiResponse<RankedPage>),
        (status = 400, description = "Invalid page size or cursor")
    ),
    tag = "rankings"
)]
pub async fn get_potential_ranking(
    State(db): State<Database>,
    ApiQuery(query): ApiQuery<RankingQuery>,
) -> Result<Response, WebError> {
    let cursor = query.cursor().map_err(WebError::BadRequest)?;

    let page = services::get_potential_ranking(db.store(), query.page_size, cursor.as_ref()).await?;

    Ok(Json(ApiResponse::ok(page)).into_response())
}

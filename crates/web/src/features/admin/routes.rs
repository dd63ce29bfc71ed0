use axum::{Router, middleware, routing::post};
use storage::Database;

use super::handlers::recompute_all_scores;
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    Router::new()
        .route("/scores/recompute-all", post(recompute_all_scores))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}

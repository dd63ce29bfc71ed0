use axum::{Router, routing::get};
use storage::Database;

use super::handlers::get_potential_ranking;

pub fn routes() -> Router<Database> {
    Router::new().route("/potential", get(get_potential_ranking))
}

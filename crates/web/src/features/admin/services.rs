use storage::{
    error::Result,
    repository::UserStore,
    services::{BatchOutcome, ScoreBatchUpdater},
};

/// Recompute every user's potential score
pub async fn recompute_all_scores(store: &dyn UserStore, now: i64) -> Result<BatchOutcome> {
    let updater = ScoreBatchUpdater::new(store);
    updater.recompute_all(now).await
}

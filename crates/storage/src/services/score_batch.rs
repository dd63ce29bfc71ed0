use serde::Serialize;
use utoipa::ToSchema;

use super::potential_score::compute_potential_score;
use crate::error::Result;
use crate::repository::UserStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct BatchOutcome {
    /// Profiles read by the pass.
    pub scanned: u64,
    /// Profiles whose score the store reports as written.
    pub updated: u64,
    /// Timestamp every score in the pass was computed against.
    pub computed_at: i64,
}

pub struct ScoreBatchUpdater<'a> {
    store: &'a dyn UserStore,
}

impl<'a> ScoreBatchUpdater<'a> {
    pub fn new(store: &'a dyn UserStore) -> Self {
        Self { store }
    }

    /// Recompute every profile's potential score against a single `now`.
    pub async fn recompute_all(&self, now: i64) -> Result<BatchOutcome> {
        let profiles = self.store.scan_all().await?;
        let scanned = profiles.len() as u64;

        let scores: Vec<(String, f64)> = profiles
            .into_iter()
            .map(|p| {
                let score =
                    compute_potential_score(p.average_rating, p.rental_count, p.last_active_at, now);
                (p.id, score)
            })
            .collect();

        let updated = self.store.batch_write_scores(&scores).await?;

        if updated < scanned {
            tracing::warn!(
                scanned,
                updated,
                "potential score batch wrote fewer profiles than it scanned"
            );
        }
        tracing::info!(scanned, updated, "recomputed potential scores");

        Ok(BatchOutcome {
            scanned,
            updated,
            computed_at: now,
        })
    }
}

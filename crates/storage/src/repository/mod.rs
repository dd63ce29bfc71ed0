pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ActivityLogEntry, RankingCursor, UserChanges, UserProfile};

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

/// Storage collaborator for user profiles and the activity log.
///
/// Implementations serialize individual record reads and writes but are not
/// expected to offer transactions across calls.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, user_id: &str) -> Result<Option<UserProfile>>;

    /// Fails with `ConstraintViolation` if the id is already taken.
    async fn insert_user(&self, profile: &UserProfile) -> Result<()>;

    /// Merge-update. Fails with `NotFound` if the profile does not exist.
    async fn update_user(&self, user_id: &str, changes: &UserChanges) -> Result<()>;

    /// Up to `limit` profiles ordered by score desc, id asc, strictly after `start_after`.
    async fn scan_ranked(
        &self,
        limit: u32,
        start_after: Option<&RankingCursor>,
    ) -> Result<Vec<UserProfile>>;

    async fn scan_all(&self) -> Result<Vec<UserProfile>>;

    /// Up to `limit` profiles ordered by id, strictly after `start_after` when given.
    async fn list_users(&self, limit: u32, start_after: Option<&str>) -> Result<Vec<UserProfile>>;

    async fn append_activity(&self, entry: &ActivityLogEntry) -> Result<()>;

    /// Writes every `(user_id, score)` pair as one unit where the backend allows it.
    /// Returns the number of profiles written.
    async fn batch_write_scores(&self, scores: &[(String, f64)]) -> Result<u64>;

    async fn run_migrations(&self) -> Result<()> {
        Ok(())
    }
}

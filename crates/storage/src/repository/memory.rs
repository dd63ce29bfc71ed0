use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::UserStore;
use crate::error::{Result, StorageError};
use crate::models::{ActivityLogEntry, RankingCursor, UserChanges, UserProfile, ranking_order};

/// Process-local store used when no database is configured, and by tests.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<BTreeMap<String, UserProfile>>,
    activities: RwLock<Vec<ActivityLogEntry>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = UserProfile>) -> Self {
        let users = users.into_iter().map(|u| (u.id.clone(), u)).collect();
        Self {
            users: RwLock::new(users),
            activities: RwLock::default(),
        }
    }

    /// Snapshot of the activity log in append order.
    pub async fn activities(&self) -> Vec<ActivityLogEntry> {
        self.activities.read().await.clone()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get_user(&self, user_id: &str) -> Result<Option<UserProfile>> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn insert_user(&self, profile: &UserProfile) -> Result<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&profile.id) {
            return Err(StorageError::ConstraintViolation(format!(
                "user `{}` already exists",
                profile.id
            )));
        }
        users.insert(profile.id.clone(), profile.clone());
        Ok(())
    }

    async fn update_user(&self, user_id: &str, changes: &UserChanges) -> Result<()> {
        let mut users = self.users.write().await;
        let profile = users
            .get_mut(user_id)
            .ok_or_else(|| StorageError::user_not_found(user_id))?;
        changes.apply_to(profile);
        Ok(())
    }

    async fn scan_ranked(
        &self,
        limit: u32,
        start_after: Option<&RankingCursor>,
    ) -> Result<Vec<UserProfile>> {
        let users = self.users.read().await;
        let mut ranked: Vec<&UserProfile> = users
            .values()
            .filter(|u| start_after.is_none_or(|c| c.precedes(u)))
            .collect();
        ranked.sort_by(|a, b| ranking_order(a, b));

        Ok(ranked
            .into_iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn scan_all(&self) -> Result<Vec<UserProfile>> {
        Ok(self.users.read().await.values().cloned().collect())
    }

    async fn list_users(&self, limit: u32, start_after: Option<&str>) -> Result<Vec<UserProfile>> {
        use std::ops::Bound;

        let users = self.users.read().await;
        let lower = match start_after {
            Some(id) => Bound::Excluded(id.to_string()),
            None => Bound::Unbounded,
        };

        Ok(users
            .range((lower, Bound::Unbounded))
            .take(limit as usize)
            .map(|(_, u)| u.clone())
            .collect())
    }

    async fn append_activity(&self, entry: &ActivityLogEntry) -> Result<()> {
        self.activities.write().await.push(entry.clone());
        Ok(())
    }

    async fn batch_write_scores(&self, scores: &[(String, f64)]) -> Result<u64> {
        let mut users = self.users.write().await;
        let mut written = 0u64;

        for (user_id, score) in scores {
            if let Some(profile) = users.get_mut(user_id) {
                profile.potential_score = *score;
                written += 1;
            }
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, score: f64) -> UserProfile {
        UserProfile {
            id: id.to_string(),
            email: None,
            display_name: None,
            photo_url: None,
            average_rating: 0.0,
            rental_count: 0,
            last_active_at: 0,
            potential_score: score,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_id() {
        let store = MemoryUserStore::new();
        store.insert_user(&user("a", 0.0)).await.unwrap();

        let err = store.insert_user(&user("a", 5.0)).await.unwrap_err();
        assert!(matches!(err, StorageError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn test_update_unknown_user_is_not_found() {
        let store = MemoryUserStore::new();
        let err = store
            .update_user("ghost", &UserChanges::score(1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_scan_ranked_seeks_past_cursor() {
        let store = MemoryUserStore::with_users([
            user("b", 80.0),
            user("a", 80.0),
            user("c", 60.0),
            user("d", 90.0),
        ]);

        let first = store.scan_ranked(2, None).await.unwrap();
        let ids: Vec<&str> = first.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["d", "a"]);

        let cursor = RankingCursor::new(80.0, "a");
        let rest = store.scan_ranked(10, Some(&cursor)).await.unwrap();
        let ids: Vec<&str> = rest.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn test_list_users_by_id() {
        let store = MemoryUserStore::with_users([user("c", 0.0), user("a", 0.0), user("b", 0.0)]);

        let page = store.list_users(2, None).await.unwrap();
        let ids: Vec<&str> = page.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);

        let page = store.list_users(2, Some("b")).await.unwrap();
        let ids: Vec<&str> = page.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["c"]);
    }

    #[tokio::test]
    async fn test_batch_write_skips_missing_ids() {
        let store = MemoryUserStore::with_users([user("a", 0.0)]);
        let written = store
            .batch_write_scores(&[("a".to_string(), 42.0), ("ghost".to_string(), 1.0)])
            .await
            .unwrap();

        assert_eq!(written, 1);
        let a = store.get_user("a").await.unwrap().unwrap();
        assert_eq!(a.potential_score, 42.0);
    }
}

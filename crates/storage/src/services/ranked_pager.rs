use serde::Serialize;
use utoipa::ToSchema;

use super::potential_score::MAX_SCORE;
use crate::error::{Result, StorageError};
use crate::models::{RankingCursor, UserProfile};
use crate::repository::UserStore;

pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RankedPage {
    pub users: Vec<UserProfile>,
    /// Resume point for the next page; absent once the ranking is exhausted.
    pub next_cursor: Option<RankingCursor>,
    pub has_more: bool,
}

/// Leaderboard by potential score (desc), ties broken by user id (asc).
pub struct RankedUserPager<'a> {
    store: &'a dyn UserStore,
}

impl<'a> RankedUserPager<'a> {
    pub fn new(store: &'a dyn UserStore) -> Self {
        Self { store }
    }

    /// Returns up to `page_size` users strictly after `cursor`.
    ///
    /// A malformed cursor is a validation error. A well-formed cursor naming a user
    /// that does not exist is rejected as `InvalidCursor`; there is no fallback to
    /// the first page.
    pub async fn page(&self, page_size: u32, cursor: Option<&RankingCursor>) -> Result<RankedPage> {
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(StorageError::Validation(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }

        if let Some(cursor) = cursor {
            self.check_cursor(cursor).await?;
        }

        let mut users = self.store.scan_ranked(page_size + 1, cursor).await?;

        let has_more = users.len() > page_size as usize;
        users.truncate(page_size as usize);

        let next_cursor = if has_more {
            users.last().map(RankingCursor::after)
        } else {
            None
        };

        Ok(RankedPage {
            users,
            next_cursor,
            has_more,
        })
    }

    async fn check_cursor(&self, cursor: &RankingCursor) -> Result<()> {
        if !cursor.score.is_finite() || !(0.0..=MAX_SCORE).contains(&cursor.score) {
            return Err(StorageError::Validation(format!(
                "cursor score must be between 0 and {MAX_SCORE}"
            )));
        }
        if cursor.user_id.is_empty() {
            return Err(StorageError::Validation(
                "cursor user id must not be empty".to_string(),
            ));
        }

        if self.store.get_user(&cursor.user_id).await?.is_none() {
            return Err(StorageError::InvalidCursor(format!(
                "no user `{}` to resume from",
                cursor.user_id
            )));
        }

        Ok(())
    }
}

mod activity;
mod ranking_cursor;
mod user_profile;

pub use activity::ActivityLogEntry;
pub use ranking_cursor::{RankingCursor, ranking_order};
pub use user_profile::{UserChanges, UserProfile};

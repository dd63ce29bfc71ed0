pub mod activity_recorder;
pub mod potential_score;
pub mod profiles;
pub mod ranked_pager;
pub mod score_batch;

pub use activity_recorder::{ActivityOutcome, ActivityRecorder};
pub use potential_score::compute_potential_score;
pub use profiles::ProfileService;
pub use ranked_pager::{RankedPage, RankedUserPager};
pub use score_batch::{BatchOutcome, ScoreBatchUpdater};

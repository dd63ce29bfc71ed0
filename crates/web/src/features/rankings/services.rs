use storage::{
    error::Result,
    models::RankingCursor,
    repository::UserStore,
    services::{RankedPage, RankedUserPager},
};

/// Get one page of users ranked by potential score
pub async fn get_potential_ranking(
    store: &dyn UserStore,
    page_size: u32,
    cursor: Option<&RankingCursor>,
) -> Result<RankedPage> {
    let pager = RankedUserPager::new(store);
    pager.page(page_size, cursor).await
}

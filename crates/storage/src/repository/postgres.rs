use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, migrate::Migrator};

use super::UserStore;
use crate::error::{Result, StorageError};
use crate::models::{ActivityLogEntry, RankingCursor, UserChanges, UserProfile};

static MIGRATOR: Migrator = sqlx::migrate!();

/// Rows per `UPDATE ... FROM UNNEST` statement inside a batch transaction.
const BATCH_CHUNK_SIZE: usize = 500;

const USER_COLUMNS: &str = "user_id, email, display_name, photo_url, average_rating, \
     rental_count, last_active_at, potential_score, created_at, updated_at";

#[derive(FromRow)]
struct UserRow {
    user_id: String,
    email: Option<String>,
    display_name: Option<String>,
    photo_url: Option<String>,
    average_rating: f64,
    rental_count: i32,
    last_active_at: i64,
    potential_score: f64,
    created_at: i64,
    updated_at: i64,
}

impl From<UserRow> for UserProfile {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.user_id,
            email: row.email,
            display_name: row.display_name,
            photo_url: row.photo_url,
            average_rating: row.average_rating,
            rental_count: u32::try_from(row.rental_count).unwrap_or(0),
            last_active_at: row.last_active_at,
            potential_score: row.potential_score,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn rental_count_column(count: u32) -> Result<i32> {
    i32::try_from(count)
        .map_err(|_| StorageError::Validation(format!("rental_count {count} is out of range")))
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn get_user(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM user_profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserProfile::from))
    }

    async fn insert_user(&self, profile: &UserProfile) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_profiles (user_id, email, display_name, photo_url, average_rating,
                                       rental_count, last_active_at, potential_score, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(&profile.id)
        .bind(&profile.email)
        .bind(&profile.display_name)
        .bind(&profile.photo_url)
        .bind(profile.average_rating)
        .bind(rental_count_column(profile.rental_count)?)
        .bind(profile.last_active_at)
        .bind(profile.potential_score)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await;

        match result.map_err(StorageError::from) {
            Ok(_) => Ok(()),
            Err(e) if e.is_unique_violation() => Err(StorageError::ConstraintViolation(format!(
                "user `{}` already exists",
                profile.id
            ))),
            Err(e) => Err(e),
        }
    }

    async fn update_user(&self, user_id: &str, changes: &UserChanges) -> Result<()> {
        if changes.is_empty() {
            return match self.get_user(user_id).await? {
                Some(_) => Ok(()),
                None => Err(StorageError::user_not_found(user_id)),
            };
        }

        let mut query: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE user_profiles SET ");
        let mut set = query.separated(", ");

        if let Some(ref email) = changes.email {
            set.push("email = ").push_bind_unseparated(email.clone());
        }
        if let Some(ref display_name) = changes.display_name {
            set.push("display_name = ")
                .push_bind_unseparated(display_name.clone());
        }
        if let Some(ref photo_url) = changes.photo_url {
            set.push("photo_url = ").push_bind_unseparated(photo_url.clone());
        }
        if let Some(average_rating) = changes.average_rating {
            set.push("average_rating = ")
                .push_bind_unseparated(average_rating);
        }
        if let Some(rental_count) = changes.rental_count {
            set.push("rental_count = ")
                .push_bind_unseparated(rental_count_column(rental_count)?);
        }
        if let Some(last_active_at) = changes.last_active_at {
            set.push("last_active_at = ")
                .push_bind_unseparated(last_active_at);
        }
        if let Some(potential_score) = changes.potential_score {
            set.push("potential_score = ")
                .push_bind_unseparated(potential_score);
        }
        if let Some(updated_at) = changes.updated_at {
            set.push("updated_at = ").push_bind_unseparated(updated_at);
        }

        query.push(" WHERE user_id = ");
        query.push_bind(user_id);

        let result = query.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::user_not_found(user_id));
        }

        Ok(())
    }

    async fn scan_ranked(
        &self,
        limit: u32,
        start_after: Option<&RankingCursor>,
    ) -> Result<Vec<UserProfile>> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new("SELECT ");
        query.push(USER_COLUMNS);
        query.push(" FROM user_profiles");

        if let Some(cursor) = start_after {
            query.push(" WHERE potential_score < ");
            query.push_bind(cursor.score);
            query.push(" OR (potential_score = ");
            query.push_bind(cursor.score);
            query.push(" AND user_id > ");
            query.push_bind(cursor.user_id.clone());
            query.push(")");
        }

        query.push(" ORDER BY potential_score DESC, user_id ASC LIMIT ");
        query.push_bind(i64::from(limit));

        let rows: Vec<UserRow> = query.build_query_as().fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(UserProfile::from).collect())
    }

    async fn scan_all(&self) -> Result<Vec<UserProfile>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM user_profiles"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(UserProfile::from).collect())
    }

    async fn list_users(&self, limit: u32, start_after: Option<&str>) -> Result<Vec<UserProfile>> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new("SELECT ");
        query.push(USER_COLUMNS);
        query.push(" FROM user_profiles");

        if let Some(id) = start_after {
            query.push(" WHERE user_id > ");
            query.push_bind(id.to_string());
        }

        query.push(" ORDER BY user_id ASC LIMIT ");
        query.push_bind(i64::from(limit));

        let rows: Vec<UserRow> = query.build_query_as().fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(UserProfile::from).collect())
    }

    async fn append_activity(&self, entry: &ActivityLogEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_activities (activity_id, user_id, activity_type, occurred_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(entry.activity_id)
        .bind(&entry.user_id)
        .bind(&entry.activity_type)
        .bind(entry.timestamp)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn batch_write_scores(&self, scores: &[(String, f64)]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0u64;

        for chunk in scores.chunks(BATCH_CHUNK_SIZE) {
            let (ids, values): (Vec<String>, Vec<f64>) = chunk.iter().cloned().unzip();

            let result = sqlx::query(
                r#"
                UPDATE user_profiles AS u
                SET potential_score = v.score
                FROM UNNEST($1::text[], $2::float8[]) AS v(user_id, score)
                WHERE u.user_id = v.user_id
                "#,
            )
            .bind(ids)
            .bind(values)
            .execute(&mut *tx)
            .await?;

            written += result.rows_affected();
        }

        tx.commit().await?;

        Ok(written)
    }

    async fn run_migrations(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await?;
        Ok(())
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

    /// Connects to `DATABASE_URL` and empties both tables, so point it at a scratch database.
    async fn scratch_store() -> PgUserStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let store = PgUserStore::connect(&url).await.unwrap();
        store.run_migrations().await.unwrap();
        sqlx::query("TRUNCATE user_activities, user_profiles")
            .execute(&store.pool)
            .await
            .unwrap();
        store
    }

    fn ids(users: &[UserProfile]) -> Vec<&str> {
        users.iter().map(|u| u.id.as_str()).collect()
    }

    #[tokio::test]
    #[ignore = "requires a PostgreSQL DATABASE_URL"]
    async fn test_postgres_ranking_batch_and_merge_update() {
        let store = scratch_store().await;
        for (id, score) in [("b", 80.0), ("a", 80.0), ("c", 60.0)] {
            store.insert_user(&user(id, score)).await.unwrap();
        }

        let first = store.scan_ranked(2, None).await.unwrap();
        assert_eq!(ids(&first), vec!["a", "b"]);

        let cursor = RankingCursor::after(&first[1]);
        let rest = store.scan_ranked(2, Some(&cursor)).await.unwrap();
        assert_eq!(ids(&rest), vec!["c"]);

        let written = store
            .batch_write_scores(&[
                ("a".to_string(), 10.0),
                ("c".to_string(), 90.0),
                ("ghost".to_string(), 50.0),
            ])
            .await
            .unwrap();
        assert_eq!(written, 2);

        let reranked = store.scan_ranked(10, None).await.unwrap();
        assert_eq!(ids(&reranked), vec!["c", "b", "a"]);

        let changes = UserChanges {
            display_name: Some("Bee".to_string()),
            rental_count: Some(7),
            ..UserChanges::default()
        };
        store.update_user("b", &changes).await.unwrap();
        let b = store.get_user("b").await.unwrap().unwrap();
        assert_eq!(b.display_name.as_deref(), Some("Bee"));
        assert_eq!(b.rental_count, 7);
        assert_eq!(b.potential_score, 80.0);

        let err = store.update_user("ghost", &changes).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));

        let dup = store.insert_user(&user("a", 0.0)).await.unwrap_err();
        assert!(matches!(dup, StorageError::ConstraintViolation(_)));
    }
}

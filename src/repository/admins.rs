//! Admins repository

use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::admin::Admin};

#[derive(Clone)]
pub struct AdminsRepository {
    pool: Pool<Postgres>,
}

impl AdminsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_by_username(&self, username: &str) -> AppResult<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(admin)
    }

    /// Insert an admin unless the username is taken. Returns true when a row was created.
    pub async fn create_if_missing(&self, username: &str, password_hash: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT INTO admins (username, password) VALUES ($1, $2) ON CONFLICT (username) DO NOTHING",
        )
        .bind(username)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

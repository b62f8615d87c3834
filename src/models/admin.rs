//! Administrator model

use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Admin {
    pub id: i32,
    pub username: String,
    /// Hashed password (argon2)
    pub password: String,
}

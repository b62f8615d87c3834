//! Repository layer for database operations

pub mod admins;
pub mod books;
pub mod borrowings;
pub mod students;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub admins: admins::AdminsRepository,
    pub students: students::StudentsRepository,
    pub books: books::BooksRepository,
    pub borrowings: borrowings::BorrowingsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            admins: admins::AdminsRepository::new(pool.clone()),
            students: students::StudentsRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            borrowings: borrowings::BorrowingsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Check database connectivity
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

//! Books repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::Book,
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(book)
    }

    pub async fn list(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    /// Create the title with `quantity` copies, or add `quantity` copies to an
    /// existing title of the same name.
    pub async fn add_or_restock(&self, name: &str, quantity: i32) -> AppResult<Book> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (name, quantity)
            VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE SET quantity = books.quantity + EXCLUDED.quantity
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(quantity)
        .fetch_one(&self.pool)
        .await?;

        Ok(book)
    }
}

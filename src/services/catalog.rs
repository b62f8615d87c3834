//! Catalog management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{AddBook, Book},
        borrowing::Borrowing,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List every title in the catalog
    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    /// Add a new title or restock an existing one by name
    pub async fn add_book(&self, request: AddBook) -> AppResult<Book> {
        request.validate()?;

        let name = request.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Book name is required".to_string()));
        }

        let book = self.repository.books.add_or_restock(name, request.quantity).await?;

        tracing::info!(
            "Stocked {} copies of '{}' (id={}, now {})",
            request.quantity,
            book.name,
            book.id,
            book.quantity
        );
        Ok(book)
    }

    /// Every borrowing ever recorded against a book
    pub async fn book_history(&self, book_id: i32) -> AppResult<Vec<Borrowing>> {
        self.repository.books.get_by_id(book_id).await?;
        self.repository.borrowings.list_by_book(book_id).await
    }
}

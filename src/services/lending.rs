//! Borrow / approve / reject / return workflow and dashboards

use crate::{
    error::AppResult,
    models::{
        book::Book,
        borrowing::{Borrowing, RequestAction},
        student::Student,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct LendingService {
    repository: Repository,
}

impl LendingService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a pending request for `book_id` on behalf of a student
    pub async fn request_borrow(&self, student_id: i32, book_id: i32) -> AppResult<Borrowing> {
        let borrowing = self
            .repository
            .borrowings
            .create_request(student_id, book_id)
            .await
            .inspect_err(|e| tracing::debug!("Borrow request by student {} refused: {}", student_id, e))?;

        tracing::info!(
            "Borrow request {} created: '{}' for {}",
            borrowing.id,
            borrowing.book_name,
            borrowing.student_name
        );
        Ok(borrowing)
    }

    /// Apply an admin decision to a pending request
    pub async fn handle_request(&self, borrow_id: i32, action: RequestAction) -> AppResult<Borrowing> {
        let result = match action {
            RequestAction::Approve => self.repository.borrowings.approve(borrow_id).await,
            RequestAction::Reject => self.repository.borrowings.reject(borrow_id).await,
        };

        match &result {
            Ok(borrowing) => tracing::info!(
                "Borrow request {} is now {} ('{}' for {})",
                borrowing.id,
                borrowing.status,
                borrowing.book_name,
                borrowing.student_name
            ),
            Err(e) => tracing::warn!("Could not {:?} borrow request {}: {}", action, borrow_id, e),
        }

        result
    }

    /// Return the student's current loan
    pub async fn return_book(&self, student_id: i32) -> AppResult<Borrowing> {
        let borrowing = self
            .repository
            .borrowings
            .return_book(student_id)
            .await
            .inspect_err(|e| tracing::debug!("Return by student {} refused: {}", student_id, e))?;

        tracing::info!("Borrowing {} returned ('{}')", borrowing.id, borrowing.book_name);
        Ok(borrowing)
    }

    /// Pending requests and the whole catalog
    pub async fn admin_dashboard(&self) -> AppResult<(Vec<Borrowing>, Vec<Book>)> {
        let pending = self.repository.borrowings.list_pending().await?;
        let books = self.repository.books.list().await?;
        Ok((pending, books))
    }

    /// The catalog and the book currently held by the student, if any
    pub async fn student_dashboard(&self, student: &Student) -> AppResult<(Vec<Book>, Option<Book>)> {
        let books = self.repository.books.list().await?;
        let borrowed_book = match student.borrowed_book_id {
            Some(book_id) => self.repository.books.find_by_id(book_id).await?,
            None => None,
        };
        Ok((books, borrowed_book))
    }

    /// Every request the student has made
    pub async fn student_history(&self, student_id: i32) -> AppResult<Vec<Borrowing>> {
        self.repository.borrowings.list_by_student(student_id).await
    }
}

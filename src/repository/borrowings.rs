//! Borrowings repository: borrow requests and their state transitions

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::Book,
        borrowing::{Borrowing, BorrowingStatus},
        student::Student,
    },
};

#[derive(Clone)]
pub struct BorrowingsRepository {
    pool: Pool<Postgres>,
}

impl BorrowingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get borrowing by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Borrowing> {
        sqlx::query_as::<_, Borrowing>("SELECT * FROM borrowings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrow request with id {} not found", id)))
    }

    /// All pending requests, oldest first
    pub async fn list_pending(&self) -> AppResult<Vec<Borrowing>> {
        let borrowings = sqlx::query_as::<_, Borrowing>(
            "SELECT * FROM borrowings WHERE status = $1 ORDER BY borrow_date, id",
        )
        .bind(BorrowingStatus::Pending)
        .fetch_all(&self.pool)
        .await?;

        Ok(borrowings)
    }

    /// Lending history of one book, newest first
    pub async fn list_by_book(&self, book_id: i32) -> AppResult<Vec<Borrowing>> {
        let borrowings = sqlx::query_as::<_, Borrowing>(
            "SELECT * FROM borrowings WHERE book_id = $1 ORDER BY borrow_date DESC, id DESC",
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(borrowings)
    }

    /// Lending history of one student, newest first
    pub async fn list_by_student(&self, student_id: i32) -> AppResult<Vec<Borrowing>> {
        let borrowings = sqlx::query_as::<_, Borrowing>(
            "SELECT * FROM borrowings WHERE student_id = $1 ORDER BY borrow_date DESC, id DESC",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(borrowings)
    }

    /// Create a pending borrow request. Quantity is not reserved until approval.
    pub async fn create_request(&self, student_id: i32, book_id: i32) -> AppResult<Borrowing> {
        let mut tx = self.pool.begin().await?;

        // Unknown books are a 404 even for a student who already holds one
        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(book_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", book_id)))?;

        let student = sqlx::query_as::<_, Student>("SELECT * FROM students WHERE id = $1 FOR UPDATE")
            .bind(student_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::Authentication("Student not found".to_string()))?;

        if student.has_book {
            return Err(AppError::BusinessRule("You already have a book borrowed".to_string()));
        }

        let borrowing = sqlx::query_as::<_, Borrowing>(
            r#"
            INSERT INTO borrowings (book_id, student_id, book_name, student_name, borrow_date, status)
            VALUES ($1, $2, $3, $4, NOW(), $5)
            RETURNING *
            "#,
        )
        .bind(book.id)
        .bind(student.id)
        .bind(&book.name)
        .bind(&student.name)
        .bind(BorrowingStatus::Pending)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(borrowing)
    }

    /// Approve a pending request: take one copy off the shelf and hand it to the student.
    ///
    /// The copy is taken with a conditional decrement so two concurrent approvals
    /// cannot both consume the last copy.
    pub async fn approve(&self, id: i32) -> AppResult<Borrowing> {
        let mut tx = self.pool.begin().await?;

        let borrowing = Self::lock(&mut tx, id).await?;
        let next = borrowing.status.transition_to(BorrowingStatus::Approved)?;

        let reserved = sqlx::query(
            "UPDATE books SET quantity = quantity - 1 WHERE id = $1 AND quantity > 0",
        )
        .bind(borrowing.book_id)
        .execute(&mut *tx)
        .await?;

        if reserved.rows_affected() == 0 {
            return Err(AppError::BusinessRule("Book not available".to_string()));
        }

        let assigned = sqlx::query(
            r#"
            UPDATE students SET has_book = TRUE, borrowed_book_id = $2
            WHERE id = $1 AND has_book = FALSE
            "#,
        )
        .bind(borrowing.student_id)
        .bind(borrowing.book_id)
        .execute(&mut *tx)
        .await?;

        if assigned.rows_affected() == 0 {
            return Err(AppError::BusinessRule(
                "Student already has a book borrowed".to_string(),
            ));
        }

        let approved = Self::set_status(&mut tx, id, next).await?;
        tx.commit().await?;

        Ok(approved)
    }

    /// Reject a pending request. No copies move.
    pub async fn reject(&self, id: i32) -> AppResult<Borrowing> {
        let mut tx = self.pool.begin().await?;

        let borrowing = Self::lock(&mut tx, id).await?;
        let next = borrowing.status.transition_to(BorrowingStatus::Rejected)?;

        let rejected = Self::set_status(&mut tx, id, next).await?;
        tx.commit().await?;

        Ok(rejected)
    }

    /// Return the student's current book: put the copy back and clear the loan.
    pub async fn return_book(&self, student_id: i32) -> AppResult<Borrowing> {
        let mut tx = self.pool.begin().await?;

        let student = sqlx::query_as::<_, Student>("SELECT * FROM students WHERE id = $1 FOR UPDATE")
            .bind(student_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::Authentication("Student not found".to_string()))?;

        let book_id = match (student.has_book, student.borrowed_book_id) {
            (true, Some(book_id)) => book_id,
            _ => return Err(AppError::BusinessRule("No book to return".to_string())),
        };

        let borrowing = sqlx::query_as::<_, Borrowing>(
            r#"
            SELECT * FROM borrowings
            WHERE student_id = $1 AND book_id = $2 AND status = $3
            ORDER BY id
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(student_id)
        .bind(book_id)
        .bind(BorrowingStatus::Approved)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::BusinessRule("No matching borrow record".to_string()))?;

        let next = borrowing.status.transition_to(BorrowingStatus::Returned)?;

        sqlx::query("UPDATE books SET quantity = quantity + 1 WHERE id = $1")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE students SET has_book = FALSE, borrowed_book_id = NULL WHERE id = $1")
            .bind(student_id)
            .execute(&mut *tx)
            .await?;

        let returned = Self::set_status(&mut tx, borrowing.id, next).await?;
        tx.commit().await?;

        Ok(returned)
    }

    async fn lock(tx: &mut sqlx::Transaction<'_, Postgres>, id: i32) -> AppResult<Borrowing> {
        sqlx::query_as::<_, Borrowing>("SELECT * FROM borrowings WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrow request with id {} not found", id)))
    }

    async fn set_status(
        tx: &mut sqlx::Transaction<'_, Postgres>,
        id: i32,
        status: BorrowingStatus,
    ) -> AppResult<Borrowing> {
        let borrowing = sqlx::query_as::<_, Borrowing>(
            "UPDATE borrowings SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_one(&mut **tx)
        .await?;

        Ok(borrowing)
    }
}

//! Student endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{book::Book, borrowing::Borrowing, student::Student},
    AppState,
};

use super::{AuthenticatedUser, BorrowingResponse, Path};

const DASHBOARD: &str = "/student/dashboard";

/// Student dashboard
#[derive(Serialize, ToSchema)]
pub struct StudentDashboard {
    pub student: Student,
    pub books: Vec<Book>,
    pub borrowed_book: Option<Book>,
}

/// Catalog plus the caller's current loan
#[utoipa::path(
    get,
    path = "/student/dashboard",
    tag = "student",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard", body = StudentDashboard),
        (status = 401, description = "Not authenticated or student not found"),
        (status = 403, description = "Student account required")
    )
)]
pub async fn dashboard(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<StudentDashboard>> {
    let student = state.services.auth.current_student(&claims).await?;

    let (books, borrowed_book) = state.services.lending.student_dashboard(&student).await?;
    Ok(Json(StudentDashboard {
        student,
        books,
        borrowed_book,
    }))
}

/// Ask to borrow a book
#[utoipa::path(
    get,
    path = "/student/borrow/{book_id}",
    tag = "student",
    security(("bearer_auth" = [])),
    params(
        ("book_id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 201, description = "Borrow request submitted", body = BorrowingResponse),
        (status = 404, description = "Book not found"),
        (status = 422, description = "Student already has a book")
    )
)]
pub async fn borrow(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<i32>,
) -> AppResult<(StatusCode, Json<BorrowingResponse>)> {
    let student_id = claims.require_student()?;

    let borrowing = state.services.lending.request_borrow(student_id, book_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(BorrowingResponse {
            message: "Borrow request submitted".to_string(),
            borrowing,
            redirect: DASHBOARD.to_string(),
        }),
    ))
}

/// Return the book currently held
#[utoipa::path(
    get,
    path = "/student/return",
    tag = "student",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Book returned", body = BorrowingResponse),
        (status = 422, description = "No book to return or no matching borrow record")
    )
)]
pub async fn return_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<BorrowingResponse>> {
    let student_id = claims.require_student()?;

    let borrowing = state.services.lending.return_book(student_id).await?;
    Ok(Json(BorrowingResponse {
        message: "Book returned successfully".to_string(),
        borrowing,
        redirect: DASHBOARD.to_string(),
    }))
}

/// The caller's borrowing history
#[utoipa::path(
    get,
    path = "/student/borrowings",
    tag = "student",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Borrowings, newest first", body = Vec<Borrowing>)
    )
)]
pub async fn history(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Borrowing>>> {
    let student_id = claims.require_student()?;

    let history = state.services.lending.student_history(student_id).await?;
    Ok(Json(history))
}

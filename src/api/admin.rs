//! Administrator endpoints

use axum::{
    extract::State,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        book::{AddBook, Book},
        borrowing::{Borrowing, RequestAction},
    },
    AppState,
};

use super::{AuthenticatedUser, BorrowingResponse, Path};

const DASHBOARD: &str = "/admin/dashboard";

/// Admin dashboard
#[derive(Serialize, ToSchema)]
pub struct AdminDashboard {
    pub pending_requests: Vec<Borrowing>,
    pub books: Vec<Book>,
}

/// Result of adding or restocking a book
#[derive(Serialize, ToSchema)]
pub struct BookResponse {
    pub message: String,
    pub book: Book,
    pub redirect: String,
}

/// Pending requests and the full catalog
#[utoipa::path(
    get,
    path = "/admin/dashboard",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard", body = AdminDashboard),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn dashboard(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<AdminDashboard>> {
    claims.require_admin()?;

    let (pending_requests, books) = state.services.lending.admin_dashboard().await?;
    Ok(Json(AdminDashboard { pending_requests, books }))
}

/// Add a new book or restock an existing title
#[utoipa::path(
    post,
    path = "/admin/add_book",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = AddBook,
    responses(
        (status = 200, description = "Book added", body = BookResponse),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn add_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<AddBook>,
) -> AppResult<Json<BookResponse>> {
    claims.require_admin()?;

    let book = state.services.catalog.add_book(request).await?;
    Ok(Json(BookResponse {
        message: "Book added successfully".to_string(),
        book,
        redirect: DASHBOARD.to_string(),
    }))
}

/// Approve or reject a pending borrow request
#[utoipa::path(
    get,
    path = "/admin/handle_request/{id}/{action}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrow request ID"),
        ("action" = String, Path, description = "approve or reject")
    ),
    responses(
        (status = 200, description = "Request handled", body = BorrowingResponse),
        (status = 400, description = "Unknown action"),
        (status = 404, description = "Borrow request not found"),
        (status = 422, description = "Book not available or request not pending")
    )
)]
pub async fn handle_request(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((id, action)): Path<(i32, String)>,
) -> AppResult<Json<BorrowingResponse>> {
    claims.require_admin()?;
    let action: RequestAction = action.parse()?;

    let borrowing = state.services.lending.handle_request(id, action).await?;
    let message = match action {
        RequestAction::Approve => "Request approved",
        RequestAction::Reject => "Request rejected",
    };

    Ok(Json(BorrowingResponse {
        message: message.to_string(),
        borrowing,
        redirect: DASHBOARD.to_string(),
    }))
}

/// Lending history of a book
#[utoipa::path(
    get,
    path = "/admin/books/{id}/borrowings",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Borrowings, newest first", body = Vec<Borrowing>),
        (status = 404, description = "Book not found")
    )
)]
pub async fn book_history(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<i32>,
) -> AppResult<Json<Vec<Borrowing>>> {
    claims.require_admin()?;

    let history = state.services.catalog.book_history(book_id).await?;
    Ok(Json(history))
}

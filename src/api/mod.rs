//! API handlers for the lending desk endpoints

pub mod admin;
pub mod auth;
pub mod health;
pub mod openapi;
pub mod student;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;

use crate::{error::AppError, models::{auth::Claims, borrowing::Borrowing}, AppState};

/// Extractor for the authenticated caller, verified from the bearer token
pub struct AuthenticatedUser(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Please log in first".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = Claims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// `axum::extract::Path` whose rejections render as the JSON error body
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct Path<T>(pub T);

/// Informational message, with where the client should go next
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
    pub redirect: String,
}

/// Outcome of a borrowing transition
#[derive(Serialize, ToSchema)]
pub struct BorrowingResponse {
    pub message: String,
    pub borrowing: Borrowing,
    pub redirect: String,
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        .route("/", get(auth::index))
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", get(auth::logout))
        // Admin
        .route("/admin/dashboard", get(admin::dashboard))
        .route("/admin/add_book", post(admin::add_book))
        .route(
            "/admin/handle_request/:id/:action",
            get(admin::handle_request).post(admin::handle_request),
        )
        .route("/admin/books/:id/borrowings", get(admin::book_history))
        // Student
        .route("/student/dashboard", get(student::dashboard))
        .route("/student/borrow/:book_id", get(student::borrow).post(student::borrow))
        .route("/student/return", get(student::return_book).post(student::return_book))
        .route("/student/borrowings", get(student::history))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

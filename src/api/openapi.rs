//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{admin, auth, health, student};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lending Desk API",
        version = "0.1.0",
        description = "Student book lending REST API"
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::register,
        auth::logout,
        // Admin
        admin::dashboard,
        admin::add_book,
        admin::handle_request,
        admin::book_history,
        // Student
        student::dashboard,
        student::borrow,
        student::return_book,
        student::history,
    ),
    components(
        schemas(
            // Auth
            crate::models::auth::LoginRequest,
            crate::models::auth::Role,
            auth::LoginResponse,
            auth::RegisterResponse,
            crate::models::student::RegisterStudent,
            crate::models::student::Student,
            // Catalog
            crate::models::book::Book,
            crate::models::book::AddBook,
            admin::BookResponse,
            // Borrowings
            crate::models::borrowing::Borrowing,
            crate::models::borrowing::BorrowingStatus,
            super::BorrowingResponse,
            super::MessageResponse,
            // Dashboards
            admin::AdminDashboard,
            student::StudentDashboard,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Login, registration and logout"),
        (name = "admin", description = "Catalog and borrow request administration"),
        (name = "student", description = "Borrowing and returning books")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

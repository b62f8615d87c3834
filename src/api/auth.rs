//! Login, registration and logout endpoints

use axum::{extract::State, http::StatusCode, response::Redirect, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        auth::{LoginRequest, Role},
        student::{RegisterStudent, Student},
    },
    AppState,
};

use super::MessageResponse;

/// Login response
#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    /// JWT to send as `Authorization: Bearer <token>`
    pub token: String,
    pub token_type: String,
    pub role: Role,
    /// Dashboard for this role
    pub redirect: String,
}

/// Registration response
#[derive(Serialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub student: Student,
    pub redirect: String,
}

/// Root path sends clients to the login endpoint
pub async fn index() -> Redirect {
    Redirect::temporary("/login")
}

/// Authenticate an admin or a student
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (token, role) = state.services.auth.login(&request).await?;

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        role,
        redirect: role.home().to_string(),
    }))
}

/// Register a new student
#[utoipa::path(
    post,
    path = "/register",
    tag = "auth",
    request_body = RegisterStudent,
    responses(
        (status = 201, description = "Registration successful", body = RegisterResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Roll number already exists")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterStudent>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let student = state.services.auth.register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registration successful".to_string(),
            student,
            redirect: "/login".to_string(),
        }),
    ))
}

/// Log out. Tokens are stateless, so the client discards its token.
#[utoipa::path(
    get,
    path = "/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse)
    )
)]
pub async fn logout() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Logged out".to_string(),
        redirect: "/login".to_string(),
    })
}

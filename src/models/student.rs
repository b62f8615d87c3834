//! Student model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Student row from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: i32,
    pub name: String,
    pub roll_number: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    pub has_book: bool,
    pub borrowed_book_id: Option<i32>,
}

/// Registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterStudent {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 20, message = "Roll number must be 1-20 characters"))]
    pub roll_number: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

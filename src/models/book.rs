//! Book (title) model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Book title with its count of copies currently on the shelf
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub name: String,
    pub quantity: i32,
}

impl Book {
    pub fn is_available(&self) -> bool {
        self.quantity > 0
    }
}

/// Add or restock request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddBook {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

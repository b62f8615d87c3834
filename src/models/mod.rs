//! Data models for the lending desk

pub mod admin;
pub mod auth;
pub mod book;
pub mod borrowing;
pub mod student;

// Re-export commonly used types
pub use admin::Admin;
pub use auth::{Claims, LoginRequest, Role};
pub use book::{AddBook, Book};
pub use borrowing::{Borrowing, BorrowingStatus, RequestAction};
pub use student::{RegisterStudent, Student};

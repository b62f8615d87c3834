//! Authentication types: roles, login payloads and JWT claims

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

/// Caller role, decides which routes are permitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Student => "student",
        }
    }

    /// Where a client should go after logging in with this role
    pub fn home(&self) -> &'static str {
        match self {
            Role::Admin => "/admin/dashboard",
            Role::Student => "/student/dashboard",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Login credentials, discriminated by `user_type`
#[derive(Debug, Deserialize, ToSchema)]
#[serde(tag = "user_type", rename_all = "lowercase")]
pub enum LoginRequest {
    Admin { username: String, password: String },
    Student { roll_number: String, password: String },
}

/// JWT claims for an authenticated caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Admin username or student roll number
    pub sub: String,
    pub user_id: i32,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse and verify a JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization("Administrator privileges required".to_string()))
        }
    }

    /// Require a student caller, returning the student id
    pub fn require_student(&self) -> Result<i32, AppError> {
        if self.role == Role::Student {
            Ok(self.user_id)
        } else {
            Err(AppError::Authorization("Student account required".to_string()))
        }
    }
}

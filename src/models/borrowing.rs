//! Borrowing (lending event) model and its status lifecycle

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;

use crate::error::AppError;

/// Borrowing status.
///
/// `pending -> approved -> returned`, or `pending -> rejected`.
/// `rejected` and `returned` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BorrowingStatus {
    Pending,
    Approved,
    Rejected,
    Returned,
}

impl BorrowingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BorrowingStatus::Pending => "pending",
            BorrowingStatus::Approved => "approved",
            BorrowingStatus::Rejected => "rejected",
            BorrowingStatus::Returned => "returned",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BorrowingStatus::Rejected | BorrowingStatus::Returned)
    }

    pub fn can_transition_to(&self, next: BorrowingStatus) -> bool {
        matches!(
            (self, next),
            (BorrowingStatus::Pending, BorrowingStatus::Approved)
                | (BorrowingStatus::Pending, BorrowingStatus::Rejected)
                | (BorrowingStatus::Approved, BorrowingStatus::Returned)
        )
    }

    /// Validate a transition, returning the new status
    pub fn transition_to(&self, next: BorrowingStatus) -> Result<BorrowingStatus, AppError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(AppError::BusinessRule(format!(
                "Request is already {}",
                self.as_str()
            )))
        }
    }
}

impl std::fmt::Display for BorrowingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BorrowingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(BorrowingStatus::Pending),
            "approved" => Ok(BorrowingStatus::Approved),
            "rejected" => Ok(BorrowingStatus::Rejected),
            "returned" => Ok(BorrowingStatus::Returned),
            _ => Err(format!("Invalid borrowing status: {}", s)),
        }
    }
}

// SQLx conversion for BorrowingStatus (stored as TEXT)
impl sqlx::Type<Postgres> for BorrowingStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for BorrowingStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for BorrowingStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Admin decision on a pending request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestAction {
    Approve,
    Reject,
}

impl RequestAction {
    pub fn target_status(&self) -> BorrowingStatus {
        match self {
            RequestAction::Approve => BorrowingStatus::Approved,
            RequestAction::Reject => BorrowingStatus::Rejected,
        }
    }
}

impl std::str::FromStr for RequestAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(RequestAction::Approve),
            "reject" => Ok(RequestAction::Reject),
            other => Err(AppError::BadRequest(format!(
                "Unknown action '{}', expected 'approve' or 'reject'",
                other
            ))),
        }
    }
}

/// Borrowing row from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Borrowing {
    pub id: i32,
    pub book_id: i32,
    pub student_id: i32,
    pub book_name: String,
    pub student_name: String,
    pub borrow_date: DateTime<Utc>,
    pub status: BorrowingStatus,
}

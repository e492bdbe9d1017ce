//! Borrow (checkout) model and related types

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::object_id::ObjectId;
use crate::error::{AppError, AppResult};

/// Borrow record from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Borrow {
    #[serde(rename = "_id")]
    #[schema(value_type = String, example = "64b7f0c2a1d3e4f5a6b7c8da")]
    pub id: ObjectId,
    /// Borrowed book
    #[serde(rename = "book")]
    #[schema(value_type = String, example = "64b7f0c2a1d3e4f5a6b7c8d9")]
    pub book_id: ObjectId,
    pub quantity: i32,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Borrow request body. Every field is optional here so that a missing
/// field is reported with the borrow-specific message.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRequest {
    /// Book ID
    pub book: Option<String>,
    /// Number of copies to borrow
    pub quantity: Option<i64>,
    /// Due date (RFC 3339 timestamp or YYYY-MM-DD)
    pub due_date: Option<String>,
}

/// Validated borrow ready for execution
#[derive(Debug, Clone, PartialEq)]
pub struct NewBorrow {
    pub id: ObjectId,
    pub book_id: ObjectId,
    pub quantity: i32,
    pub due_date: DateTime<Utc>,
}

impl TryFrom<BorrowRequest> for NewBorrow {
    type Error = AppError;

    fn try_from(request: BorrowRequest) -> Result<Self, Self::Error> {
        let (book, quantity, due_date) = match (request.book, request.quantity, request.due_date) {
            (Some(book), Some(quantity), Some(due_date))
                if !book.is_empty() && quantity != 0 && !due_date.is_empty() =>
            {
                (book, quantity, due_date)
            }
            _ => {
                return Err(AppError::InvalidInput(
                    "Missing required fields: book, quantity, dueDate".to_string(),
                ))
            }
        };

        if quantity < 1 {
            return Err(AppError::InvalidInput("Quantity must be at least 1".to_string()));
        }
        let quantity = i32::try_from(quantity)
            .map_err(|_| AppError::InvalidInput(format!("Quantity too large: {}", quantity)))?;

        Ok(NewBorrow {
            id: ObjectId::new(),
            book_id: book.parse()?,
            quantity,
            due_date: parse_due_date(&due_date)?,
        })
    }
}

/// Accept a full timestamp or a bare calendar date (midnight UTC)
pub fn parse_due_date(raw: &str) -> AppResult<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| Utc.from_utc_datetime(&dt))
        .ok_or_else(|| AppError::InvalidInput(format!("Invalid dueDate: {}", raw)))
}

/// Title and ISBN of a summarized book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookRef {
    pub title: String,
    pub isbn: String,
}

/// Total quantity borrowed for one book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowSummary {
    pub book: BookRef,
    pub total_quantity: i64,
}

//! Book (catalog entry) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::{BookSortField, Genre, SortDirection};
use super::object_id::ObjectId;
use crate::error::{collect_field_errors, AppError, AppResult, FieldError, FieldErrors};

/// Book model from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(rename = "_id")]
    #[schema(value_type = String, example = "64b7f0c2a1d3e4f5a6b7c8d9")]
    pub id: ObjectId,
    pub title: String,
    pub author: String,
    pub genre: Genre,
    pub isbn: String,
    pub description: Option<String>,
    pub copies: i32,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Take `quantity` copies off the shelf, keeping `available` in step.
    pub fn checkout(&mut self, quantity: i32) -> AppResult<()> {
        if quantity < 1 {
            return Err(AppError::InvalidInput("Quantity must be at least 1".to_string()));
        }
        if self.copies < quantity {
            return Err(AppError::InsufficientCopies {
                available: self.copies,
                requested: quantity,
            });
        }
        self.copies -= quantity;
        self.available = self.copies > 0;
        Ok(())
    }
}

/// Create book request
///
/// `genre` and `copies` are kept raw so a bad value is reported against its
/// field instead of rejecting the whole body.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(
        required(message = "Title is required"),
        length(min = 1, message = "Title is required")
    )]
    pub title: Option<String>,
    #[validate(
        required(message = "Author is required"),
        length(min = 1, message = "Author is required")
    )]
    pub author: Option<String>,
    #[validate(required(message = "Genre is required"))]
    #[schema(value_type = Option<Genre>)]
    pub genre: Option<String>,
    #[validate(
        required(message = "ISBN is required"),
        length(min = 1, message = "ISBN is required")
    )]
    pub isbn: Option<String>,
    pub description: Option<String>,
    #[validate(required(message = "Copies is required"))]
    #[schema(value_type = Option<i32>)]
    pub copies: Option<Value>,
}

/// Validated book ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub id: ObjectId,
    pub title: String,
    pub author: String,
    pub genre: Genre,
    pub isbn: String,
    pub description: Option<String>,
    pub copies: i32,
    pub available: bool,
}

fn check_genre(raw: &str, errors: &mut FieldErrors) -> Option<Genre> {
    let genre = raw.parse::<Genre>().ok();
    if genre.is_none() {
        errors.insert(
            "genre".to_string(),
            FieldError::new(format!("`{}` is not a valid genre", raw), "enum"),
        );
    }
    genre
}

/// Accepts whole JSON numbers and numeric strings
fn check_copies(raw: &Value, errors: &mut FieldErrors) -> Option<i32> {
    let parsed = match raw {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    match parsed.and_then(|n| i32::try_from(n).ok()) {
        Some(n) if n >= 0 => Some(n),
        Some(_) => {
            errors.insert(
                "copies".to_string(),
                FieldError::new("Copies must be a non-negative number", "range"),
            );
            None
        }
        None => {
            errors.insert(
                "copies".to_string(),
                FieldError::new(format!("Copies must be a whole number, got {}", raw), "type"),
            );
            None
        }
    }
}

/// Run the derived checks, then the ones on raw fields
fn validate_fields<T: Validate>(
    request: &T,
    genre: Option<&str>,
    copies: Option<&Value>,
) -> AppResult<(Option<Genre>, Option<i32>)> {
    let mut errors = match request.validate() {
        Ok(()) => FieldErrors::new(),
        Err(e) => collect_field_errors(&e),
    };
    let genre = genre.and_then(|raw| check_genre(raw, &mut errors));
    let copies = copies.and_then(|raw| check_copies(raw, &mut errors));

    if errors.is_empty() {
        Ok((genre, copies))
    } else {
        Err(AppError::Validation(errors))
    }
}

impl TryFrom<CreateBook> for NewBook {
    type Error = AppError;

    fn try_from(request: CreateBook) -> Result<Self, Self::Error> {
        let (genre, copies) =
            validate_fields(&request, request.genre.as_deref(), request.copies.as_ref())?;

        // validate_fields guarantees every required field is present
        let missing =
            |field: &str| AppError::Internal(format!("{} missing after validation", field));
        let copies = copies.ok_or_else(|| missing("copies"))?;

        Ok(NewBook {
            id: ObjectId::new(),
            title: request.title.ok_or_else(|| missing("title"))?,
            author: request.author.ok_or_else(|| missing("author"))?,
            genre: genre.ok_or_else(|| missing("genre"))?,
            isbn: request.isbn.ok_or_else(|| missing("isbn"))?,
            description: request.description,
            copies,
            available: copies > 0,
        })
    }
}

/// Partial book update request; absent fields are left untouched and an
/// explicit `"description": null` clears the description
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Author cannot be empty"))]
    pub author: Option<String>,
    #[schema(value_type = Option<Genre>)]
    pub genre: Option<String>,
    #[validate(length(min = 1, message = "ISBN cannot be empty"))]
    pub isbn: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[schema(value_type = Option<i32>)]
    pub copies: Option<Value>,
}

/// Validated partial update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<Genre>,
    pub isbn: Option<String>,
    /// `Some(None)` clears the description
    pub description: Option<Option<String>>,
    pub copies: Option<i32>,
}

impl TryFrom<UpdateBook> for BookPatch {
    type Error = AppError;

    fn try_from(request: UpdateBook) -> Result<Self, Self::Error> {
        let (genre, copies) =
            validate_fields(&request, request.genre.as_deref(), request.copies.as_ref())?;

        Ok(BookPatch {
            title: request.title,
            author: request.author,
            genre,
            isbn: request.isbn,
            description: request.description,
            copies,
        })
    }
}

/// Raw query string for book listings
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Genre filter
    pub filter: Option<String>,
    /// Field to sort by (default: createdAt)
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default: desc)
    pub sort: Option<String>,
    /// Maximum number of results (default: 10, 0 for no cap)
    pub limit: Option<String>,
}

/// Listing parameters after validation
#[derive(Debug, Clone, PartialEq)]
pub struct BookListOptions {
    pub genre: Option<Genre>,
    pub sort_by: BookSortField,
    pub direction: SortDirection,
    pub limit: Option<i64>,
}

pub const DEFAULT_LIST_LIMIT: i64 = 10;

impl Default for BookListOptions {
    fn default() -> Self {
        Self {
            genre: None,
            sort_by: BookSortField::default(),
            direction: SortDirection::default(),
            limit: Some(DEFAULT_LIST_LIMIT),
        }
    }
}

impl TryFrom<&BookQuery> for BookListOptions {
    type Error = AppError;

    fn try_from(query: &BookQuery) -> Result<Self, Self::Error> {
        let genre = query.filter.as_deref().map(str::parse::<Genre>).transpose()?;

        let sort_by = query
            .sort_by
            .as_deref()
            .map(str::parse::<BookSortField>)
            .transpose()?
            .unwrap_or_default();

        let direction = query
            .sort
            .as_deref()
            .map(SortDirection::from_param)
            .unwrap_or_default();

        let limit = match query.limit.as_deref() {
            None => Some(DEFAULT_LIST_LIMIT),
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(0) => None,
                Ok(n) if n > 0 => Some(n),
                _ => {
                    return Err(AppError::InvalidInput(format!("Invalid limit: {}", raw)));
                }
            },
        };

        Ok(Self {
            genre,
            sort_by,
            direction,
            limit,
        })
    }
}

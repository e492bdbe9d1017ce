//! Shared domain enums

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

// ---------------------------------------------------------------------------
// Genre
// ---------------------------------------------------------------------------

/// Book genre classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "book_genre", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Genre {
    Fiction,
    NonFiction,
    Science,
    History,
    Biography,
    Fantasy,
}

impl Genre {
    pub const ALL: [Genre; 6] = [
        Genre::Fiction,
        Genre::NonFiction,
        Genre::Science,
        Genre::History,
        Genre::Biography,
        Genre::Fantasy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Genre::Fiction => "FICTION",
            Genre::NonFiction => "NON_FICTION",
            Genre::Science => "SCIENCE",
            Genre::History => "HISTORY",
            Genre::Biography => "BIOGRAPHY",
            Genre::Fantasy => "FANTASY",
        }
    }
}

impl std::str::FromStr for Genre {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Genre::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| AppError::InvalidInput("Invalid genre filter".to_string()))
    }
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Book fields a listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookSortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
    Author,
    Genre,
    Isbn,
    Copies,
    Available,
}

impl BookSortField {
    /// Column backing this field
    pub fn column(self) -> &'static str {
        match self {
            BookSortField::CreatedAt => "created_at",
            BookSortField::UpdatedAt => "updated_at",
            BookSortField::Title => "title",
            BookSortField::Author => "author",
            BookSortField::Genre => "genre",
            BookSortField::Isbn => "isbn",
            BookSortField::Copies => "copies",
            BookSortField::Available => "available",
        }
    }
}

impl std::str::FromStr for BookSortField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "createdAt" => Ok(BookSortField::CreatedAt),
            "updatedAt" => Ok(BookSortField::UpdatedAt),
            "title" => Ok(BookSortField::Title),
            "author" => Ok(BookSortField::Author),
            "genre" => Ok(BookSortField::Genre),
            "isbn" => Ok(BookSortField::Isbn),
            "copies" => Ok(BookSortField::Copies),
            "available" => Ok(BookSortField::Available),
            other => Err(AppError::InvalidInput(format!("Invalid sort field: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Anything other than `asc` sorts descending
    pub fn from_param(s: &str) -> Self {
        if s == "asc" {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

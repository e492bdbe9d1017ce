//! Book (catalog) endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::{ApiJson, ApiQuery, ApiResponse};
use crate::{
    error::{AppResult, ErrorResponse},
    models::{Book, BookQuery, CreateBook, UpdateBook},
    AppState,
};

/// Create a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 409, description = "Duplicate ISBN", body = ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateBook>,
) -> AppResult<(StatusCode, Json<ApiResponse<Book>>)> {
    let book = state.services.catalog.create_book(request).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::new("Book created successfully", book),
    ))
}

/// List books with optional genre filter and sorting
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "List of books", body = Vec<Book>),
        (status = 400, description = "Invalid filter, sort field or limit", body = ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<BookQuery>,
) -> AppResult<Json<ApiResponse<Vec<Book>>>> {
    let books = state.services.catalog.list_books(&query).await?;
    Ok(ApiResponse::new("Books retrieved successfully", books))
}

/// Get a book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID (24 hex characters)")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 400, description = "Malformed ID", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Book>>> {
    let book = state.services.catalog.get_book(&id).await?;
    Ok(ApiResponse::new("Book retrieved successfully", book))
}

/// Update an existing book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID (24 hex characters)")
    ),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Malformed ID or invalid fields", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse),
        (status = 409, description = "Duplicate ISBN", body = ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<UpdateBook>,
) -> AppResult<Json<ApiResponse<Book>>> {
    let book = state.services.catalog.update_book(&id, patch).await?;
    Ok(ApiResponse::new("Book updated successfully", book))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID (24 hex characters)")
    ),
    responses(
        (status = 200, description = "Book deleted"),
        (status = 400, description = "Malformed ID", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.services.catalog.delete_book(&id).await?;
    Ok(ApiResponse::new("Book deleted successfully", ()))
}

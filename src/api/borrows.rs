//! Borrow endpoints

use axum::{extract::State, http::StatusCode, Json};

use super::{ApiJson, ApiResponse};
use crate::{
    error::{AppResult, ErrorResponse},
    models::{Borrow, BorrowRequest, BorrowSummary},
    AppState,
};

/// Borrow copies of a book
#[utoipa::path(
    post,
    path = "/borrow",
    tag = "borrow",
    request_body = BorrowRequest,
    responses(
        (status = 201, description = "Book borrowed", body = Borrow),
        (
            status = 400,
            description = "Missing fields, invalid quantity or not enough copies",
            body = ErrorResponse
        ),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn borrow_book(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<BorrowRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Borrow>>)> {
    let borrow = state.services.borrows.borrow_book(request).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::new("Book borrowed successfully", borrow),
    ))
}

/// Total borrowed quantity per book
#[utoipa::path(
    get,
    path = "/borrow",
    tag = "borrow",
    responses(
        (status = 200, description = "Borrowed books summary", body = Vec<BorrowSummary>)
    )
)]
pub async fn borrow_summary(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<BorrowSummary>>>> {
    let summary = state.services.borrows.summary().await?;
    Ok(ApiResponse::new("Borrowed books summary retrieved successfully", summary))
}

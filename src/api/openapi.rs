//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, borrows, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library API",
        version = "0.1.0",
        description = "Book catalog and borrowing REST API. Every response is wrapped in \
                       `{success, message, data}`; errors use `{success, message, error}`."
    ),
    servers(
        (url = "/api", description = "API")
    ),
    paths(
        // Books
        books::create_book,
        books::list_books,
        books::get_book,
        books::update_book,
        books::delete_book,
        // Borrow
        borrows::borrow_book,
        borrows::borrow_summary,
        // Health
        health::health_check,
    ),
    components(
        schemas(
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::enums::Genre,
            // Borrow
            crate::models::borrow::Borrow,
            crate::models::borrow::BorrowRequest,
            crate::models::borrow::BorrowSummary,
            crate::models::borrow::BookRef,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
            crate::error::ErrorBody,
            crate::error::FieldError,
        )
    ),
    tags(
        (name = "books", description = "Book catalog management"),
        (name = "borrow", description = "Borrowing and borrow summary"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_all_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in ["/books", "/books/{id}", "/borrow", "/health"] {
            assert!(paths.iter().any(|p| *p == expected), "missing {}", expected);
        }
    }
}

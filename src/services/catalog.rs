//! Catalog management service

use crate::{
    error::{AppError, AppResult},
    models::{
        Book, BookListOptions, BookPatch, BookQuery, CreateBook, NewBook, ObjectId, UpdateBook,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

fn book_not_found() -> AppError {
    AppError::NotFound("Book not found".to_string())
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a new book
    pub async fn create_book(&self, request: CreateBook) -> AppResult<Book> {
        let book = NewBook::try_from(request)?;
        let created = self.repository.books.create(&book).await?;
        tracing::info!("Catalog: created book id={} isbn={}", created.id, created.isbn);
        Ok(created)
    }

    /// List books with optional genre filter, sorting and cap
    pub async fn list_books(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let options = BookListOptions::try_from(query)?;
        self.repository.books.list(&options).await
    }

    /// Get a book by ID
    pub async fn get_book(&self, id: &str) -> AppResult<Book> {
        let id: ObjectId = id.parse()?;
        self.repository
            .books
            .get_by_id(&id)
            .await?
            .ok_or_else(book_not_found)
    }

    /// Apply a partial update to a book
    pub async fn update_book(&self, id: &str, patch: UpdateBook) -> AppResult<Book> {
        let id: ObjectId = id.parse()?;
        let patch = BookPatch::try_from(patch)?;

        let updated = self
            .repository
            .books
            .update(&id, &patch)
            .await?
            .ok_or_else(book_not_found)?;
        tracing::info!("Catalog: updated book id={}", updated.id);
        Ok(updated)
    }

    /// Delete a book
    pub async fn delete_book(&self, id: &str) -> AppResult<()> {
        let id: ObjectId = id.parse()?;
        if !self.repository.books.delete(&id).await? {
            return Err(book_not_found());
        }
        tracing::info!("Catalog: deleted book id={}", id);
        Ok(())
    }
}

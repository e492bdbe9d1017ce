//! Repository layer for database operations
//!
//! Services talk to the store through the [`BookRepository`] and
//! [`BorrowRepository`] traits; the PostgreSQL implementations live in the
//! submodules.

pub mod books;
pub mod borrows;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        Book, BookListOptions, BookPatch, Borrow, BorrowSummary, NewBook, NewBorrow, ObjectId,
    },
};

/// Storage for the book catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Insert a new book and return the stored record
    async fn create(&self, book: &NewBook) -> AppResult<Book>;

    /// Books matching `options`, sorted and capped
    async fn list(&self, options: &BookListOptions) -> AppResult<Vec<Book>>;

    async fn get_by_id(&self, id: &ObjectId) -> AppResult<Option<Book>>;

    /// Apply a partial update; `None` when no book has this id
    async fn update(&self, id: &ObjectId, patch: &BookPatch) -> AppResult<Option<Book>>;

    /// Returns false when no book has this id
    async fn delete(&self, id: &ObjectId) -> AppResult<bool>;
}

/// Storage for borrow records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BorrowRepository: Send + Sync {
    /// Take copies off the referenced book and record the borrow as one unit.
    ///
    /// Fails with `NotFound` when the book does not exist and with
    /// `InsufficientCopies` when it has fewer copies than requested; neither
    /// write takes effect in those cases.
    async fn try_borrow(&self, borrow: &NewBorrow) -> AppResult<Borrow>;

    /// Total borrowed quantity per existing book
    async fn summary(&self) -> AppResult<Vec<BorrowSummary>>;
}

/// Main repository struct holding the store handles
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn BookRepository>,
    pub borrows: Arc<dyn BorrowRepository>,
}

impl Repository {
    pub fn new(books: Arc<dyn BookRepository>, borrows: Arc<dyn BorrowRepository>) -> Self {
        Self { books, borrows }
    }

    /// Create PostgreSQL-backed repositories sharing the given pool
    pub fn postgres(pool: Pool<Postgres>) -> Self {
        Self {
            books: Arc::new(books::BooksRepository::new(pool.clone())),
            borrows: Arc::new(borrows::BorrowsRepository::new(pool)),
        }
    }
}

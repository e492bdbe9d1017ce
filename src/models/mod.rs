//! Data models for the library server

pub mod book;
pub mod borrow;
pub mod enums;
pub mod object_id;

// Re-export commonly used types
pub use book::{Book, BookListOptions, BookPatch, BookQuery, CreateBook, NewBook, UpdateBook};
pub use borrow::{BookRef, Borrow, BorrowRequest, BorrowSummary, NewBorrow};
pub use enums::{BookSortField, Genre, SortDirection};
pub use object_id::ObjectId;

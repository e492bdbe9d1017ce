//! Borrow management service

use crate::{
    error::AppResult,
    models::{Borrow, BorrowRequest, BorrowSummary, NewBorrow},
    repository::Repository,
};

#[derive(Clone)]
pub struct BorrowsService {
    repository: Repository,
}

impl BorrowsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Borrow copies of a book
    pub async fn borrow_book(&self, request: BorrowRequest) -> AppResult<Borrow> {
        let borrow = NewBorrow::try_from(request)?;
        let created = self.repository.borrows.try_borrow(&borrow).await?;
        tracing::info!(
            "Borrow: book id={} quantity={} due={}",
            created.book_id,
            created.quantity,
            created.due_date
        );
        Ok(created)
    }

    /// Total borrowed quantity per book
    pub async fn summary(&self) -> AppResult<Vec<BorrowSummary>> {
        self.repository.borrows.summary().await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use chrono::Utc;

    use super::*;
    use crate::{
        error::AppError,
        models::{Book, BookRef, Genre, ObjectId},
        repository::{MockBookRepository, MockBorrowRepository},
    };

    const BOOK_ID: &str = "64b7f0c2a1d3e4f5a6b7c8d9";

    fn service(borrows: MockBorrowRepository) -> BorrowsService {
        BorrowsService::new(Repository::new(
            Arc::new(MockBookRepository::new()),
            Arc::new(borrows),
        ))
    }

    fn request(quantity: i64) -> BorrowRequest {
        BorrowRequest {
            book: Some(BOOK_ID.to_string()),
            quantity: Some(quantity),
            due_date: Some("2025-08-01".to_string()),
        }
    }

    fn book_with(copies: i32) -> Book {
        Book {
            id: BOOK_ID.parse().unwrap(),
            title: "The Hobbit".to_string(),
            author: "J.R.R. Tolkien".to_string(),
            genre: Genre::Fantasy,
            isbn: "9780547928227".to_string(),
            description: None,
            copies,
            available: copies > 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// Borrow store backed by one shared book, applying the same checkout rule
    fn shelf_backed(book: Arc<Mutex<Book>>) -> MockBorrowRepository {
        let mut borrows = MockBorrowRepository::new();
        borrows.expect_try_borrow().returning(move |new_borrow| {
            let mut book = book.lock().unwrap();
            if book.id != new_borrow.book_id {
                return Err(AppError::NotFound("Book not found".to_string()));
            }
            book.checkout(new_borrow.quantity)?;
            Ok(Borrow {
                id: new_borrow.id.clone(),
                book_id: new_borrow.book_id.clone(),
                quantity: new_borrow.quantity,
                due_date: new_borrow.due_date,
                created_at: Utc::now(),
            })
        });
        borrows
    }

    #[tokio::test]
    async fn test_zero_quantity_never_reaches_store() {
        let service = service(MockBorrowRepository::new());
        let err = service.borrow_book(request(0)).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_missing_due_date_never_reaches_store() {
        let service = service(MockBorrowRepository::new());
        let mut req = request(1);
        req.due_date = None;
        assert!(matches!(service.borrow_book(req).await, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_successful_borrow_decrements_copies() {
        let book = Arc::new(Mutex::new(book_with(5)));
        let service = service(shelf_backed(book.clone()));

        let borrow = service.borrow_book(request(2)).await.unwrap();
        assert_eq!(borrow.quantity, 2);
        assert_eq!(borrow.book_id.as_str(), BOOK_ID);

        let book = book.lock().unwrap();
        assert_eq!(book.copies, 3);
        assert!(book.available);
    }

    #[tokio::test]
    async fn test_borrowing_last_copies_marks_unavailable() {
        let book = Arc::new(Mutex::new(book_with(2)));
        let service = service(shelf_backed(book.clone()));

        service.borrow_book(request(2)).await.unwrap();

        let book = book.lock().unwrap();
        assert_eq!(book.copies, 0);
        assert!(!book.available);
    }

    #[tokio::test]
    async fn test_insufficient_copies_leaves_book_unchanged() {
        let book = Arc::new(Mutex::new(book_with(1)));
        let service = service(shelf_backed(book.clone()));

        let err = service.borrow_book(request(3)).await.unwrap_err();
        assert!(matches!(err, AppError::InsufficientCopies { available: 1, requested: 3 }));
        assert_eq!(book.lock().unwrap().copies, 1);
    }

    #[tokio::test]
    async fn test_unknown_book() {
        let mut other = book_with(3);
        other.id = ObjectId::new();
        let service = service(shelf_backed(Arc::new(Mutex::new(other))));

        let err = service.borrow_book(request(1)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_summary_returns_store_rows_unchanged() {
        let mut borrows = MockBorrowRepository::new();
        borrows.expect_summary().returning(|| {
            Ok(vec![
                BorrowSummary {
                    book: BookRef {
                        title: "Book B".to_string(),
                        isbn: "222".to_string(),
                    },
                    total_quantity: 1,
                },
                BorrowSummary {
                    book: BookRef {
                        title: "Book A".to_string(),
                        isbn: "111".to_string(),
                    },
                    total_quantity: 5,
                },
            ])
        });

        let summary = service(borrows).summary().await.unwrap();
        let totals: HashMap<String, i64> = summary
            .into_iter()
            .map(|s| (s.book.isbn, s.total_quantity))
            .collect();
        assert_eq!(totals, HashMap::from([("111".to_string(), 5), ("222".to_string(), 1)]));
    }
}

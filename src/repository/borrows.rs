//! Borrows repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};

use super::BorrowRepository;
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookRef, Borrow, BorrowSummary, NewBorrow},
};

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: Pool<Postgres>,
}

impl BorrowsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BorrowRepository for BorrowsRepository {
    async fn try_borrow(&self, borrow: &NewBorrow) -> AppResult<Borrow> {
        let mut tx = self.pool.begin().await?;

        // The row lock serializes concurrent borrows of the same book
        let mut book = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, title, author, genre, isbn, description, copies, available, created_at, updated_at
            FROM books
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(&borrow.book_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

        // Dropping `tx` on error rolls the transaction back
        book.checkout(borrow.quantity)?;

        sqlx::query(
            "UPDATE books SET copies = $2, available = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(&book.id)
        .bind(book.copies)
        .bind(book.available)
        .execute(&mut *tx)
        .await?;

        let created = sqlx::query_as::<_, Borrow>(
            r#"
            INSERT INTO borrows (id, book_id, quantity, due_date, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING id, book_id, quantity, due_date, created_at
            "#,
        )
        .bind(&borrow.id)
        .bind(&borrow.book_id)
        .bind(borrow.quantity)
        .bind(borrow.due_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn summary(&self) -> AppResult<Vec<BorrowSummary>> {
        // Inner join: borrows of deleted books are left out
        let rows = sqlx::query(
            r#"
            SELECT b.title, b.isbn, SUM(br.quantity)::BIGINT AS total_quantity
            FROM borrows br
            JOIN books b ON b.id = br.book_id
            GROUP BY b.id, b.title, b.isbn
            ORDER BY b.title
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| BorrowSummary {
                book: BookRef {
                    title: r.get("title"),
                    isbn: r.get("isbn"),
                },
                total_quantity: r.get("total_quantity"),
            })
            .collect())
    }
}

//! Books repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres, QueryBuilder};

use super::BookRepository;
use crate::{
    error::AppResult,
    models::{Book, BookListOptions, BookPatch, NewBook, ObjectId},
};

const BOOK_COLUMNS: &str =
    "id, title, author, genre, isbn, description, copies, available, created_at, updated_at";

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for BooksRepository {
    async fn create(&self, book: &NewBook) -> AppResult<Book> {
        let created = sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (id, title, author, genre, isbn, description, copies, available, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW(), NOW())
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&book.id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.genre)
        .bind(&book.isbn)
        .bind(&book.description)
        .bind(book.copies)
        .bind(book.available)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list(&self, options: &BookListOptions) -> AppResult<Vec<Book>> {
        let mut query =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM books", BOOK_COLUMNS));

        if let Some(genre) = options.genre {
            query.push(" WHERE genre = ").push_bind(genre);
        }

        // Column and direction come from closed enums, never from raw input
        let direction = options.direction.as_sql();
        query.push(format!(
            " ORDER BY {} {}, id {}",
            options.sort_by.column(),
            direction,
            direction
        ));

        if let Some(limit) = options.limit {
            query.push(" LIMIT ").push_bind(limit);
        }

        let books = query
            .build_query_as::<Book>()
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    async fn get_by_id(&self, id: &ObjectId) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE id = $1",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    async fn update(&self, id: &ObjectId, patch: &BookPatch) -> AppResult<Option<Book>> {
        // `available` is recomputed from the resulting copy count.
        // $6 says whether the description is being set, possibly to NULL.
        let book = sqlx::query_as::<_, Book>(&format!(
            r#"
            UPDATE books SET
                title = COALESCE($2, title),
                author = COALESCE($3, author),
                genre = COALESCE($4, genre),
                isbn = COALESCE($5, isbn),
                description = CASE WHEN $6 THEN $7 ELSE description END,
                copies = COALESCE($8, copies),
                available = COALESCE($8, copies) > 0,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.author)
        .bind(patch.genre)
        .bind(&patch.isbn)
        .bind(patch.description.is_some())
        .bind(patch.description.as_ref().and_then(|d| d.as_deref()))
        .bind(patch.copies)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    async fn delete(&self, id: &ObjectId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

//! Books repository for database operations

use async_trait::async_trait;
use sqlx::{FromRow, Pool, Postgres};

use super::BookStore;
use crate::{
    error::{AppError, AppResult},
    models::{Author, Book, BookSortKey, Page, PageRequest, SortDirection},
};

const SELECT_BOOKS: &str = r#"
    SELECT b.isbn, b.title, a.id AS author_id, a.name AS author_name, a.age AS author_age
    FROM books b
    LEFT JOIN authors a ON a.id = b.author_id
"#;

/// Book joined with its author
#[derive(Debug, FromRow)]
struct BookRow {
    isbn: String,
    title: Option<String>,
    author_id: Option<i64>,
    author_name: Option<String>,
    author_age: Option<i32>,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        let author = row.author_id.map(|id| Author {
            id: Some(id),
            name: row.author_name,
            age: row.author_age,
        });
        Book {
            isbn: row.isbn,
            title: row.title,
            author,
        }
    }
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl BookStore for BooksRepository {
    async fn get(&self, isbn: &str) -> AppResult<Option<Book>> {
        let query = format!("{} WHERE b.isbn = $1", SELECT_BOOKS);
        let row = sqlx::query_as::<_, BookRow>(&query)
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Book::from))
    }

    async fn get_all(&self) -> AppResult<Vec<Book>> {
        let query = format!("{} ORDER BY b.isbn", SELECT_BOOKS);
        let rows = sqlx::query_as::<_, BookRow>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn get_all_paged(&self, request: PageRequest) -> AppResult<Page<Book>> {
        let total = self.count().await?;

        // Column and direction come from closed enums, never from raw input
        let (column, direction) = match request.sort {
            Some(sort) => (sort.property.column(), sort.direction),
            None => (BookSortKey::Isbn.column(), SortDirection::Asc),
        };
        let query = format!(
            "{} ORDER BY {} {}, b.isbn LIMIT $1 OFFSET $2",
            SELECT_BOOKS,
            column,
            direction.as_sql()
        );

        let offset = i64::try_from(request.offset())
            .map_err(|_| AppError::BadRequest(format!("{} is out of range", request)))?;

        let rows = sqlx::query_as::<_, BookRow>(&query)
            .bind(i64::from(request.size))
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let content = rows.into_iter().map(Book::from).collect();
        Ok(Page::new(content, &request, total.max(0) as u64))
    }

    async fn exists(&self, isbn: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1)")
            .bind(isbn)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn save(&self, book: Book) -> AppResult<Book> {
        sqlx::query(
            r#"
            INSERT INTO books (isbn, title, author_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (isbn) DO UPDATE SET title = EXCLUDED.title, author_id = EXCLUDED.author_id
            "#,
        )
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(book.author_id())
        .execute(&self.pool)
        .await?;

        self.get(&book.isbn)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Book {} vanished after save", book.isbn)))
    }

    async fn delete(&self, isbn: &str) -> AppResult<()> {
        sqlx::query("DELETE FROM books WHERE isbn = $1")
            .bind(isbn)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

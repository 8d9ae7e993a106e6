//! Book service

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Book, Page, PageRequest},
    repository::{AuthorStore, BookStore},
};

#[derive(Clone)]
pub struct BooksService {
    books: Arc<dyn BookStore>,
    authors: Arc<dyn AuthorStore>,
}

impl BooksService {
    pub fn new(books: Arc<dyn BookStore>, authors: Arc<dyn AuthorStore>) -> Self {
        Self { books, authors }
    }

    /// Store `book` under `isbn`, replacing any book already there.
    ///
    /// The isbn argument wins over `book.isbn`. An embedded author is saved
    /// first so the book can reference its id.
    pub async fn upsert(&self, isbn: &str, mut book: Book) -> AppResult<Book> {
        book.isbn = isbn.to_string();

        if let Some(author) = book.author.take() {
            let author = self.authors.save(author).await?;
            tracing::debug!("Saved author id={:?} for book {}", author.id, isbn);
            book.author = Some(author);
        }

        let saved = self.books.save(book).await?;
        tracing::debug!("Saved book {}", isbn);
        Ok(saved)
    }

    pub async fn find_all(&self) -> AppResult<Vec<Book>> {
        self.books.get_all().await
    }

    pub async fn find_all_paged(&self, request: PageRequest) -> AppResult<Page<Book>> {
        self.books.get_all_paged(request).await
    }

    pub async fn find_one(&self, isbn: &str) -> AppResult<Option<Book>> {
        self.books.get(isbn).await
    }

    pub async fn exists_by_isbn(&self, isbn: &str) -> AppResult<bool> {
        self.books.exists(isbn).await
    }

    /// Replace the title if `patch` sets one. The author is left as stored.
    pub async fn partial_update(&self, isbn: &str, mut patch: Book) -> AppResult<Book> {
        patch.isbn = isbn.to_string();

        let mut existing = self
            .books
            .get(isbn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", isbn)))?;

        existing.merge(patch);
        let saved = self.books.save(existing).await?;
        tracing::debug!("Partially updated book {}", isbn);
        Ok(saved)
    }

    pub async fn delete(&self, isbn: &str) -> AppResult<()> {
        self.books.delete(isbn).await?;
        tracing::info!("Deleted book {}", isbn);
        Ok(())
    }
}

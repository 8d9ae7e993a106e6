//! Repository layer for database operations
//!
//! Each resource has a store trait so services can run against PostgreSQL or
//! the in-memory backend.

pub mod authors;
pub mod books;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{Author, Book, Page, PageRequest},
};

pub use authors::AuthorsRepository;
pub use books::BooksRepository;
pub use memory::{InMemoryAuthors, InMemoryBooks};

/// Authors keyed by a store-assigned numeric id
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorStore: Send + Sync {
    async fn get(&self, id: i64) -> AppResult<Option<Author>>;

    /// Every author, ordered by id
    async fn get_all(&self) -> AppResult<Vec<Author>>;

    async fn exists(&self, id: i64) -> AppResult<bool>;

    /// Insert when `author.id` is `None`, otherwise insert-or-replace that id
    async fn save(&self, author: Author) -> AppResult<Author>;

    /// Deleting a missing id is not an error
    async fn delete(&self, id: i64) -> AppResult<()>;

    async fn find_by_age_less_than(&self, age: i32) -> AppResult<Vec<Author>>;

    async fn find_by_age_greater_than(&self, age: i32) -> AppResult<Vec<Author>>;
}

/// Books keyed by their caller-supplied ISBN
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn get(&self, isbn: &str) -> AppResult<Option<Book>>;

    /// Every book, ordered by isbn
    async fn get_all(&self) -> AppResult<Vec<Book>>;

    async fn get_all_paged(&self, request: PageRequest) -> AppResult<Page<Book>>;

    async fn exists(&self, isbn: &str) -> AppResult<bool>;

    /// Insert-or-replace by isbn. Only the author's id is persisted.
    async fn save(&self, book: Book) -> AppResult<Book>;

    async fn delete(&self, isbn: &str) -> AppResult<()>;
}

/// Store handles shared by all services
#[derive(Clone)]
pub struct Repository {
    pub authors: Arc<dyn AuthorStore>,
    pub books: Arc<dyn BookStore>,
}

impl Repository {
    /// Create a repository backed by the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: Arc::new(AuthorsRepository::new(pool.clone())),
            books: Arc::new(BooksRepository::new(pool)),
        }
    }

    /// Create a repository that keeps everything in process memory
    pub fn in_memory() -> Self {
        let authors = InMemoryAuthors::new();
        Self {
            books: Arc::new(InMemoryBooks::new(&authors)),
            authors: Arc::new(authors),
        }
    }
}

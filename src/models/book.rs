//! Book model and related types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::author::{Author, AuthorDto};

/// Book as stored in the database, keyed by ISBN
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Book {
    pub isbn: String,
    pub title: Option<String>,
    /// Persisted as a foreign key, loaded by value on reads
    pub author: Option<Author>,
}

impl Book {
    pub fn new(isbn: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            isbn: isbn.into(),
            title: Some(title.into()),
            author: None,
        }
    }

    pub fn with_author(mut self, author: Author) -> Self {
        self.author = Some(author);
        self
    }

    pub fn author_id(&self) -> Option<i64> {
        self.author.as_ref().and_then(|a| a.id)
    }

    /// Copy the title from `patch` if it is set.
    ///
    /// The author relation is not merged.
    pub fn merge(&mut self, patch: Book) {
        if let Some(title) = patch.title {
            self.title = Some(title);
        }
    }
}

/// Book wire representation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookDto {
    pub isbn: Option<String>,
    pub title: Option<String>,
    pub author: Option<AuthorDto>,
}

impl From<BookDto> for Book {
    fn from(dto: BookDto) -> Self {
        Self {
            isbn: dto.isbn.unwrap_or_default(),
            title: dto.title,
            author: dto.author.map(Author::from),
        }
    }
}

impl From<Book> for BookDto {
    fn from(book: Book) -> Self {
        Self {
            isbn: Some(book.isbn),
            title: book.title,
            author: book.author.map(AuthorDto::from),
        }
    }
}

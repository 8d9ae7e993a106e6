//! Business logic services

pub mod authors;
pub mod books;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub authors: authors::AuthorsService,
    pub books: books::BooksService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            authors: authors::AuthorsService::new(repository.authors.clone()),
            books: books::BooksService::new(repository.books, repository.authors),
        }
    }
}

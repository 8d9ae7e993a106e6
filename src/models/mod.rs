//! Data models for Bookshelf

pub mod author;
pub mod book;
pub mod pagination;

// Re-export commonly used types
pub use author::{Author, AuthorDto, AuthorQuery};
pub use book::{Book, BookDto};
pub use pagination::{BookSortKey, Page, PageQuery, PageRequest, Sort, SortDirection};

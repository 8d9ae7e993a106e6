//! In-memory stores
//!
//! Both stores share one set of tables behind a single lock. Books keep only
//! the author id, like the `books.author_id` column, and resolve the author
//! on every read. Deleting an author clears that id from its books, the way
//! `ON DELETE SET NULL` does.

use std::{cmp::Ordering, collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{AuthorStore, BookStore};
use crate::{
    error::{AppError, AppResult},
    models::{Author, Book, BookSortKey, Page, PageRequest, SortDirection},
};

#[derive(Debug, Clone)]
struct BookRecord {
    title: Option<String>,
    author_id: Option<i64>,
}

#[derive(Debug)]
struct Tables {
    authors: BTreeMap<i64, Author>,
    next_author_id: i64,
    books: BTreeMap<String, BookRecord>,
}

impl Tables {
    fn resolve(&self, isbn: &str, record: &BookRecord) -> Book {
        Book {
            isbn: isbn.to_string(),
            title: record.title.clone(),
            author: record
                .author_id
                .and_then(|id| self.authors.get(&id).cloned()),
        }
    }
}

type SharedTables = Arc<RwLock<Tables>>;

#[derive(Debug)]
pub struct InMemoryAuthors {
    tables: SharedTables,
}

impl InMemoryAuthors {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables {
                authors: BTreeMap::new(),
                next_author_id: 1,
                books: BTreeMap::new(),
            })),
        }
    }

    async fn filter<F>(&self, predicate: F) -> Vec<Author>
    where
        F: Fn(&Author) -> bool,
    {
        let tables = self.tables.read().await;
        tables.authors.values().filter(|a| predicate(*a)).cloned().collect()
    }
}

impl Default for InMemoryAuthors {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthorStore for InMemoryAuthors {
    async fn get(&self, id: i64) -> AppResult<Option<Author>> {
        Ok(self.tables.read().await.authors.get(&id).cloned())
    }

    async fn get_all(&self) -> AppResult<Vec<Author>> {
        Ok(self.tables.read().await.authors.values().cloned().collect())
    }

    async fn exists(&self, id: i64) -> AppResult<bool> {
        Ok(self.tables.read().await.authors.contains_key(&id))
    }

    async fn save(&self, mut author: Author) -> AppResult<Author> {
        let mut tables = self.tables.write().await;
        let id = author.id.unwrap_or(tables.next_author_id);
        let following = id
            .checked_add(1)
            .ok_or_else(|| AppError::BadRequest(format!("Author id {} is out of range", id)))?;

        tables.next_author_id = tables.next_author_id.max(following);
        author.id = Some(id);
        tables.authors.insert(id, author.clone());
        Ok(author)
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if tables.authors.remove(&id).is_some() {
            for record in tables.books.values_mut() {
                if record.author_id == Some(id) {
                    record.author_id = None;
                }
            }
        }
        Ok(())
    }

    async fn find_by_age_less_than(&self, age: i32) -> AppResult<Vec<Author>> {
        Ok(self.filter(|a| a.age.is_some_and(|n| n < age)).await)
    }

    async fn find_by_age_greater_than(&self, age: i32) -> AppResult<Vec<Author>> {
        Ok(self.filter(|a| a.age.is_some_and(|n| n > age)).await)
    }
}

#[derive(Debug)]
pub struct InMemoryBooks {
    tables: SharedTables,
}

impl InMemoryBooks {
    /// Book store sharing tables with `authors`
    pub fn new(authors: &InMemoryAuthors) -> Self {
        Self {
            tables: authors.tables.clone(),
        }
    }
}

/// Nulls sort last ascending and first descending, as in PostgreSQL
fn compare_titles(a: &Option<String>, b: &Option<String>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
    }
}

#[async_trait]
impl BookStore for InMemoryBooks {
    async fn get(&self, isbn: &str) -> AppResult<Option<Book>> {
        let tables = self.tables.read().await;
        Ok(tables
            .books
            .get(isbn)
            .map(|record| tables.resolve(isbn, record)))
    }

    async fn get_all(&self) -> AppResult<Vec<Book>> {
        let tables = self.tables.read().await;
        Ok(tables
            .books
            .iter()
            .map(|(isbn, record)| tables.resolve(isbn, record))
            .collect())
    }

    async fn get_all_paged(&self, request: PageRequest) -> AppResult<Page<Book>> {
        let tables = self.tables.read().await;
        let mut ordered: Vec<(&String, &BookRecord)> = tables.books.iter().collect();

        if let Some(sort) = request.sort {
            ordered.sort_by(|(a_isbn, a), (b_isbn, b)| {
                let primary = match sort.property {
                    BookSortKey::Isbn => a_isbn.cmp(b_isbn),
                    BookSortKey::Title => compare_titles(&a.title, &b.title),
                };
                let primary = match sort.direction {
                    SortDirection::Asc => primary,
                    SortDirection::Desc => primary.reverse(),
                };
                primary.then_with(|| a_isbn.cmp(b_isbn))
            });
        }

        let total = ordered.len() as u64;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let content = ordered
            .into_iter()
            .skip(offset)
            .take(request.size as usize)
            .map(|(isbn, record)| tables.resolve(isbn, record))
            .collect();

        Ok(Page::new(content, &request, total))
    }

    async fn exists(&self, isbn: &str) -> AppResult<bool> {
        Ok(self.tables.read().await.books.contains_key(isbn))
    }

    async fn save(&self, book: Book) -> AppResult<Book> {
        let mut tables = self.tables.write().await;
        let author_id = book.author_id();
        if let Some(id) = author_id {
            if !tables.authors.contains_key(&id) {
                return Err(AppError::BadRequest(format!("Author {} does not exist", id)));
            }
        }

        let record = BookRecord {
            title: book.title,
            author_id,
        };
        let saved = tables.resolve(&book.isbn, &record);
        tables.books.insert(book.isbn, record);
        Ok(saved)
    }

    async fn delete(&self, isbn: &str) -> AppResult<()> {
        self.tables.write().await.books.remove(isbn);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sort;

    fn stores() -> (InMemoryAuthors, InMemoryBooks) {
        let authors = InMemoryAuthors::new();
        let books = InMemoryBooks::new(&authors);
        (authors, books)
    }

    #[tokio::test]
    async fn author_ids_are_assigned_in_order() {
        let (authors, _) = stores();
        let a = authors.save(Author::new("abigail", 80)).await.unwrap();
        let b = authors.save(Author::new("Thomas", 45)).await.unwrap();
        assert_eq!(a.id, Some(1));
        assert_eq!(b.id, Some(2));
        assert_eq!(authors.get(1).await.unwrap(), Some(a));
    }

    #[tokio::test]
    async fn explicit_id_advances_counter() {
        let (authors, _) = stores();
        authors
            .save(Author {
                id: Some(10),
                ..Author::new("Jesse", 24)
            })
            .await
            .unwrap();
        let next = authors.save(Author::new("abigail", 80)).await.unwrap();
        assert_eq!(next.id, Some(11));
    }

    #[tokio::test]
    async fn age_filters() {
        let (authors, _) = stores();
        let a = authors.save(Author::new("abigail", 80)).await.unwrap();
        let b = authors.save(Author::new("Thomas", 45)).await.unwrap();
        let c = authors.save(Author::new("Jesse", 24)).await.unwrap();

        assert_eq!(authors.find_by_age_less_than(50).await.unwrap(), vec![b, c]);
        assert_eq!(authors.find_by_age_greater_than(50).await.unwrap(), vec![a]);
    }

    #[tokio::test]
    async fn books_follow_author_changes() {
        let (authors, books) = stores();
        let author = authors.save(Author::new("abigail", 80)).await.unwrap();
        books
            .save(Book::new("123-832-78", "TITANIC").with_author(author.clone()))
            .await
            .unwrap();

        authors
            .save(Author {
                name: Some("Abigail".into()),
                ..author.clone()
            })
            .await
            .unwrap();
        let book = books.get("123-832-78").await.unwrap().unwrap();
        assert_eq!(book.author.unwrap().name.as_deref(), Some("Abigail"));

        authors.delete(author.id.unwrap()).await.unwrap();
        let book = books.get("123-832-78").await.unwrap().unwrap();
        assert_eq!(book.author, None);

        // A new author reusing the id must not pick up the old book
        authors
            .save(Author {
                id: author.id,
                ..Author::new("stranger", 1)
            })
            .await
            .unwrap();
        let book = books.get("123-832-78").await.unwrap().unwrap();
        assert_eq!(book.author, None);
    }

    #[tokio::test]
    async fn largest_explicit_id_is_rejected() {
        let (authors, _) = stores();
        let result = authors
            .save(Author {
                id: Some(i64::MAX),
                ..Author::new("abigail", 80)
            })
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert!(!authors.exists(i64::MAX).await.unwrap());

        let next = authors.save(Author::new("Thomas", 45)).await.unwrap();
        assert_eq!(next.id, Some(1));

        let near_max = authors
            .save(Author {
                id: Some(i64::MAX - 1),
                ..Author::new("Jesse", 24)
            })
            .await
            .unwrap();
        assert_eq!(near_max.id, Some(i64::MAX - 1));
    }

    #[tokio::test]
    async fn book_requires_existing_author() {
        let (_, books) = stores();
        let ghost = Author {
            id: Some(7),
            ..Author::new("ghost", 1)
        };
        let result = books
            .save(Book::new("123-832-78", "TITANIC").with_author(ghost))
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert!(!books.exists("123-832-78").await.unwrap());
    }

    #[tokio::test]
    async fn paged_titles_descending() {
        let (_, books) = stores();
        for (isbn, title) in [("1", "b"), ("2", "a"), ("3", "c"), ("4", "d")] {
            books.save(Book::new(isbn, title)).await.unwrap();
        }
        books
            .save(Book {
                isbn: "5".into(),
                title: None,
                author: None,
            })
            .await
            .unwrap();

        let sort: Sort = "title,desc".parse().unwrap();
        let page = books
            .get_all_paged(PageRequest::new(0, 3).sorted(sort))
            .await
            .unwrap();
        let isbns: Vec<_> = page.content.iter().map(|b| b.isbn.as_str()).collect();
        assert_eq!(isbns, vec!["5", "4", "3"]);
        assert_eq!(page.total_elements, 5);
        assert_eq!(page.total_pages, 2);

        let page = books
            .get_all_paged(PageRequest::new(1, 3).sorted(sort))
            .await
            .unwrap();
        let isbns: Vec<_> = page.content.iter().map(|b| b.isbn.as_str()).collect();
        assert_eq!(isbns, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn delete_missing_is_ok() {
        let (authors, books) = stores();
        authors.delete(42).await.unwrap();
        books.delete("nope").await.unwrap();
        assert!(!books.exists("nope").await.unwrap());
    }
}

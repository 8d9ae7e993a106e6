//! PostgreSQL store tests
//!
//! Run with: DATABASE_URL=postgres://... cargo test --test postgres_store -- --ignored --test-threads=1

use bookshelf_server::{
    models::{Author, Book, PageRequest},
    repository::{AuthorStore, AuthorsRepository, BookStore, BooksRepository},
};
use sqlx::{postgres::PgPoolOptions, PgPool};

async fn pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("Failed to connect to database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    sqlx::query("TRUNCATE books, authors RESTART IDENTITY")
        .execute(&pool)
        .await
        .expect("Failed to reset tables");
    pool
}

#[tokio::test]
#[ignore]
async fn test_author_can_be_created_and_recalled() {
    let authors = AuthorsRepository::new(pool().await);

    let saved = authors.save(Author::new("abigail", 80)).await.unwrap();
    let id = saved.id.expect("id assigned");

    assert_eq!(authors.get(id).await.unwrap(), Some(saved));
    assert!(authors.exists(id).await.unwrap());
}

#[tokio::test]
#[ignore]
async fn test_author_can_be_updated_and_deleted() {
    let authors = AuthorsRepository::new(pool().await);

    let mut saved = authors.save(Author::new("abigail", 80)).await.unwrap();
    saved.name = Some("UPDATED".into());
    let updated = authors.save(saved.clone()).await.unwrap();
    assert_eq!(updated, saved);

    let id = saved.id.unwrap();
    authors.delete(id).await.unwrap();
    assert_eq!(authors.get(id).await.unwrap(), None);
}

#[tokio::test]
#[ignore]
async fn test_explicit_author_id_keeps_sequence_ahead() {
    let authors = AuthorsRepository::new(pool().await);

    authors
        .save(Author {
            id: Some(10),
            ..Author::new("Jesse", 24)
        })
        .await
        .unwrap();
    let next = authors.save(Author::new("Thomas", 45)).await.unwrap();
    assert_eq!(next.id, Some(11));
}

#[tokio::test]
#[ignore]
async fn test_authors_by_age() {
    let authors = AuthorsRepository::new(pool().await);

    let a = authors.save(Author::new("abigail", 80)).await.unwrap();
    let b = authors.save(Author::new("Thomas", 45)).await.unwrap();
    let c = authors.save(Author::new("Jesse", 24)).await.unwrap();

    assert_eq!(authors.find_by_age_less_than(50).await.unwrap(), vec![b, c]);
    assert_eq!(authors.find_by_age_greater_than(50).await.unwrap(), vec![a]);
}

#[tokio::test]
#[ignore]
async fn test_book_joins_author() {
    let pool = pool().await;
    let authors = AuthorsRepository::new(pool.clone());
    let books = BooksRepository::new(pool);

    let author = authors.save(Author::new("abigail", 80)).await.unwrap();
    let book = Book::new("123-832-78", "TITANIC").with_author(author.clone());
    let saved = books.save(book.clone()).await.unwrap();
    assert_eq!(saved, book);

    let mut replaced = book.clone();
    replaced.title = Some("NEW TITLE".into());
    books.save(replaced.clone()).await.unwrap();
    assert_eq!(books.get("123-832-78").await.unwrap(), Some(replaced));

    books.delete("123-832-78").await.unwrap();
    assert!(!books.exists("123-832-78").await.unwrap());
}

#[tokio::test]
#[ignore]
async fn test_books_paged() {
    let books = BooksRepository::new(pool().await);

    for (isbn, title) in [
        ("123-832-78", "TITANIC"),
        ("456-832-78", "The Shadow in the Attic"),
        ("789-832-78", "Sense and Sensebility"),
    ] {
        books.save(Book::new(isbn, title)).await.unwrap();
    }

    let page = books.get_all_paged(PageRequest::new(1, 2)).await.unwrap();
    assert_eq!(page.total_elements, 3);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.content.len(), 1);
    assert_eq!(page.content[0].isbn, "789-832-78");
}

//! Authors repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::AuthorStore;
use crate::{error::AppResult, models::Author};

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn insert(&self, author: &Author) -> AppResult<Author> {
        let row = sqlx::query_as::<_, Author>(
            "INSERT INTO authors (name, age) VALUES ($1, $2) RETURNING id, name, age",
        )
        .bind(&author.name)
        .bind(author.age)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn upsert(&self, id: i64, author: &Author) -> AppResult<Author> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (id, name, age)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, age = EXCLUDED.age
            RETURNING id, name, age
            "#,
        )
        .bind(id)
        .bind(&author.name)
        .bind(author.age)
        .fetch_one(&mut *tx)
        .await?;

        // An explicit id bypasses the sequence; move it past the highest id in use
        sqlx::query(
            "SELECT setval(pg_get_serial_sequence('authors', 'id'), GREATEST((SELECT MAX(id) FROM authors), 1))",
        )
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row)
    }
}

#[async_trait]
impl AuthorStore for AuthorsRepository {
    async fn get(&self, id: i64) -> AppResult<Option<Author>> {
        let row = sqlx::query_as::<_, Author>("SELECT id, name, age FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_all(&self) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>("SELECT id, name, age FROM authors ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn exists(&self, id: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM authors WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn save(&self, author: Author) -> AppResult<Author> {
        match author.id {
            Some(id) => self.upsert(id, &author).await,
            None => self.insert(&author).await,
        }
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_by_age_less_than(&self, age: i32) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>(
            "SELECT id, name, age FROM authors WHERE age < $1 ORDER BY id",
        )
        .bind(age)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_by_age_greater_than(&self, age: i32) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>(
            "SELECT id, name, age FROM authors WHERE age > $1 ORDER BY id",
        )
        .bind(age)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

//! Author service

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::Author,
    repository::AuthorStore,
};

#[derive(Clone)]
pub struct AuthorsService {
    store: Arc<dyn AuthorStore>,
}

impl AuthorsService {
    pub fn new(store: Arc<dyn AuthorStore>) -> Self {
        Self { store }
    }

    /// Create when the author has no id, replace otherwise
    pub async fn save(&self, author: Author) -> AppResult<Author> {
        let saved = self.store.save(author).await?;
        tracing::debug!("Saved author id={:?}", saved.id);
        Ok(saved)
    }

    pub async fn find_all(&self) -> AppResult<Vec<Author>> {
        self.store.get_all().await
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Author>> {
        self.store.get(id).await
    }

    pub async fn exists_by_id(&self, id: i64) -> AppResult<bool> {
        self.store.exists(id).await
    }

    /// Merge the fields set in `patch` into the stored author.
    ///
    /// Fails with `NotFound` without writing anything if `id` is unknown.
    pub async fn partial_update(&self, id: i64, mut patch: Author) -> AppResult<Author> {
        patch.id = Some(id);

        let mut existing = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))?;

        existing.merge(patch);
        let saved = self.store.save(existing).await?;
        tracing::debug!("Partially updated author id={}", id);
        Ok(saved)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.store.delete(id).await?;
        tracing::info!("Deleted author id={}", id);
        Ok(())
    }

    /// Authors strictly younger than `age`
    pub async fn find_younger_than(&self, age: i32) -> AppResult<Vec<Author>> {
        self.store.find_by_age_less_than(age).await
    }

    /// Authors strictly older than `age`
    pub async fn find_older_than(&self, age: i32) -> AppResult<Vec<Author>> {
        self.store.find_by_age_greater_than(age).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockAuthorStore;
    use mockall::predicate::eq;

    fn abigail() -> Author {
        Author {
            id: Some(1),
            name: Some("abigail".into()),
            age: Some(80),
        }
    }

    #[tokio::test]
    async fn save_returns_assigned_id() {
        let mut store = MockAuthorStore::new();
        store
            .expect_save()
            .withf(|a| a.id.is_none())
            .times(1)
            .returning(|a| Ok(Author { id: Some(1), ..a }));

        let service = AuthorsService::new(Arc::new(store));
        let saved = service.save(Author::new("abigail", 80)).await.unwrap();
        assert_eq!(saved, abigail());
    }

    #[tokio::test]
    async fn partial_update_merges_present_fields() {
        let mut store = MockAuthorStore::new();
        store
            .expect_get()
            .with(eq(1))
            .times(1)
            .returning(|_| Ok(Some(abigail())));
        store
            .expect_save()
            .withf(|a| {
                a.id == Some(1) && a.name.as_deref() == Some("UPDATED") && a.age == Some(80)
            })
            .times(1)
            .returning(Ok);

        let service = AuthorsService::new(Arc::new(store));
        let patch = Author {
            id: Some(7),
            name: Some("UPDATED".into()),
            age: None,
        };
        let updated = service.partial_update(1, patch).await.unwrap();
        assert_eq!(updated.id, Some(1));
        assert_eq!(updated.name.as_deref(), Some("UPDATED"));
        assert_eq!(updated.age, Some(80));
    }

    #[tokio::test]
    async fn partial_update_of_missing_author_writes_nothing() {
        let mut store = MockAuthorStore::new();
        store.expect_get().returning(|_| Ok(None));
        store.expect_save().never();

        let service = AuthorsService::new(Arc::new(store));
        let result = service.partial_update(5, Author::new("ghost", 1)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn age_queries_delegate_to_store() {
        let mut store = MockAuthorStore::new();
        store
            .expect_find_by_age_less_than()
            .with(eq(50))
            .returning(|_| Ok(vec![]));
        store
            .expect_find_by_age_greater_than()
            .with(eq(50))
            .returning(|_| Ok(vec![abigail()]));

        let service = AuthorsService::new(Arc::new(store));
        assert!(service.find_younger_than(50).await.unwrap().is_empty());
        assert_eq!(service.find_older_than(50).await.unwrap(), vec![abigail()]);
    }
}

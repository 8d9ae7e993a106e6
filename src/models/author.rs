//! Author model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// Author as stored in the database
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow)]
pub struct Author {
    /// Assigned by the store on first save
    pub id: Option<i64>,
    pub name: Option<String>,
    pub age: Option<i32>,
}

impl Author {
    pub fn new(name: impl Into<String>, age: i32) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            age: Some(age),
        }
    }

    /// Copy every field that is set in `patch` onto `self`.
    ///
    /// The id is never taken from the patch.
    pub fn merge(&mut self, patch: Author) {
        if let Some(name) = patch.name {
            self.name = Some(name);
        }
        if let Some(age) = patch.age {
            self.age = Some(age);
        }
    }
}

/// Author wire representation
///
/// Missing and `null` fields both deserialize to `None`, which PATCH treats as
/// "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthorDto {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub age: Option<i32>,
}

impl From<AuthorDto> for Author {
    fn from(dto: AuthorDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            age: dto.age,
        }
    }
}

impl From<Author> for AuthorDto {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            name: author.name,
            age: author.age,
        }
    }
}

/// Filters accepted by `GET /authors`
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuthorQuery {
    /// Only authors strictly younger than this age
    pub age_lt: Option<i32>,
    /// Only authors strictly older than this age
    pub age_gt: Option<i32>,
}

//! Author endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorDto, AuthorQuery},
    AppState,
};

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Author {} not found", id))
}

/// Create an author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    request_body = AuthorDto,
    responses(
        (status = 201, description = "Author created", body = AuthorDto)
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    Json(author): Json<AuthorDto>,
) -> AppResult<(StatusCode, Json<AuthorDto>)> {
    let saved = state.services.authors.save(Author::from(author)).await?;
    Ok((StatusCode::CREATED, Json(saved.into())))
}

/// List authors, optionally filtered by age
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    params(AuthorQuery),
    responses(
        (status = 200, description = "List of authors", body = Vec<AuthorDto>),
        (status = 400, description = "Conflicting filters", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_authors(
    State(state): State<AppState>,
    Query(query): Query<AuthorQuery>,
) -> AppResult<Json<Vec<AuthorDto>>> {
    let authors = match (query.age_lt, query.age_gt) {
        (None, None) => state.services.authors.find_all().await?,
        (Some(age), None) => state.services.authors.find_younger_than(age).await?,
        (None, Some(age)) => state.services.authors.find_older_than(age).await?,
        (Some(_), Some(_)) => {
            return Err(AppError::BadRequest(
                "age_lt and age_gt cannot be combined".to_string(),
            ));
        }
    };
    Ok(Json(authors.into_iter().map(AuthorDto::from).collect()))
}

/// Get author by ID
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i64, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = AuthorDto),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AuthorDto>> {
    let author = state
        .services
        .authors
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(author.into()))
}

/// Replace an existing author
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i64, Path, description = "Author ID")),
    request_body = AuthorDto,
    responses(
        (status = 202, description = "Author replaced", body = AuthorDto),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn full_update_author(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(mut author): Json<AuthorDto>,
) -> AppResult<(StatusCode, Json<AuthorDto>)> {
    if !state.services.authors.exists_by_id(id).await? {
        return Err(not_found(id));
    }
    author.id = Some(id);
    let saved = state.services.authors.save(Author::from(author)).await?;
    Ok((StatusCode::ACCEPTED, Json(saved.into())))
}

/// Update only the fields present in the body
#[utoipa::path(
    patch,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i64, Path, description = "Author ID")),
    request_body = AuthorDto,
    responses(
        (status = 200, description = "Author updated", body = AuthorDto),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn partial_update_author(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<AuthorDto>,
) -> AppResult<Json<AuthorDto>> {
    let updated = state
        .services
        .authors
        .partial_update(id, Author::from(patch))
        .await?;
    Ok(Json(updated.into()))
}

/// Delete an author
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i64, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    if !state.services.authors.exists_by_id(id).await? {
        return Err(not_found(id));
    }
    state.services.authors.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

//! Book endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookDto, Page, PageQuery, PageRequest},
    AppState,
};

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
#[aliases(PaginatedBooks = PaginatedResponse<BookDto>)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Items on this page
    pub content: Vec<T>,
    /// Total number of items across all pages
    pub total_elements: u64,
    /// Total number of pages
    pub total_pages: u32,
    /// Zero-based page index
    pub page: u32,
    /// Items per page
    pub size: u32,
}

impl<T> From<Page<T>> for PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    fn from(page: Page<T>) -> Self {
        Self {
            content: page.content,
            total_elements: page.total_elements,
            total_pages: page.total_pages,
            page: page.page,
            size: page.size,
        }
    }
}

/// Body of `GET /books`: the full list, or one page when paging was requested
#[derive(Serialize, ToSchema)]
#[serde(untagged)]
pub enum BookListing {
    All(Vec<BookDto>),
    Paged(PaginatedBooks),
}

fn not_found(isbn: &str) -> AppError {
    AppError::NotFound(format!("Book {} not found", isbn))
}

/// Create or replace a book
///
/// Responds 201 when the ISBN was new and 202 when an existing book was
/// replaced. Both cases store the body the same way.
#[utoipa::path(
    put,
    path = "/books/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "Book ISBN")),
    request_body = BookDto,
    responses(
        (status = 201, description = "Book created", body = BookDto),
        (status = 202, description = "Book replaced", body = BookDto)
    )
)]
pub async fn upsert_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
    Json(book): Json<BookDto>,
) -> AppResult<(StatusCode, Json<BookDto>)> {
    let existed = state.services.books.exists_by_isbn(&isbn).await?;
    let saved = state.services.books.upsert(&isbn, Book::from(book)).await?;

    let status = if existed {
        StatusCode::ACCEPTED
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(saved.into())))
}

/// List books
///
/// Without paging parameters the full list is returned. With `page`, `size`
/// or `sort` a page object is returned instead.
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(PageQuery),
    responses(
        (status = 200, description = "All books, or one page of books when paging parameters are given", body = BookListing),
        (status = 400, description = "Invalid sort", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<BookListing>> {
    if !query.is_paged() {
        let books = state.services.books.find_all().await?;
        let books = books.into_iter().map(BookDto::from).collect();
        return Ok(Json(BookListing::All(books)));
    }

    let request = PageRequest::try_from(&query)?;
    let page = state.services.books.find_all_paged(request).await?;
    Ok(Json(BookListing::Paged(PaginatedResponse::from(
        page.map(BookDto::from),
    ))))
}

/// Get book by ISBN
#[utoipa::path(
    get,
    path = "/books/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "Book ISBN")),
    responses(
        (status = 200, description = "Book details", body = BookDto),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> AppResult<Json<BookDto>> {
    let book = state
        .services
        .books
        .find_one(&isbn)
        .await?
        .ok_or_else(|| not_found(&isbn))?;
    Ok(Json(book.into()))
}

/// Update the title of a book
#[utoipa::path(
    patch,
    path = "/books/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "Book ISBN")),
    request_body = BookDto,
    responses(
        (status = 200, description = "Book updated", body = BookDto),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn partial_update_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
    Json(patch): Json<BookDto>,
) -> AppResult<Json<BookDto>> {
    let updated = state
        .services
        .books
        .partial_update(&isbn, Book::from(patch))
        .await?;
    Ok(Json(updated.into()))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "Book ISBN")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> AppResult<StatusCode> {
    if !state.services.books.exists_by_isbn(&isbn).await? {
        return Err(not_found(&isbn));
    }
    state.services.books.delete(&isbn).await?;
    Ok(StatusCode::NO_CONTENT)
}

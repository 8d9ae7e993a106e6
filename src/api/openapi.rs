//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, books, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshelf API",
        version = "1.0.0",
        description = "Author and Book catalog REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        // Authors
        authors::create_author,
        authors::list_authors,
        authors::get_author,
        authors::full_update_author,
        authors::partial_update_author,
        authors::delete_author,
        // Books
        books::upsert_book,
        books::list_books,
        books::get_book,
        books::partial_update_book,
        books::delete_book,
    ),
    components(
        schemas(
            crate::models::author::AuthorDto,
            crate::models::book::BookDto,
            books::PaginatedBooks,
            books::BookListing,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "authors", description = "Author management"),
        (name = "books", description = "Book management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = ApiDoc::openapi();
        for path in ["/health", "/authors", "/authors/{id}", "/books", "/books/{isbn}"] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn documents_both_book_listing_shapes() {
        let doc = ApiDoc::openapi();
        let components = doc.components.clone().expect("components");
        let schemas = &components.schemas;
        assert!(schemas.contains_key("PaginatedBooks"));

        let listing = serde_json::to_value(&schemas["BookListing"]).unwrap();
        let variants = listing["oneOf"].as_array().expect("oneOf");
        assert_eq!(variants.len(), 2);
        assert!(listing.to_string().contains("#/components/schemas/PaginatedBooks"));

        let list = serde_json::to_value(&doc.paths.paths["/books"]).unwrap();
        assert!(list.to_string().contains("#/components/schemas/BookListing"));
    }
}

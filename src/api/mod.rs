//! API handlers for Bookshelf REST endpoints

pub mod authors;
pub mod books;
pub mod health;
pub mod openapi;

use axum::{
    routing::{get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Authors
        .route(
            "/authors",
            get(authors::list_authors).post(authors::create_author),
        )
        .route(
            "/authors/:id",
            get(authors::get_author)
                .put(authors::full_update_author)
                .patch(authors::partial_update_author)
                .delete(authors::delete_author),
        )
        // Books
        .route("/books", get(books::list_books))
        .route(
            "/books/:isbn",
            put(books::upsert_book)
                .get(books::get_book)
                .patch(books::partial_update_book)
                .delete(books::delete_book),
        )
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

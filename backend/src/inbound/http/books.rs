//! Read-only catalogue handlers.
//!
//! ```text
//! GET /api/v1/books
//! GET /api/v1/books/{id}
//! GET /api/v1/books/author/{author}
//! GET /api/v1/books/title/{title}
//! GET /api/v1/books/{id}/reviews
//! ```
//!
//! All lookups are public; only review mutations require authentication.

use actix_web::{get, web, HttpResponse};
use serde_json::json;

use crate::domain::{Book, Error};
use crate::inbound::http::envelope::Envelope;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// List the whole catalogue in seed order.
#[utoipa::path(
    get,
    path = "/api/v1/books",
    responses(
        (status = 200, description = "All books"),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["books"],
    operation_id = "listBooks",
    security([])
)]
#[get("/books")]
pub async fn list_books(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let books = state.catalogue.list_all().await;
    Ok(HttpResponse::Ok().json(Envelope::with_data(
        "Books retrieved successfully",
        json!({ "books": books }),
    )))
}

/// Fetch one book by its catalogue id.
#[utoipa::path(
    get,
    path = "/api/v1/books/{id}",
    params(("id" = String, Path, description = "Stable catalogue id")),
    responses(
        (status = 200, description = "The book", body = Book),
        (status = 404, description = "Book not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["books"],
    operation_id = "getBook",
    security([])
)]
#[get("/books/{id}")]
pub async fn get_book(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    match state.catalogue.get_by_id(&id).await {
        Some(book) => Ok(HttpResponse::Ok().json(Envelope::with_data(
            "Book retrieved successfully",
            book,
        ))),
        None => Err(Error::not_found("Book not found")),
    }
}

/// Fetch books by exact author spelling.
#[utoipa::path(
    get,
    path = "/api/v1/books/author/{author}",
    params(("author" = String, Path, description = "Exact, case-sensitive author name")),
    responses(
        (status = 200, description = "Matching books"),
        (status = 404, description = "No books by this author", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["books"],
    operation_id = "getBooksByAuthor",
    security([])
)]
#[get("/books/author/{author}")]
pub async fn get_books_by_author(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let author = path.into_inner();
    let books = state.catalogue.get_by_author(&author).await;
    if books.is_empty() {
        return Err(Error::not_found("No books found by this author"));
    }
    Ok(HttpResponse::Ok().json(Envelope::with_data(
        "Books retrieved successfully",
        json!({ "books": books }),
    )))
}

/// Fetch books by title, ignoring case but never matching substrings.
#[utoipa::path(
    get,
    path = "/api/v1/books/title/{title}",
    params(("title" = String, Path, description = "Full title, case-insensitive")),
    responses(
        (status = 200, description = "Matching books"),
        (status = 404, description = "No books with this title", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["books"],
    operation_id = "getBooksByTitle",
    security([])
)]
#[get("/books/title/{title}")]
pub async fn get_books_by_title(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let title = path.into_inner();
    let books = state.catalogue.get_by_title(&title).await;
    if books.is_empty() {
        return Err(Error::not_found("No books found with this title"));
    }
    Ok(HttpResponse::Ok().json(Envelope::with_data(
        "Books retrieved successfully",
        json!({ "books": books }),
    )))
}

/// Fetch the review map for a book.
///
/// An absent book and a book with zero reviews both answer 404 but with
/// distinct messages, so callers can tell the cases apart.
#[utoipa::path(
    get,
    path = "/api/v1/books/{id}/reviews",
    params(("id" = String, Path, description = "Stable catalogue id")),
    responses(
        (status = 200, description = "Reviews keyed by username"),
        (status = 404, description = "Book absent, or no reviews yet", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["books"],
    operation_id = "getBookReviews",
    security([])
)]
#[get("/books/{id}/reviews")]
pub async fn get_book_reviews(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let Some(reviews) = state.catalogue.get_reviews(&id).await else {
        return Err(Error::not_found("Book not found"));
    };
    if reviews.is_empty() {
        return Err(Error::not_found("No reviews found for this book"));
    }
    Ok(HttpResponse::Ok().json(Envelope::with_data(
        "Reviews retrieved successfully",
        json!({ "reviews": reviews }),
    )))
}

//! Authenticated review mutation handlers.
//!
//! ```text
//! PUT    /api/v1/books/{id}/reviews {"review":"great read"}
//! DELETE /api/v1/books/{id}/reviews
//! ```
//!
//! The username scoping every mutation comes from the verified identity,
//! never from the request body.

use actix_web::{delete, put, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::domain::Error;
use crate::inbound::http::auth::require_identity;
use crate::inbound::http::envelope::Envelope;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Review request body for `PUT /api/v1/books/{id}/reviews`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
pub struct ReviewRequest {
    #[schema(example = "great read")]
    pub review: Option<String>,
}

/// Add or replace the caller's review on a book.
#[utoipa::path(
    put,
    path = "/api/v1/books/{id}/reviews",
    params(("id" = String, Path, description = "Stable catalogue id")),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Review stored"),
        (status = 400, description = "Missing review text", body = Error),
        (status = 401, description = "Not logged in", body = Error),
        (status = 403, description = "Credential invalid or expired", body = Error),
        (status = 404, description = "Book not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "putReview"
)]
#[put("/books/{id}/reviews")]
pub async fn put_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ReviewRequest>,
) -> ApiResult<HttpResponse> {
    let identity = require_identity(&session, &state.signer)?;
    let id = path.into_inner();
    let text = payload.into_inner().review.unwrap_or_default();
    state.reviews.add_review(&identity, &id, &text).await?;
    Ok(HttpResponse::Ok().json(Envelope::message_only("Review added successfully")))
}

/// Delete the caller's review from a book.
#[utoipa::path(
    delete,
    path = "/api/v1/books/{id}/reviews",
    params(("id" = String, Path, description = "Stable catalogue id")),
    responses(
        (status = 200, description = "Review removed"),
        (status = 401, description = "Not logged in", body = Error),
        (status = 403, description = "Credential invalid or expired", body = Error),
        (status = 404, description = "Book absent, or nothing to delete", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "deleteReview"
)]
#[delete("/books/{id}/reviews")]
pub async fn delete_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let identity = require_identity(&session, &state.signer)?;
    let id = path.into_inner();
    state.reviews.delete_review(&identity, &id).await?;
    Ok(HttpResponse::Ok().json(Envelope::message_only("Review deleted successfully")))
}

//! Review workflow: authenticated add/delete of one review per user per book.

use std::sync::Arc;

use crate::domain::error::Error;
use crate::domain::ports::BookCatalogue;
use crate::domain::token::Identity;

/// Orchestrates review mutations against the catalogue, scoped to a
/// verified [`Identity`].
///
/// The username used as the review key always comes from the identity,
/// never from the request body, so one user cannot touch another's review.
#[derive(Clone)]
pub struct ReviewService {
    catalogue: Arc<dyn BookCatalogue>,
}

impl ReviewService {
    /// Build the workflow over a catalogue port.
    pub fn new(catalogue: Arc<dyn BookCatalogue>) -> Self {
        Self { catalogue }
    }

    /// Attach `text` as the identity's review on the given book.
    ///
    /// The stored review is exactly `text`: no trimming or escaping happens
    /// at this layer. Upserting the same text twice is a no-op.
    pub async fn add_review(
        &self,
        identity: &Identity,
        book_id: &str,
        text: &str,
    ) -> Result<(), Error> {
        if text.is_empty() {
            return Err(Error::invalid_request("Review text is required"));
        }
        if !self
            .catalogue
            .upsert_review(book_id, identity.username(), text)
            .await
        {
            return Err(Error::not_found("Book not found"));
        }
        Ok(())
    }

    /// Remove the identity's review from the given book.
    ///
    /// "Book absent" and "no review to delete" are deliberately conflated
    /// into one not-found outcome with a combined message.
    pub async fn delete_review(&self, identity: &Identity, book_id: &str) -> Result<(), Error> {
        if !self
            .catalogue
            .delete_review(book_id, identity.username())
            .await
        {
            return Err(Error::not_found(
                "Book not found or you have not reviewed this book",
            ));
        }
        Ok(())
    }
}

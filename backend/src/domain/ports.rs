//! Driven ports for the account and catalogue stores.
//!
//! In hexagonal terms these are *driven* ports: handlers and domain services
//! call them without knowing (or importing) the backing storage. The only
//! implementations today are the in-memory adapters in `outbound::memory`,
//! but the traits keep handler tests deterministic and leave room for a
//! persistent adapter later.
//!
//! Every operation is total from the caller's point of view: stores report
//! failure through booleans and `Option`, never through errors, so the
//! calling workflow maps outcomes onto the error taxonomy one-to-one.

use async_trait::async_trait;

use crate::domain::account::Username;
use crate::domain::book::{Book, ReviewMap};

/// Registered identities and credential verification.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// True iff an account with exactly this username is present.
    async fn exists(&self, username: &Username) -> bool;

    /// Store a new account with a one-way hash of `password`.
    ///
    /// Returns false when the username is already taken; the uniqueness
    /// check and the insert are atomic with respect to concurrent calls.
    /// The plaintext is never retained.
    async fn create(&self, username: &Username, password: &str) -> bool;

    /// True iff the account exists and `password` verifies against the
    /// stored hash. Internal hashing failures count as a failed
    /// authentication, not an error.
    async fn authenticate(&self, username: &Username, password: &str) -> bool;
}

/// Fixed book records and their review maps.
#[async_trait]
pub trait BookCatalogue: Send + Sync {
    /// Every book in the catalogue, in seed order.
    async fn list_all(&self) -> Vec<Book>;

    /// Look a book up by its stable id.
    async fn get_by_id(&self, id: &str) -> Option<Book>;

    /// Exact, case-sensitive author equality.
    async fn get_by_author(&self, author: &str) -> Vec<Book>;

    /// Case-insensitive title equality; never a substring match.
    async fn get_by_title(&self, title: &str) -> Vec<Book>;

    /// The review map for a book, or `None` when the book is absent.
    /// `Some(empty)` means the book exists with zero reviews; callers can
    /// tell the two apart.
    async fn get_reviews(&self, id: &str) -> Option<ReviewMap>;

    /// Insert or overwrite the review for `username` on the given book.
    /// False when the book id is absent. Idempotent: repeating the call
    /// with identical arguments leaves the map unchanged.
    async fn upsert_review(&self, id: &str, username: &Username, text: &str) -> bool;

    /// Remove the review for `username` on the given book. False when the
    /// book is absent or the user has no review there.
    async fn delete_review(&self, id: &str, username: &Username) -> bool;
}

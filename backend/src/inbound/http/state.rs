//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and services and remain testable without I/O.

use std::sync::Arc;

use crate::domain::{AccountStore, BookCatalogue, ReviewService, TokenSigner};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountStore>,
    pub catalogue: Arc<dyn BookCatalogue>,
    pub reviews: ReviewService,
    pub signer: TokenSigner,
}

impl HttpState {
    /// Wire the handler dependencies; the review workflow shares the
    /// catalogue port it mutates.
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        catalogue: Arc<dyn BookCatalogue>,
        signer: TokenSigner,
    ) -> Self {
        let reviews = ReviewService::new(Arc::clone(&catalogue));
        Self {
            accounts,
            catalogue,
            reviews,
            signer,
        }
    }
}

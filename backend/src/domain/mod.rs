//! Domain primitives, ports, and services.
//!
//! Purpose: define the strongly typed core — accounts, books, signed
//! credentials, and the review workflow — independent of any transport.
//! Inbound adapters translate these types to and from HTTP; the in-memory
//! adapters in `outbound` implement the ports.

pub mod account;
pub mod book;
pub mod error;
pub mod ports;
pub mod reviews;
pub mod token;

pub use self::account::{
    LoginCredentials, LoginValidationError, Registration, RegistrationValidationError, Username,
    UsernameValidationError,
};
pub use self::book::{Book, ReviewMap};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ports::{AccountStore, BookCatalogue};
pub use self::reviews::ReviewService;
pub use self::token::{CredentialCheck, Identity, TokenSigner};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;

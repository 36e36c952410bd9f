//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::{Cookie, Key};
use actix_web::{test, web, App};
use argon2::Params;
use chrono::Duration;

use crate::domain::ports::AccountStore;
use crate::domain::{TokenSigner, Username};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{InMemoryAccounts, InMemoryCatalogue};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Handler state over fresh in-memory stores with minimal hashing cost,
/// pre-seeded with the `fraser`/`pass1` account.
pub async fn test_state() -> HttpState {
    let params = Params::new(Params::MIN_M_COST, 1, 1, None).expect("valid test params");
    let accounts = Arc::new(InMemoryAccounts::new(params));
    let fraser = Username::new("fraser").expect("valid username");
    assert!(accounts.create(&fraser, "pass1").await, "seed account");
    let catalogue = Arc::new(InMemoryCatalogue::with_classic_seed());
    let signer = TokenSigner::new(b"test-token-secret", Duration::hours(1));
    HttpState::new(accounts, catalogue, signer)
}

/// The full `/api/v1` surface over the given state, wrapped in a test
/// session middleware. Mirrors the production scope without rate limiting.
pub fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(web::Data::new(state)).service(
        web::scope("/api/v1")
            .wrap(test_session_middleware())
            .service(super::users::register)
            .service(super::users::login)
            .service(super::users::logout)
            .service(super::books::list_books)
            .service(super::books::get_books_by_author)
            .service(super::books::get_books_by_title)
            .service(super::books::get_book_reviews)
            .service(super::books::get_book)
            .service(super::reviews::put_review)
            .service(super::reviews::delete_review),
    )
}

/// Log in through the real endpoint and hand back the session cookie.
pub async fn login_cookie<S>(app: &S, username: &str, password: &str) -> Cookie<'static>
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
{
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(serde_json::json!({ "username": username, "password": password }))
            .to_request(),
    )
    .await;
    assert!(response.status().is_success(), "login failed in fixture");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

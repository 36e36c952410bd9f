//! Server construction and middleware wiring.

use actix_session::{
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
    SessionMiddleware,
};
use actix_web::body::{BoxBody, EitherBody};
use actix_web::cookie::{time, Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::books::{
    get_book, get_book_reviews, get_books_by_author, get_books_by_title, list_books,
};
use crate::inbound::http::health::{live, ready, HealthState};
use crate::inbound::http::reviews::{delete_review, put_review};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::{login, logout, register};
use crate::middleware::{RateLimit, SecurityHeaders};

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    session_ttl: time::Duration,
    rate_limit: RateLimit,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<EitherBody<BoxBody>>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        session_ttl,
        rate_limit,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Strict)
        .session_lifecycle(PersistentSession::default().session_ttl(session_ttl))
        .build();

    let api = web::scope("/api/v1")
        .wrap(session)
        .service(register)
        .service(login)
        .service(logout)
        .service(list_books)
        .service(get_books_by_author)
        .service(get_books_by_title)
        .service(get_book_reviews)
        .service(get_book)
        .service(put_review)
        .service(delete_review);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .service(api)
        .service(ready)
        .service(live)
        .wrap(rate_limit)
        .wrap(SecurityHeaders);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server over the wired handler state.
///
/// # Errors
/// Fails when the session secret is too short to derive a cookie key from,
/// or when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: &AppConfig,
    http_state: HttpState,
) -> std::io::Result<Server> {
    // Key::derive_from panics below 32 bytes; surface that as a startup
    // error instead.
    if config.session_secret.len() < 32 {
        return Err(std::io::Error::other(
            "SESSION_SECRET must be at least 32 bytes",
        ));
    }
    let key = Key::derive_from(&config.session_secret);
    // One limiter shared across workers so the budget is per process.
    let rate_limit = RateLimit::new(config.rate_limit_window, config.rate_limit_max);
    let http_state = web::Data::new(http_state);
    let session_ttl = time::Duration::seconds(config.token_ttl.num_seconds());
    let cookie_secure = config.cookie_secure;

    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            session_ttl,
            rate_limit: rate_limit.clone(),
        })
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations: stashing the minted access token at login,
//! reading it back on protected requests, and purging it at logout. The
//! cookie itself is encrypted and signed by the session middleware; the
//! token inside carries its own signature and expiry on top.

use actix_session::Session;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::domain::Error;

pub(crate) const TOKEN_KEY: &str = "authorization";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Stash the freshly minted access token in the session cookie.
    pub fn persist_token(&self, token: &str) -> Result<(), Error> {
        self.0
            .insert(TOKEN_KEY, token)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the stored access token, if any.
    pub fn token(&self) -> Result<Option<String>, Error> {
        self.0
            .get::<String>(TOKEN_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))
    }

    /// Drop the server-held session state and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App, HttpResponse};

    #[actix_web::test]
    async fn round_trips_a_token_through_the_cookie() {
        let app = test::init_service(
            App::new()
                .wrap(crate::inbound::http::test_utils::test_session_middleware())
                .route(
                    "/set",
                    web::get().to(|session: SessionContext| async move {
                        session.persist_token("opaque-token")?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        let token = session.token()?.unwrap_or_default();
                        Ok::<_, Error>(HttpResponse::Ok().body(token))
                    }),
                ),
        )
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        assert_eq!(set_res.status(), StatusCode::OK);
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set");

        let get_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/get")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(get_res.status(), StatusCode::OK);
        let body = test::read_body(get_res).await;
        assert_eq!(body, "opaque-token");
    }

    #[actix_web::test]
    async fn fresh_session_has_no_token() {
        let app = test::init_service(
            App::new()
                .wrap(crate::inbound::http::test_utils::test_session_middleware())
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        let present = session.token()?.is_some();
                        Ok::<_, Error>(HttpResponse::Ok().body(present.to_string()))
                    }),
                ),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/get").to_request()).await;
        let body = test::read_body(res).await;
        assert_eq!(body, "false");
    }
}

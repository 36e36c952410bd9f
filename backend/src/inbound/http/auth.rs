//! Authentication helpers used by HTTP handlers.
//!
//! Keep the HTTP modules focused on request/response mapping by
//! concentrating credential checks and identity derivation here. The two
//! rejection reasons stay distinct on purpose: "you never logged in" maps
//! to 401 and "your credential is broken or expired" maps to 403, so
//! clients can tell a missing login apart from a dead credential.

use tracing::debug;

use crate::domain::{CredentialCheck, Error, Identity, TokenSigner};
use crate::inbound::http::session::SessionContext;

use super::ApiResult;

/// Resolve the request's identity or reject with the proper taxonomy.
pub fn require_identity(session: &SessionContext, signer: &TokenSigner) -> ApiResult<Identity> {
    let token = session.token()?;
    match signer.check_presented(token.as_deref()) {
        CredentialCheck::Valid(identity) => Ok(identity),
        CredentialCheck::Absent => Err(Error::unauthorized("User not logged in")),
        CredentialCheck::Expired => {
            debug!("rejected expired credential");
            Err(Error::forbidden("User not authenticated"))
        }
        CredentialCheck::Invalid => {
            debug!("rejected unverifiable credential");
            Err(Error::forbidden("User not authenticated"))
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    //!
    //! `SessionContext` only exists inside a request, so these tests drive
    //! a tiny app whose handler calls [`require_identity`] and reports the
    //! outcome as its response status.
    use super::*;
    use crate::domain::{TokenSigner, Username};
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App, HttpResponse};
    use chrono::{Duration, Utc};

    fn signer() -> TokenSigner {
        TokenSigner::new(b"auth-test-secret", Duration::hours(1))
    }

    fn probe_app(
        signer: TokenSigner,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let signer = web::Data::new(signer);
        App::new()
            .app_data(signer)
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .route(
                "/seed",
                web::post().to(
                    |session: SessionContext, token: String| async move {
                        session.persist_token(&token)?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    },
                ),
            )
            .route(
                "/protected",
                web::get().to(
                    |session: SessionContext, signer: web::Data<TokenSigner>| async move {
                        let identity = require_identity(&session, &signer)?;
                        Ok::<_, Error>(HttpResponse::Ok().body(identity.username().to_string()))
                    },
                ),
            )
    }

    async fn seeded_cookie<S>(app: &S, token: &str) -> actix_web::cookie::Cookie<'static>
    where
        S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
    {
        let res = test::call_service(
            app,
            test::TestRequest::post()
                .uri("/seed")
                .set_payload(token.to_owned())
                .to_request(),
        )
        .await;
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned()
    }

    #[actix_web::test]
    async fn missing_credential_is_401() {
        let app = test::init_service(probe_app(signer())).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/protected").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn valid_credential_resolves_the_identity() {
        let signer = signer();
        let token = signer.mint(&Username::new("fraser").expect("valid username"));
        let app = test::init_service(probe_app(signer)).await;
        let cookie = seeded_cookie(&app, &token).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/protected")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, "fraser");
    }

    #[actix_web::test]
    async fn expired_credential_is_403() {
        let signer = signer();
        let stale = signer.mint_at(
            &Username::new("fraser").expect("valid username"),
            Utc::now() - Duration::hours(2),
        );
        let app = test::init_service(probe_app(signer)).await;
        let cookie = seeded_cookie(&app, &stale).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/protected")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn forged_credential_is_403() {
        let app = test::init_service(probe_app(signer())).await;
        let cookie = seeded_cookie(&app, "forged.token").await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/protected")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }
}

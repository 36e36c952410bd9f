//! Registration, login, and logout handlers.
//!
//! ```text
//! POST /api/v1/register {"username":"newuser1","password":"P@ssw0rd1"}
//! POST /api/v1/login    {"username":"fraser","password":"pass1"}
//! POST /api/v1/logout
//! ```

use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{
    Error, LoginCredentials, LoginValidationError, Registration, RegistrationValidationError,
};
use crate::inbound::http::envelope::Envelope;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Registration request body for `POST /api/v1/register`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "newuser1")]
    pub username: Option<String>,
    #[schema(example = "P@ssw0rd1")]
    pub password: Option<String>,
}

/// Login request body for `POST /api/v1/login`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[schema(example = "fraser")]
    pub username: Option<String>,
    #[schema(example = "pass1")]
    pub password: Option<String>,
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Username already exists", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest { username, password } = payload.into_inner();
    let (Some(username), Some(password)) = (username, password) else {
        return Err(Error::invalid_request("Username and password are required"));
    };
    let registration = Registration::try_from_parts(&username, &password)
        .map_err(map_registration_validation_error)?;

    if state.accounts.exists(registration.username()).await {
        return Err(Error::conflict("Username already exists"));
    }
    if !state
        .accounts
        .create(registration.username(), registration.password())
        .await
    {
        // Lost the race against a concurrent registration of the same name.
        return Err(Error::conflict("Username already exists"));
    }

    Ok(HttpResponse::Created().json(Envelope::message_only("User registered successfully!")))
}

fn map_registration_validation_error(err: RegistrationValidationError) -> Error {
    let field = match err {
        RegistrationValidationError::EmptyUsername
        | RegistrationValidationError::UsernameLength
        | RegistrationValidationError::UsernameCharset => "username",
        RegistrationValidationError::EmptyPassword
        | RegistrationValidationError::PasswordTooShort
        | RegistrationValidationError::PasswordTooWeak => "password",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

/// Authenticate and establish a session carrying a signed access token.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { username, password } = payload.into_inner();
    let (Some(username), Some(password)) = (username, password) else {
        return Err(Error::invalid_request("Username and password are required"));
    };
    let credentials = LoginCredentials::try_from_parts(&username, &password)
        .map_err(map_login_validation_error)?;

    if !state
        .accounts
        .authenticate(credentials.username(), credentials.password())
        .await
    {
        return Err(Error::unauthorized("Invalid username or password"));
    }

    let token = state.signer.mint(credentials.username());
    session.persist_token(&token)?;
    Ok(HttpResponse::Ok().json(Envelope::with_data(
        "Login successful",
        json!({ "token": token }),
    )))
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyUsername => Error::invalid_request("username must not be empty")
            .with_details(json!({ "field": "username" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password" })),
    }
}

/// Drop the session. Safe to call without being logged in.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 200, description = "Session invalidated"),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> ApiResult<HttpResponse> {
    session.purge();
    Ok(HttpResponse::Ok().json(Envelope::message_only("Logout successful")))
}

//! Backend entry-point: wires configuration, stores, and REST endpoints.

use std::sync::Arc;

use actix_web::web;
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use backend::config::AppConfig;
use backend::domain::{AccountStore, TokenSigner, Username};
use backend::inbound::http::health::HealthState;
use backend::inbound::http::state::HttpState;
use backend::outbound::memory::{InMemoryAccounts, InMemoryCatalogue};
use backend::server::create_server;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    let accounts = Arc::new(InMemoryAccounts::new(config.hash_params.clone()));
    seed_default_account(&accounts, &config).await;
    let catalogue = Arc::new(InMemoryCatalogue::with_classic_seed());
    let signer = TokenSigner::new(&config.token_secret, config.token_ttl);
    let http_state = HttpState::new(accounts, catalogue, signer);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), &config, http_state)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}

/// Register the stock `fraser` account so a fresh process accepts logins,
/// mirroring the data set this service ships with.
async fn seed_default_account(accounts: &InMemoryAccounts, config: &AppConfig) {
    let Ok(username) = Username::new("fraser") else {
        return;
    };
    if !accounts.create(&username, &config.seed_user_password).await {
        warn!(%username, "failed to seed default account");
    }
}

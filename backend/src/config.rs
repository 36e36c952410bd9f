//! Process configuration sourced from the environment.
//!
//! Every knob has a default; secrets fall back to generated random values
//! so a fresh checkout runs out of the box, with a loud warning because a
//! generated secret invalidates sessions and tokens on every restart.
//! Nothing here is ever hardcoded into the binary.

use std::net::SocketAddr;
use std::time::Duration as StdDuration;

use argon2::Params;
use chrono::Duration;
use rand::RngCore;
use tracing::warn;

/// Configuration errors surfaced at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Everything the server needs to boot.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Socket the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Secret the session cookie key is derived from.
    pub session_secret: Vec<u8>,
    /// Secret signing access tokens. Distinct from the session secret so
    /// compromising one does not compromise the other.
    pub token_secret: Vec<u8>,
    /// Access token lifetime, fixed at issuance.
    pub token_ttl: Duration,
    /// Whether the session cookie carries the `Secure` flag.
    pub cookie_secure: bool,
    /// Argon2id cost parameters for credential hashing.
    pub hash_params: Params,
    /// Fixed rate-limit window.
    pub rate_limit_window: StdDuration,
    /// Requests allowed per peer per window.
    pub rate_limit_max: u32,
    /// Password for the seeded `fraser` account.
    pub seed_user_password: String,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = match lookup("BIND_ADDR") {
            Some(raw) => raw.parse().map_err(|err| ConfigError::Invalid {
                var: "BIND_ADDR",
                reason: format!("{err}"),
            })?,
            None => SocketAddr::from(([0, 0, 0, 0], 8080)),
        };

        let session_secret = secret_or_generated(&lookup, "SESSION_SECRET");
        let token_secret = secret_or_generated(&lookup, "TOKEN_SECRET");

        let token_ttl_secs = parse_or_default(&lookup, "TOKEN_TTL_SECS", 3600_i64)?;
        let token_ttl = Duration::seconds(token_ttl_secs);

        // Secure unless explicitly switched off for local HTTP development.
        let cookie_secure = lookup("SESSION_COOKIE_SECURE").is_none_or(|v| v != "0");

        let memory_kib = parse_or_default(&lookup, "ARGON2_MEMORY_KIB", 19_456_u32)?;
        let iterations = parse_or_default(&lookup, "ARGON2_ITERATIONS", 2_u32)?;
        let hash_params =
            Params::new(memory_kib, iterations, 1, None).map_err(|err| ConfigError::Invalid {
                var: "ARGON2_MEMORY_KIB",
                reason: format!("{err}"),
            })?;

        let rate_limit_window = StdDuration::from_secs(parse_or_default(
            &lookup,
            "RATE_LIMIT_WINDOW_SECS",
            900_u64,
        )?);
        let rate_limit_max = parse_or_default(&lookup, "RATE_LIMIT_MAX", 100_u32)?;

        let seed_user_password =
            lookup("SEED_USER_PASSWORD").unwrap_or_else(|| "pass1".to_owned());

        Ok(Self {
            bind_addr,
            session_secret,
            token_secret,
            token_ttl,
            cookie_secure,
            hash_params,
            rate_limit_window,
            rate_limit_max,
            seed_user_password,
        })
    }
}

fn secret_or_generated(lookup: &impl Fn(&str) -> Option<String>, var: &'static str) -> Vec<u8> {
    match lookup(var) {
        Some(raw) if !raw.is_empty() => raw.into_bytes(),
        _ => {
            warn!(
                %var,
                "no secret configured; using a generated value valid only for this process"
            );
            generated_secret().into_bytes()
        }
    }
}

/// 64 random bytes, hex-encoded so the value is printable and could be
/// pasted into the environment verbatim.
fn generated_secret() -> String {
    let mut bytes = [0_u8; 64];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn parse_or_default<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        Some(raw) => raw.parse().map_err(|err: T::Err| ConfigError::Invalid {
            var,
            reason: format!("{err}"),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use std::collections::HashMap;

    fn from_map(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        AppConfig::from_lookup(|var| map.get(var).cloned())
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = from_map(&[]).expect("defaults load");
        assert_eq!(config.bind_addr, SocketAddr::from(([0, 0, 0, 0], 8080)));
        assert_eq!(config.token_ttl, Duration::seconds(3600));
        assert!(config.cookie_secure);
        assert_eq!(config.rate_limit_max, 100);
        assert_eq!(config.seed_user_password, "pass1");
    }

    #[test]
    fn generated_secrets_differ_between_loads() {
        let a = from_map(&[]).expect("load");
        let b = from_map(&[]).expect("load");
        assert_ne!(a.session_secret, b.session_secret);
        assert_ne!(a.token_secret, b.token_secret);
        assert_ne!(a.session_secret, a.token_secret);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = from_map(&[
            ("BIND_ADDR", "127.0.0.1:9999"),
            ("SESSION_SECRET", "session-secret"),
            ("TOKEN_SECRET", "token-secret"),
            ("TOKEN_TTL_SECS", "60"),
            ("SESSION_COOKIE_SECURE", "0"),
            ("RATE_LIMIT_WINDOW_SECS", "10"),
            ("RATE_LIMIT_MAX", "3"),
        ])
        .expect("load");
        assert_eq!(config.bind_addr, SocketAddr::from(([127, 0, 0, 1], 9999)));
        assert_eq!(config.session_secret, b"session-secret".to_vec());
        assert_eq!(config.token_secret, b"token-secret".to_vec());
        assert_eq!(config.token_ttl, Duration::seconds(60));
        assert!(!config.cookie_secure);
        assert_eq!(config.rate_limit_window, StdDuration::from_secs(10));
        assert_eq!(config.rate_limit_max, 3);
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let err = from_map(&[("TOKEN_TTL_SECS", "soon")]).expect_err("must fail");
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: "TOKEN_TTL_SECS",
                ..
            }
        ));
    }
}

//! Signed, time-limited access tokens binding a username.
//!
//! A token is `base64url(claims) "." base64url(hmac-sha256 tag)` with the
//! claims carrying the subject username and a fixed unix expiry. The expiry
//! is set once at minting and never renewed by use. Tokens are opaque to
//! clients: without the signing secret they can be neither forged nor
//! meaningfully altered.
//!
//! Verification yields a tagged [`CredentialCheck`] rather than an error so
//! the transport layer can map "nothing presented", "broken", and "expired"
//! onto distinct rejections.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::domain::account::Username;

type HmacSha256 = Hmac<Sha256>;

/// The authenticated identity bound to a request.
///
/// The constructor is deliberately crate-private: an `Identity` only ever
/// comes out of [`TokenSigner::verify`], so no handler can build one from
/// client-supplied body fields and smuggle it into a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    username: Username,
}

impl Identity {
    pub(crate) fn new(username: Username) -> Self {
        Self { username }
    }

    /// The verified account name.
    pub fn username(&self) -> &Username {
        &self.username
    }
}

/// Outcome of checking the credential presented with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialCheck {
    /// Signature and expiry check out; the request acts as this identity.
    Valid(Identity),
    /// No credential was presented at all.
    Absent,
    /// The credential was well signed but its expiry has passed.
    Expired,
    /// The credential is malformed or its signature does not verify.
    Invalid,
}

/// Claims payload carried inside a token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
}

/// Mints and verifies access tokens with a process-wide secret.
///
/// The secret is fixed at startup; there is no rotation. Cloning is cheap
/// and shares the keyed MAC state.
#[derive(Clone)]
pub struct TokenSigner {
    mac: HmacSha256,
    ttl: Duration,
}

impl TokenSigner {
    /// Build a signer from the shared secret and the credential lifetime.
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mac = HmacSha256::new_from_slice(secret)
            .unwrap_or_else(|_| panic!("hmac-sha256 accepts keys of any length"));
        Self { mac, ttl }
    }

    /// Mint a token for `username` expiring `ttl` from now.
    pub fn mint(&self, username: &Username) -> String {
        self.mint_at(username, Utc::now())
    }

    /// Mint a token for `username` expiring `ttl` after `issued_at`.
    pub fn mint_at(&self, username: &Username, issued_at: DateTime<Utc>) -> String {
        let claims = Claims {
            sub: username.as_ref().to_owned(),
            exp: (issued_at + self.ttl).timestamp(),
        };
        let payload = serde_json::to_vec(&claims)
            .unwrap_or_else(|err| panic!("token claims must serialise: {err}"));
        let tag = self.tag(&payload);
        format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(&payload),
            URL_SAFE_NO_PAD.encode(tag)
        )
    }

    /// Verify a presented token against the secret and the current time.
    pub fn verify(&self, raw: &str) -> CredentialCheck {
        self.verify_at(raw, Utc::now())
    }

    /// Verify a token as of `now`.
    ///
    /// The signature is checked before the claims are read, so a tampered
    /// expiry can only ever surface as [`CredentialCheck::Invalid`], never
    /// as a chosen [`CredentialCheck::Expired`].
    pub fn verify_at(&self, raw: &str, now: DateTime<Utc>) -> CredentialCheck {
        let Some((payload_b64, tag_b64)) = raw.split_once('.') else {
            return CredentialCheck::Invalid;
        };
        let Ok(payload) = URL_SAFE_NO_PAD.decode(payload_b64) else {
            return CredentialCheck::Invalid;
        };
        let Ok(tag) = URL_SAFE_NO_PAD.decode(tag_b64) else {
            return CredentialCheck::Invalid;
        };

        let mut mac = self.mac.clone();
        mac.update(&payload);
        // verify_slice compares in constant time.
        if mac.verify_slice(&tag).is_err() {
            return CredentialCheck::Invalid;
        }

        let Ok(claims) = serde_json::from_slice::<Claims>(&payload) else {
            return CredentialCheck::Invalid;
        };
        if claims.exp < now.timestamp() {
            return CredentialCheck::Expired;
        }
        match Username::new(&claims.sub) {
            Ok(username) => CredentialCheck::Valid(Identity::new(username)),
            Err(_) => CredentialCheck::Invalid,
        }
    }

    /// Check an optionally-presented token, mapping absence explicitly.
    pub fn check_presented(&self, token: Option<&str>) -> CredentialCheck {
        match token {
            Some(raw) => self.verify(raw),
            None => CredentialCheck::Absent,
        }
    }

    fn tag(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}

use crate::config;

use base64::{STANDARD, STANDARD_NO_PAD, URL_SAFE_NO_PAD, decode_config, encode_config};
use jwt_simple::algorithms::MACLike;
use jwt_simple::prelude::{Claims, Duration as JwtDuration, HS256Key, VerificationOptions};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use std::collections::HashSet;

#[derive(Debug, Clone)]
pub(crate) struct AuthState {
    key: HS256Key,
    issuer: String,
    cookie_name: String,
    token_ttl: time::Duration,
    allowed_roles: HashSet<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid auth key")]
    InvalidKey,
    #[error("missing auth token")]
    MissingToken,
    #[error("invalid auth token")]
    InvalidToken,
    #[error("auth token missing expiry")]
    MissingExpiry,
    #[error("auth token missing subject")]
    MissingSubject,
    #[error("role '{role}' may not send notifications")]
    Forbidden { role: String },
}

impl AuthError {
    /// True when the caller was identified but lacks the required role.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, AuthError::Forbidden { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RoleClaims {
    #[serde(default)]
    role: String,
}

/// Identity extracted from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub subject: String,
    pub role: String,
}

impl AuthState {
    pub(crate) fn from_config(config: &config::AppConfig) -> Result<Option<Self>, AuthError> {
        let Some(auth) = config.auth.as_ref() else {
            return Ok(None);
        };

        let key_bytes = decode_key(&auth.key)?;
        let key = HS256Key::from_bytes(&key_bytes);

        Ok(Some(Self {
            key,
            issuer: config.app_name.clone(),
            cookie_name: auth.cookie_name.clone(),
            token_ttl: auth.token_ttl,
            allowed_roles: auth
                .allowed_roles
                .iter()
                .map(|role| role.trim().to_lowercase())
                .collect(),
        }))
    }

    pub(crate) fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub(crate) fn issue_token(&self, subject: &str, role: &str) -> Result<String, AuthError> {
        let ttl_seconds = self.token_ttl.whole_seconds();
        if ttl_seconds <= 0 {
            return Err(AuthError::InvalidToken);
        }
        let claims = Claims::with_custom_claims(
            RoleClaims {
                role: role.to_string(),
            },
            JwtDuration::from_secs(ttl_seconds as u64),
        )
        .with_subject(subject)
        .with_issuer(&self.issuer);
        self.key
            .authenticate(claims)
            .map_err(|_| AuthError::InvalidToken)
    }

    pub(crate) fn verify_token(&self, token: &str) -> Result<Caller, AuthError> {
        let mut options = VerificationOptions::default();
        let mut issuers = HashSet::new();
        issuers.insert(self.issuer.clone());
        options.allowed_issuers = Some(issuers);

        let claims = self
            .key
            .verify_token::<RoleClaims>(token, Some(options))
            .map_err(|_| AuthError::InvalidToken)?;

        if claims.expires_at.is_none() {
            return Err(AuthError::MissingExpiry);
        }

        let subject = claims.subject.ok_or(AuthError::MissingSubject)?;
        if subject.trim().is_empty() {
            return Err(AuthError::MissingSubject);
        }

        Ok(Caller {
            subject,
            role: claims.custom.role.trim().to_lowercase(),
        })
    }

    /// Verifies the token and checks that its role may trigger notifications.
    pub(crate) fn authorize(&self, token: Option<&str>) -> Result<Caller, AuthError> {
        let token = token
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingToken)?;
        let caller = self.verify_token(token)?;
        if !self.allowed_roles.contains(&caller.role) {
            return Err(AuthError::Forbidden { role: caller.role });
        }
        Ok(caller)
    }
}

fn decode_key(raw: &str) -> Result<Vec<u8>, AuthError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AuthError::InvalidKey);
    }

    let decoded = decode_config(trimmed, URL_SAFE_NO_PAD)
        .or_else(|_| decode_config(trimmed, STANDARD))
        .or_else(|_| decode_config(trimmed, STANDARD_NO_PAD))
        .map_err(|_| AuthError::InvalidKey)?;

    if decoded.is_empty() {
        return Err(AuthError::InvalidKey);
    }

    Ok(decoded)
}

pub fn generate_auth_key() -> Result<String, AuthError> {
    let mut rng = OsRng;
    generate_auth_key_with_rng(&mut rng)
}

pub(crate) fn generate_auth_key_with_rng<R: RngCore + CryptoRng>(
    rng: &mut R,
) -> Result<String, AuthError> {
    let mut bytes = [0u8; 32];
    rng.fill_bytes(&mut bytes);
    let encoded = encode_config(bytes, URL_SAFE_NO_PAD);
    if encoded.is_empty() {
        return Err(AuthError::InvalidKey);
    }
    Ok(encoded)
}

/// Signs a token for `subject` with `role` using the configured auth key.
pub fn issue_token(
    config: &config::AppConfig,
    subject: &str,
    role: &str,
) -> Result<String, AuthError> {
    let auth = AuthState::from_config(config)?.ok_or(AuthError::InvalidKey)?;
    auth.issue_token(subject, role)
}

#[cfg(test)]
#[allow(non_snake_case)]
pub(crate) mod tests {
    use super::*;

    struct ZeroRng;

    impl RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for value in dest.iter_mut() {
                *value = 0;
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    impl CryptoRng for ZeroRng {}

    pub(crate) fn auth_app_config(key_bytes: &[u8]) -> config::AppConfig {
        config::AppConfig {
            auth: Some(config::AuthConfig {
                key: encode_config(key_bytes, URL_SAFE_NO_PAD),
                token_ttl: time::Duration::hours(1),
                cookie_name: "livescore_auth".to_string(),
                allowed_roles: vec!["admin".to_string(), "editor".to_string()],
            }),
            ..Default::default()
        }
    }

    fn auth_state(key_bytes: &[u8]) -> AuthState {
        AuthState::from_config(&auth_app_config(key_bytes))
            .expect("auth state")
            .expect("auth enabled")
    }

    #[test]
    fn generate_auth_key_with_rng__should_match_fixture() {
        // Given
        let mut rng = ZeroRng;

        // When
        let key = generate_auth_key_with_rng(&mut rng).expect("auth key");

        // Then
        assert_eq!(key, "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA");
    }

    #[test]
    fn authorize__should_accept_allowed_role() {
        // Given
        let auth = auth_state(b"authorize-secret");
        let token = auth.issue_token("marta", "Editor").expect("token");

        // When
        let caller = auth.authorize(Some(&token)).expect("authorized");

        // Then
        assert_eq!(
            caller,
            Caller {
                subject: "marta".to_string(),
                role: "editor".to_string(),
            }
        );
    }

    #[test]
    fn authorize__should_forbid_other_roles() {
        // Given
        let auth = auth_state(b"authorize-secret");
        let token = auth.issue_token("viewer", "viewer").expect("token");

        // When
        let err = auth.authorize(Some(&token)).expect_err("forbidden");

        // Then
        assert!(err.is_forbidden());
    }

    #[test]
    fn authorize__should_reject_missing_and_foreign_tokens() {
        // Given
        let auth = auth_state(b"authorize-secret");
        let foreign = auth_state(b"another-secret")
            .issue_token("marta", "admin")
            .expect("token");

        // Then
        assert!(matches!(auth.authorize(None), Err(AuthError::MissingToken)));
        assert!(matches!(
            auth.authorize(Some("  ")),
            Err(AuthError::MissingToken)
        ));
        assert!(matches!(
            auth.authorize(Some(&foreign)),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn issue_token__should_require_auth_configuration() {
        // Then
        assert!(issue_token(&config::AppConfig::default(), "marta", "admin").is_err());
    }
}

//! Moderator authentication: credential check and session tokens.

use axum::http::HeaderMap;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::error::ApiError;

const DEFAULT_EXPIRY_SECONDS: u64 = 60 * 60;

/// JWT claims embedded in issued tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (moderator email).
    pub sub: String,
    /// Role name.
    pub role: String,
    /// Expiry (seconds since epoch).
    pub exp: usize,
}

/// Moderator credentials and the keys for signing session tokens.
pub struct AuthConfig {
    admin_email: String,
    admin_password: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_seconds: u64,
}

impl AuthConfig {
    pub fn new(admin_email: String, admin_password: String, secret: &str) -> Self {
        Self {
            admin_email,
            admin_password,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_seconds: DEFAULT_EXPIRY_SECONDS,
        }
    }

    /// Check credentials and issue a session token.
    pub fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        if email != self.admin_email || password != self.admin_password {
            return Err(ApiError::Unauthorized("invalid credentials".to_string()));
        }

        #[allow(clippy::cast_possible_truncation)]
        let exp = jsonwebtoken::get_current_timestamp() as usize + self.expiry_seconds as usize;
        let claims = Claims {
            sub: email.to_string(),
            role: "moderator".to_string(),
            exp,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(format!("token encoding failed: {e}")))
    }

    /// Validate the bearer token in the request headers, returning the
    /// moderator identity.
    pub fn verify(&self, headers: &HeaderMap) -> Result<String, ApiError> {
        let header = headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("missing authorization header".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("expected bearer token".to_string()))?;

        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| ApiError::Unauthorized(format!("invalid token: {e}")))?;

        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AuthConfig {
        AuthConfig::new(
            "mod@example.com".to_string(),
            "hunter2".to_string(),
            "test-secret",
        )
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            format!("Bearer {token}").parse().unwrap(),
        );
        headers
    }

    #[test]
    fn test_login_round_trip() {
        let auth = config();
        let token = auth.login("mod@example.com", "hunter2").unwrap();
        let who = auth.verify(&bearer(&token)).unwrap();
        assert_eq!(who, "mod@example.com");
    }

    #[test]
    fn test_bad_credentials_rejected() {
        let auth = config();
        assert!(auth.login("mod@example.com", "wrong").is_err());
        assert!(auth.login("else@example.com", "hunter2").is_err());
    }

    #[test]
    fn test_missing_and_malformed_headers_rejected() {
        let auth = config();
        assert!(auth.verify(&HeaderMap::new()).is_err());

        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            "Basic abc".parse().unwrap(),
        );
        assert!(auth.verify(&headers).is_err());
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let auth = config();
        let other = AuthConfig::new(
            "mod@example.com".to_string(),
            "hunter2".to_string(),
            "other-secret",
        );
        let token = other.login("mod@example.com", "hunter2").unwrap();
        assert!(auth.verify(&bearer(&token)).is_err());
    }
}

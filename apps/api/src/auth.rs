//! Session tokens and the authentication gate.
//!
//! ```text
//! Authorization: Bearer eyJ...      ─┐
//! Authorization: eyJ...              ├─► extract_token ─► JwtManager::verify
//! (no header)  ──► 403 MISSING_TOKEN ┘                        │
//!                                                             ├─ ok  ─► AuthUser in extensions
//!                                                             └─ err ─► 401 INVALID_TOKEN
//! ```
//!
//! Validation is stateless: nothing about issued tokens is stored.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use revenda_core::{PublicUser, SessionInfo};

use crate::error::ApiError;
use crate::AppState;

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Display name at issue time
    pub name: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// JWT token manager.
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager.
    pub fn new(secret: &str, lifetime_secs: i64) -> Self {
        JwtManager {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime_secs,
        }
    }

    pub fn lifetime_secs(&self) -> i64 {
        self.lifetime_secs
    }

    /// Issues a token for `user`.
    pub fn issue(&self, user: &PublicUser) -> Result<String, ApiError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.lifetime_secs);

        let claims = Claims {
            sub: user.id.clone(),
            name: user.name.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            error!("Failed to generate token: {}", e);
            ApiError::internal()
        })
    }

    /// Validates signature and expiry and returns the session it carries.
    pub fn verify(&self, token: &str) -> Result<SessionInfo, ApiError> {
        let token_data: TokenData<Claims> = decode(token, &self.decoding_key, &Validation::default())
            .map_err(|e| {
                warn!(reason = %e, "Rejected session token");
                ApiError::invalid_token()
            })?;

        Ok(SessionInfo {
            user_id: token_data.claims.sub,
            user_name: token_data.claims.name,
        })
    }
}

/// Pulls the token out of an Authorization header value. The `Bearer `
/// prefix is optional.
pub fn extract_token(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// The verified caller, inserted into request extensions by [`require_auth`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub SessionInfo);

impl AuthUser {
    pub fn id(&self) -> &str {
        &self.0.user_id
    }
}

/// Middleware guarding every authenticated route.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(ApiError::missing_token)?;

    let token = extract_token(header).ok_or_else(ApiError::missing_token)?;
    let session = state.jwt.verify(token)?;

    request.extensions_mut().insert(AuthUser(session));
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn user() -> PublicUser {
        PublicUser {
            id: "user-001".to_string(),
            name: "Ana".to_string(),
            login_handle: "ana".to_string(),
        }
    }

    #[test]
    fn test_jwt_roundtrip() {
        let manager = JwtManager::new("test-secret", 3600);
        let token = manager.issue(&user()).unwrap();

        let session = manager.verify(&token).unwrap();
        assert_eq!(session.user_id, "user-001");
        assert_eq!(session.user_name, "Ana");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtManager::new("secret-a", 3600).issue(&user()).unwrap();
        let err = JwtManager::new("secret-b", 3600).verify(&token).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidToken);
    }

    #[test]
    fn test_expired_token_rejected() {
        // Past the default 60s leeway
        let token = JwtManager::new("test-secret", -120).issue(&user()).unwrap();
        let err = JwtManager::new("test-secret", 3600).verify(&token).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidToken);
    }

    #[test]
    fn test_extract_token_prefix_optional() {
        assert_eq!(extract_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_token("abc.def"), Some("abc.def"));
        assert_eq!(extract_token("Bearer "), None);
        assert_eq!(extract_token(""), None);
    }
}

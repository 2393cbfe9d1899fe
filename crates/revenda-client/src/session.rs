//! # Session
//!
//! The token and user returned by login, held in memory only. Expiry is
//! tracked locally so an expired session is dropped before a doomed request
//! goes out.

use std::time::{Duration, Instant};

use revenda_core::{LoginResponse, PublicUser, TOKEN_LIFETIME_SECS};

/// An authenticated session.
#[derive(Debug, Clone)]
pub struct Session {
    /// Signed token sent as `Authorization: Bearer <token>`
    pub token: String,
    /// Who is logged in
    pub user: PublicUser,
    /// When the token expires (local clock)
    pub expires_at: Instant,
}

impl Session {
    /// Builds a session from a login response, assuming the server's
    /// standard token lifetime.
    pub fn from_login(login: LoginResponse) -> Self {
        Self::with_lifetime(login, Duration::from_secs(TOKEN_LIFETIME_SECS.unsigned_abs()))
    }

    pub fn with_lifetime(login: LoginResponse, lifetime: Duration) -> Self {
        Session {
            token: login.token,
            user: login.user,
            expires_at: Instant::now() + lifetime,
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    /// Remaining validity in whole seconds.
    pub fn remaining_secs(&self) -> u64 {
        self.expires_at
            .saturating_duration_since(Instant::now())
            .as_secs()
    }

    /// Value for the Authorization header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login() -> LoginResponse {
        LoginResponse {
            token: "abc".to_string(),
            user: PublicUser {
                id: "u1".to_string(),
                name: "Ana".to_string(),
                login_handle: "ana".to_string(),
            },
        }
    }

    #[test]
    fn test_fresh_session() {
        let session = Session::from_login(login());
        assert!(!session.is_expired());
        assert!(session.remaining_secs() > 86_000);
        assert_eq!(session.bearer(), "Bearer abc");
    }

    #[test]
    fn test_zero_lifetime_is_expired() {
        let session = Session::with_lifetime(login(), Duration::ZERO);
        assert!(session.is_expired());
        assert_eq!(session.remaining_secs(), 0);
    }
}

//! Registration, login and session inspection.

use tracing::{info, warn};

use revenda_core::validation::validate_registration;
use revenda_core::{LoginRequest, LoginResponse, PublicUser, RegisterRequest, User};
use revenda_db::repository::generate_id;
use revenda_db::{Database, DbError};

use crate::auth::JwtManager;
use crate::error::{ApiError, ApiResult};
use crate::password::PasswordHasherConfig;

/// Authentication service.
pub struct AuthService {
    db: Database,
    jwt: JwtManager,
    passwords: PasswordHasherConfig,
}

impl AuthService {
    pub fn new(db: Database, jwt: JwtManager, passwords: PasswordHasherConfig) -> Self {
        AuthService { db, jwt, passwords }
    }

    /// Creates an account. The password is hashed before it is stored and
    /// the hash is never returned.
    pub async fn register(&self, req: RegisterRequest) -> ApiResult<PublicUser> {
        validate_registration(&req)?;

        let login_handle = req.login_handle.trim().to_string();

        if self.db.users().find_by_handle(&login_handle).await?.is_some() {
            warn!(login_handle = %login_handle, "Registration with a taken handle");
            return Err(DbError::duplicate("login handle", login_handle).into());
        }

        let user = User {
            id: generate_id(),
            name: req.name.trim().to_string(),
            login_handle,
            password_hash: self.passwords.hash(&req.password)?,
        };

        // The unique index still guards a concurrent registration
        self.db.users().insert(&user).await?;

        info!(user_id = %user.id, login_handle = %user.login_handle, "User registered");
        Ok(user.public())
    }

    /// Checks credentials and issues a session token.
    ///
    /// Unknown handle and wrong password fail identically.
    pub async fn login(&self, req: LoginRequest) -> ApiResult<LoginResponse> {
        let user = match self.db.users().find_by_handle(req.login_handle.trim()).await? {
            Some(user) => user,
            None => {
                warn!(login_handle = %req.login_handle, "Login for unknown handle");
                return Err(ApiError::invalid_credentials());
            }
        };

        if !self.passwords.verify(&req.password, &user.password_hash) {
            warn!(user_id = %user.id, "Login with wrong password");
            return Err(ApiError::invalid_credentials());
        }

        let public = user.public();
        let token = self.jwt.issue(&public)?;

        info!(user_id = %user.id, "User logged in");
        Ok(LoginResponse {
            token,
            user: public,
        })
    }
}

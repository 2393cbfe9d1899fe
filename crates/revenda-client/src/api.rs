//! # API Client
//!
//! Typed wrapper over the REST surface.
//!
//! ## Session Handling
//! ```text
//! ┌──────────┐  login   ┌──────────────────────────┐
//! │  caller  │ ───────► │ Arc<RwLock<Option<       │
//! └──────────┘          │        Session>>>        │
//!      │                └────────────┬─────────────┘
//!      │ authed call                 │ bearer()
//!      ▼                             ▼
//! ┌──────────────────────────────────────────────┐
//! │ Authorization: Bearer <token>  ──►  server   │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! A session past its local expiry is dropped before the request goes out.
//! A 401 from the server drops it too.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;

use revenda_core::{
    IntakeBatch, IntakeReceipt, KpiWindow, Kpis, LoginRequest, LoginResponse, NewReferenceItem,
    Product, ProductFields, ProductStock, PublicUser, RecentSale, ReferenceItem, ReferenceKind,
    RegisterRequest, SaleInput, SaleRecord, SessionInfo, StockUnit,
};

use crate::error::{ClientError, ClientResult};
use crate::session::Session;

/// Error body the server sends with every non-2xx response.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// Body of `GET /status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerStatus {
    pub status: String,
    pub database: String,
}

#[derive(Serialize)]
struct AnalyticsQuery {
    window: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<usize>,
}

/// HTTP client bound to one server.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    session: Arc<RwLock<Option<Session>>>,
}

impl ApiClient {
    /// Creates a client for the server at `base_url`.
    ///
    /// A base with a path (`https://host/api`) is kept: endpoint paths are
    /// joined beneath it.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base,
            session: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Creates an account. Does not log in.
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<PublicUser> {
        let builder = self.http.post(self.endpoint("auth/register")?).json(request);
        Self::decode(builder.send().await?).await
    }

    /// Logs in and stores the session.
    pub async fn login(&self, login_handle: &str, password: &str) -> ClientResult<PublicUser> {
        let request = LoginRequest {
            login_handle: login_handle.to_string(),
            password: password.to_string(),
        };
        let builder = self.http.post(self.endpoint("auth/login")?).json(&request);
        let response: LoginResponse = Self::decode(builder.send().await?).await?;

        let session = Session::from_login(response);
        let user = session.user.clone();
        *self.session.write().await = Some(session);

        info!(user_id = %user.id, "Logged in");
        Ok(user)
    }

    /// Drops the local session. Tokens are stateless, so nothing is sent.
    pub async fn logout(&self) {
        if self.session.write().await.take().is_some() {
            info!("Logged out");
        }
    }

    /// Current session, if any and not expired.
    pub async fn current_session(&self) -> Option<Session> {
        self.session
            .read()
            .await
            .as_ref()
            .filter(|s| !s.is_expired())
            .cloned()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current_session().await.is_some()
    }

    /// Installs a session obtained elsewhere.
    pub async fn set_session(&self, session: Session) {
        *self.session.write().await = Some(session);
    }

    /// Asks the server who the token belongs to.
    pub async fn session_info(&self) -> ClientResult<SessionInfo> {
        self.get_json("auth/session").await
    }

    /// Liveness check. No auth.
    pub async fn status(&self) -> ClientResult<ServerStatus> {
        let response = self.http.get(self.endpoint("status")?).send().await?;
        // 503 still carries a status body
        if response.status() == StatusCode::SERVICE_UNAVAILABLE {
            return Ok(response.json().await?);
        }
        Self::decode(response).await
    }

    // =========================================================================
    // Products
    // =========================================================================

    pub async fn list_products(&self) -> ClientResult<Vec<Product>> {
        self.get_json("products").await
    }

    pub async fn create_product(&self, fields: &ProductFields) -> ClientResult<Product> {
        let builder = self.authed(Method::POST, "products").await?.json(fields);
        self.send(builder).await
    }

    pub async fn update_product(&self, id: &str, fields: &ProductFields) -> ClientResult<Product> {
        let builder = self
            .authed(Method::PUT, &format!("products/{id}"))
            .await?
            .json(fields);
        self.send(builder).await
    }

    pub async fn delete_product(&self, id: &str) -> ClientResult<()> {
        self.delete(&format!("products/{id}")).await
    }

    // =========================================================================
    // Stock
    // =========================================================================

    pub async fn list_stock(&self) -> ClientResult<Vec<StockUnit>> {
        self.get_json("stock").await
    }

    pub async fn get_unit(&self, id: &str) -> ClientResult<StockUnit> {
        self.get_json(&format!("stock/{id}")).await
    }

    pub async fn intake_batch(&self, batch: &IntakeBatch) -> ClientResult<IntakeReceipt> {
        let builder = self.authed(Method::POST, "stock/intake").await?.json(batch);
        self.send(builder).await
    }

    pub async fn sell_unit(&self, id: &str, sale: &SaleInput) -> ClientResult<StockUnit> {
        let builder = self
            .authed(Method::POST, &format!("stock/{id}/sell"))
            .await?
            .json(sale);
        self.send(builder).await
    }

    pub async fn delete_unit(&self, id: &str) -> ClientResult<()> {
        self.delete(&format!("stock/{id}")).await
    }

    // =========================================================================
    // Reference Data
    // =========================================================================

    pub async fn list_reference(&self, kind: ReferenceKind) -> ClientResult<Vec<ReferenceItem>> {
        self.get_json(&format!("reference/{kind}")).await
    }

    pub async fn create_reference(
        &self,
        kind: ReferenceKind,
        name: &str,
    ) -> ClientResult<ReferenceItem> {
        let body = NewReferenceItem {
            name: name.to_string(),
        };
        let builder = self
            .authed(Method::POST, &format!("reference/{kind}"))
            .await?
            .json(&body);
        self.send(builder).await
    }

    pub async fn delete_reference(&self, kind: ReferenceKind, id: &str) -> ClientResult<()> {
        self.delete(&format!("reference/{kind}/{id}")).await
    }

    // =========================================================================
    // Server-side Analytics
    // =========================================================================

    pub async fn sales_history(&self) -> ClientResult<Vec<SaleRecord>> {
        self.get_json("analytics/sales-history").await
    }

    pub async fn kpis(&self, window: KpiWindow) -> ClientResult<Kpis> {
        let query = AnalyticsQuery {
            window: window.as_str(),
            limit: None,
        };
        let builder = self
            .authed(Method::GET, "analytics/kpis")
            .await?
            .query(&query);
        self.send(builder).await
    }

    pub async fn recent_sales(
        &self,
        window: KpiWindow,
        limit: usize,
    ) -> ClientResult<Vec<RecentSale>> {
        let query = AnalyticsQuery {
            window: window.as_str(),
            limit: Some(limit),
        };
        let builder = self
            .authed(Method::GET, "analytics/recent-sales")
            .await?
            .query(&query);
        self.send(builder).await
    }

    pub async fn stock_summary(&self) -> ClientResult<Vec<ProductStock>> {
        self.get_json("analytics/stock-summary").await
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    /// Request builder carrying the bearer token.
    async fn authed(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let bearer = {
            let guard = self.session.read().await;
            match guard.as_ref() {
                None => return Err(ClientError::NotAuthenticated),
                Some(session) if session.is_expired() => None,
                Some(session) => Some(session.bearer()),
            }
        };

        let Some(bearer) = bearer else {
            warn!("Session expired locally");
            *self.session.write().await = None;
            return Err(ClientError::SessionExpired);
        };

        debug!(%method, path, "Authenticated request");
        Ok(self
            .http
            .request(method, self.endpoint(path)?)
            .header(reqwest::header::AUTHORIZATION, bearer))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let builder = self.authed(Method::GET, path).await?;
        self.send(builder).await
    }

    async fn delete(&self, path: &str) -> ClientResult<()> {
        let builder = self.authed(Method::DELETE, path).await?;
        let _: IgnoredAny = self.send(builder).await?;
        Ok(())
    }

    /// Sends an authenticated request. A 401 or a locally expired session
    /// clears the stored session.
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let result = match builder.send().await {
            Ok(response) => Self::decode(response).await,
            Err(e) => Err(ClientError::Http(e)),
        };

        if let Err(ClientError::Api { status: 401, .. }) = &result {
            warn!("Server rejected the session token");
            *self.session.write().await = None;
        }
        result
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let text = response.text().await?;
        let (code, message) = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => (body.code, body.message),
            Err(_) => (
                status
                    .canonical_reason()
                    .unwrap_or("UNKNOWN")
                    .to_uppercase()
                    .replace(' ', "_"),
                text,
            ),
        };

        Err(ClientError::Api {
            status: status.as_u16(),
            code,
            message,
        })
    }
}

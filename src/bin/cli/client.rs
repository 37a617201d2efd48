use bitpos::dto::{
    AddFundsDto, AddFundsResponse, AdminUserView, AuthResponse, ChargeCardDto,
    ChargeCardResponse, CreateProductDto, CreateQrOrderDto, DashboardStats, LoginDto, PayDto,
    PayResponse, ProductView, QrOrderResponse, SignupDto, SuccessResponse, TransactionView,
    UpdateProductDto, UpdateProfileDto, UserView,
};
use bitpos::money::BalanceView;
use reqwest::{Client, Method};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Error type for CLI client operations
#[derive(Debug, Error)]
pub enum ClientError {
    /// Server returned an error status with a message body
    #[error("Server error ({}): {message}", status.as_u16())]
    Server { status: reqwest::StatusCode, message: String },
    /// Network/connection/request error
    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

/// Extension trait for checking HTTP responses and extracting server error messages
trait ResponseExt {
    /// Checks for error status and extracts the server's error message body
    async fn check(self) -> Result<reqwest::Response, ClientError>;
}

impl ResponseExt for reqwest::Response {
    async fn check(self) -> Result<reqwest::Response, ClientError> {
        if self.status().is_success() {
            return Ok(self);
        }
        let status = self.status();
        let message = match self.json::<serde_json::Value>().await {
            Ok(body) => body
                .get("error")
                .map(|e| match e.as_str() {
                    Some(text) => text.to_string(),
                    None => e.to_string(),
                })
                .unwrap_or_else(|| "Unknown error".to_string()),
            Err(_) => format!("HTTP {}", status),
        };
        Err(ClientError::Server { status, message })
    }
}

/// HTTP client wrapper for communicating with the BitPOS server
pub struct BitposClient {
    /// The base URL of the server (e.g. "http://localhost:3000")
    base_url: String,
    /// Bearer token sent with every request, if any
    token: Option<String>,
    /// The underlying HTTP client
    client: Client,
}

impl BitposClient {
    /// Creates a new BitposClient
    ///
    /// ### Arguments
    ///
    /// * `base_url` - The base URL of the BitPOS server
    /// * `token` - A bearer token from `auth login`, if any
    pub fn new(base_url: String, token: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            client: Client::new(),
        }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let resp = self.request(Method::GET, path).send().await?.check().await?;
        Ok(resp.json().await?)
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let resp = self
            .request(method, path)
            .json(body)
            .send()
            .await?
            .check()
            .await?;
        Ok(resp.json().await?)
    }

    // ── Auth endpoints ───────────────────────────────────────────────

    pub async fn signup(&self, dto: &SignupDto) -> Result<AuthResponse, ClientError> {
        self.send_json(Method::POST, "/api/auth/signup", dto).await
    }

    pub async fn login(&self, dto: &LoginDto) -> Result<AuthResponse, ClientError> {
        self.send_json(Method::POST, "/api/auth/login", dto).await
    }

    pub async fn me(&self) -> Result<UserView, ClientError> {
        self.get("/api/auth/me").await
    }

    pub async fn update_profile(&self, dto: &UpdateProfileDto) -> Result<UserView, ClientError> {
        self.send_json(Method::PATCH, "/api/auth/me", dto).await
    }

    // ── Vendor endpoints ─────────────────────────────────────────────

    pub async fn list_products(&self) -> Result<Vec<ProductView>, ClientError> {
        self.get("/api/vendor/products").await
    }

    pub async fn add_product(&self, dto: &CreateProductDto) -> Result<ProductView, ClientError> {
        self.send_json(Method::POST, "/api/vendor/add-product", dto).await
    }

    pub async fn update_product(
        &self,
        id: &str,
        dto: &UpdateProductDto,
    ) -> Result<ProductView, ClientError> {
        self.send_json(Method::PUT, &format!("/api/vendor/products/{}", id), dto).await
    }

    pub async fn delete_product(&self, id: &str) -> Result<SuccessResponse, ClientError> {
        let resp = self
            .request(Method::DELETE, &format!("/api/vendor/products/{}", id))
            .send()
            .await?
            .check()
            .await?;
        Ok(resp.json().await?)
    }

    pub async fn create_qr_order(
        &self,
        dto: &CreateQrOrderDto,
    ) -> Result<QrOrderResponse, ClientError> {
        self.send_json(Method::POST, "/api/vendor/create-qr-order", dto).await
    }

    pub async fn vendor_transactions(&self) -> Result<Vec<TransactionView>, ClientError> {
        self.get("/api/vendor/transactions").await
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ClientError> {
        self.get("/api/vendor/dashboard/stats").await
    }

    pub async fn charge_card(&self, dto: &ChargeCardDto) -> Result<ChargeCardResponse, ClientError> {
        self.send_json(Method::POST, "/api/vendor/charge-card", dto).await
    }

    // ── Customer endpoints ───────────────────────────────────────────

    pub async fn balance(&self) -> Result<BalanceView, ClientError> {
        self.get("/api/customer/balance").await
    }

    pub async fn add_funds(&self, dto: &AddFundsDto) -> Result<AddFundsResponse, ClientError> {
        self.send_json(Method::POST, "/api/customer/add-funds-card", dto).await
    }

    pub async fn pay(&self, dto: &PayDto) -> Result<PayResponse, ClientError> {
        self.send_json(Method::POST, "/api/customer/pay", dto).await
    }

    pub async fn customer_transactions(&self) -> Result<Vec<TransactionView>, ClientError> {
        self.get("/api/customer/transactions").await
    }

    // ── Admin endpoints ──────────────────────────────────────────────

    pub async fn list_users(&self) -> Result<Vec<AdminUserView>, ClientError> {
        self.get("/api/admin/list-users").await
    }
}

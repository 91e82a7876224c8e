use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use thiserror::Error;

use crate::store::models::{Product, UserProfile};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response; carries the server's `{message}` when it sent one.
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    #[error("not logged in; run `catalog auth login` first")]
    NotLoggedIn,
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Thin typed wrapper over the Catalog API routes.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}/api{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn authed(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        if self.token.is_none() {
            return Err(ClientError::NotLoggedIn);
        }
        Ok(self.request(method, path))
    }

    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| body.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ClientError> {
        let response = Self::check(builder.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    pub async fn health(&self) -> Result<Value, ClientError> {
        Self::json(self.request(Method::GET, "/health")).await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<String, ClientError> {
        let body: Value = Self::json(
            self.request(Method::POST, "/auth/login")
                .json(&json!({ "username": username, "password": password })),
        )
        .await?;

        body.get("token")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ClientError::Api {
                status: StatusCode::OK.as_u16(),
                message: "login response did not contain a token".to_string(),
            })
    }

    pub async fn me(&self) -> Result<UserProfile, ClientError> {
        #[derive(serde::Deserialize)]
        struct MeBody {
            user: UserProfile,
        }

        let body: MeBody = Self::json(self.authed(Method::GET, "/auth/me")?).await?;
        Ok(body.user)
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        Self::check(self.authed(Method::POST, "/auth/logout")?.send().await?).await?;
        Ok(())
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, ClientError> {
        Self::json(self.request(Method::GET, "/products")).await
    }

    pub async fn get_product(&self, id: u64) -> Result<Product, ClientError> {
        Self::json(self.request(Method::GET, &format!("/products/{}", id))).await
    }

    pub async fn create_product(&self, data: &Value) -> Result<Product, ClientError> {
        Self::json(self.authed(Method::POST, "/products")?.json(data)).await
    }

    pub async fn update_product(&self, id: u64, data: &Value) -> Result<Product, ClientError> {
        Self::json(self.authed(Method::PUT, &format!("/products/{}", id))?.json(data)).await
    }

    pub async fn delete_product(&self, id: u64) -> Result<(), ClientError> {
        Self::check(self.authed(Method::DELETE, &format!("/products/{}", id))?.send().await?).await?;
        Ok(())
    }
}

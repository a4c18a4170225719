//! YooKassa gateway client.
//!
//! The relay handlers talk to the gateway only through [`PaymentGateway`],
//! which hands back the raw status code and body so the handlers can
//! forward gateway failures verbatim.

use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::catalog::{ServiceType, CURRENCY};
use crate::config::ServerConfig;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("gateway request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected gateway response: {0}")]
    Decode(#[from] serde_json::Error),
}

// ============================================================================
// Request / response shapes
// ============================================================================

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Amount {
    pub value: String,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Confirmation {
    #[serde(rename = "type")]
    pub kind: String,
    pub return_url: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PaymentMetadata {
    pub service_type: ServiceType,
    pub created_at: String,
    /// Client data rendered as a JSON string (metadata values are strings)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
}

/// Body of `POST /v3/payments`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PaymentRequest {
    pub amount: Amount,
    pub capture: bool,
    pub confirmation: Confirmation,
    pub description: String,
    pub metadata: PaymentMetadata,
}

impl PaymentRequest {
    /// Build the gateway request for a catalog service.
    ///
    /// `user_data` is attached only when it carries something (not null and
    /// not an empty string, array or object).
    pub fn for_service(service: ServiceType, user_data: Option<&Value>, created_at: DateTime<Local>) -> Self {
        let offer = service.offer();
        let user_data = user_data.filter(|v| !is_blank(v)).map(Value::to_string);

        Self {
            amount: Amount { value: offer.amount.to_string(), currency: CURRENCY.to_string() },
            capture: true,
            confirmation: Confirmation {
                kind: "redirect".to_string(),
                return_url: offer.return_url.to_string(),
            },
            description: offer.description.to_string(),
            metadata: PaymentMetadata {
                service_type: service,
                created_at: created_at.to_rfc3339(),
                user_data,
            },
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

/// Fields of a freshly created payment the relay passes on.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedPayment {
    pub id: String,
    pub status: String,
    pub confirmation: CreatedConfirmation,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedConfirmation {
    pub confirmation_url: String,
}

/// Fields of a payment status lookup the relay passes on.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentStatus {
    pub status: String,
    pub paid: bool,
    pub amount: Value,
    #[serde(default = "empty_object")]
    pub metadata: Value,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Raw gateway answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    pub status: u16,
    pub body: String,
}

impl GatewayResponse {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, GatewayError> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

// ============================================================================
// Gateway trait + YooKassa implementation
// ============================================================================

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment. `idempotence_key` must be unique per attempt.
    async fn create_payment(
        &self,
        request: &PaymentRequest,
        idempotence_key: &str,
    ) -> Result<GatewayResponse, GatewayError>;

    /// Look up a payment by gateway id.
    async fn get_payment(&self, payment_id: &str) -> Result<GatewayResponse, GatewayError>;
}

/// HTTP client for the YooKassa payments API (basic auth: shop id / secret key).
pub struct YooKassaGateway {
    client: reqwest::Client,
    api_url: String,
    shop_id: String,
    secret_key: String,
}

impl YooKassaGateway {
    pub fn new(api_url: &str, shop_id: &str, secret_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            shop_id: shop_id.to_string(),
            secret_key: secret_key.to_string(),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(&config.gateway_url, &config.shop_id, &config.secret_key)
    }

    async fn into_gateway_response(response: reqwest::Response) -> Result<GatewayResponse, GatewayError> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(GatewayResponse { status, body })
    }
}

#[async_trait]
impl PaymentGateway for YooKassaGateway {
    async fn create_payment(
        &self,
        request: &PaymentRequest,
        idempotence_key: &str,
    ) -> Result<GatewayResponse, GatewayError> {
        tracing::debug!("POST {} (idempotence key {})", self.api_url, idempotence_key);
        let response = self
            .client
            .post(&self.api_url)
            .basic_auth(&self.shop_id, Some(&self.secret_key))
            .header("Idempotence-Key", idempotence_key)
            .json(request)
            .send()
            .await?;
        Self::into_gateway_response(response).await
    }

    async fn get_payment(&self, payment_id: &str) -> Result<GatewayResponse, GatewayError> {
        let url = format!("{}/{}", self.api_url, payment_id);
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .basic_auth(&self.shop_id, Some(&self.secret_key))
            .send()
            .await?;
        Self::into_gateway_response(response).await
    }
}

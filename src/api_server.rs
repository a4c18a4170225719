// Payment relay: Axum API server
//
// Purpose: forward payment creation / status checks to YooKassa and accept
// its webhooks. Responses keep the JSON shapes the front-end already uses.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::payments::gateway::{CreatedPayment, PaymentGateway, PaymentRequest, PaymentStatus, YooKassaGateway};
use crate::payments::ledger::{PaymentLedger, PaymentRecord};
use crate::payments::ServiceType;

pub const EVENT_PAYMENT_SUCCEEDED: &str = "payment.succeeded";

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn PaymentGateway>,
    pub ledger: Arc<PaymentLedger>,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        tracing::info!("Using payment gateway at {}", config.gateway_url);
        tracing::info!("Payment ledger: {}", config.ledger_path.display());
        Self::with_gateway(
            Arc::new(YooKassaGateway::from_config(config)),
            Arc::new(PaymentLedger::new(config.ledger_path.clone())),
        )
    }

    /// State over any gateway implementation (tests use an in-memory one).
    pub fn with_gateway(gateway: Arc<dyn PaymentGateway>, ledger: Arc<PaymentLedger>) -> Self {
        Self { gateway, ledger }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Payment endpoints
        .route("/create-payment", post(create_payment))
        .route("/check-payment/:payment_id", get(check_payment))

        // Gateway notifications
        .route("/webhook", post(webhook))

        // Middleware (applied in reverse order)
        .layer(CorsLayer::permissive()) // Front-end is served from another origin
        .layer(TraceLayer::new_for_http()) // Request logging
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Local::now().to_rfc3339()
    }))
}

#[derive(Debug, Deserialize)]
struct CreatePaymentBody {
    /// `None` only when the field is absent; an explicit `null` is `Some(Value::Null)`
    #[serde(default, deserialize_with = "present_value")]
    service_type: Option<Value>,
    #[serde(default)]
    user_data: Option<Value>,
}

async fn create_payment(
    State(state): State<AppState>,
    Json(body): Json<CreatePaymentBody>,
) -> Result<Json<Value>, AppError> {
    let service = match body.service_type {
        None => ServiceType::default(),
        Some(raw) => raw
            .as_str()
            .and_then(ServiceType::parse)
            .ok_or_else(|| AppError::BadRequest("Неверный тип услуги".to_string()))?,
    };

    let idempotence_key = uuid::Uuid::new_v4().to_string();
    let request = PaymentRequest::for_service(service, body.user_data.as_ref(), chrono::Local::now());

    tracing::info!("Creating {} payment", service.as_str());
    let response = state
        .gateway
        .create_payment(&request, &idempotence_key)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !response.is_success() {
        tracing::warn!("Gateway rejected payment creation with status {}", response.status);
        return Err(AppError::Upstream {
            status: response.status,
            error: "Ошибка создания платежа",
            details: response.body,
        });
    }

    let payment: CreatedPayment = response
        .json()
        .map_err(|e| AppError::Internal(e.to_string()))?;
    tracing::info!("Created payment {} ({})", payment.id, payment.status);

    Ok(Json(json!({
        "success": true,
        "payment_id": payment.id,
        "confirmation_url": payment.confirmation.confirmation_url,
        "status": payment.status,
    })))
}

async fn check_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    if !is_valid_payment_id(&payment_id) {
        return Err(AppError::BadRequest("Некорректный идентификатор платежа".to_string()));
    }

    let response = state
        .gateway
        .get_payment(&payment_id)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !response.is_success() {
        tracing::warn!("Gateway status lookup for {} failed with {}", payment_id, response.status);
        return Err(AppError::Upstream {
            status: response.status,
            error: "Ошибка проверки платежа",
            details: response.body,
        });
    }

    let payment: PaymentStatus = response
        .json()
        .map_err(|e| AppError::Internal(e.to_string()))?;
    tracing::debug!("Payment {} is {} (paid: {})", payment_id, payment.status, payment.paid);

    Ok(Json(json!({
        "success": true,
        "status": payment.status,
        "paid": payment.paid,
        "amount": payment.amount,
        "metadata": payment.metadata,
    })))
}

#[derive(Debug, Deserialize)]
struct WebhookEvent {
    #[serde(default)]
    event: Option<String>,
    #[serde(default)]
    object: Option<Value>,
}

async fn webhook(
    State(state): State<AppState>,
    Json(notification): Json<WebhookEvent>,
) -> Result<Json<Value>, AppError> {
    let event = notification.event.as_deref().unwrap_or_default();
    tracing::debug!("Webhook event '{}'", event);

    if event == EVENT_PAYMENT_SUCCEEDED {
        let object = notification.object.unwrap_or(Value::Null);
        let metadata = object.get("metadata").cloned().unwrap_or_else(|| json!({}));

        match object.get("id").and_then(Value::as_str) {
            Some(payment_id) => {
                tracing::info!("Payment {} succeeded, metadata: {}", payment_id, metadata);
                let record = PaymentRecord::from_webhook(event, payment_id, &metadata);
                state.ledger.append(&record).await.map_err(|e| {
                    tracing::error!("Failed to record payment {}: {}", payment_id, e);
                    AppError::Internal(e.to_string())
                })?;
            }
            None => tracing::warn!("{} notification without payment id", EVENT_PAYMENT_SUCCEEDED),
        }
    }

    Ok(Json(json!({ "success": true })))
}

// ============================================================================
// Helper Functions
// ============================================================================

fn present_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// Gateway ids are UUID-like; anything else never reaches the gateway URL.
fn is_valid_payment_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 64
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Internal(String),
    /// Gateway answered with a non-success status; forwarded as-is
    Upstream {
        status: u16,
        error: &'static str,
        details: String,
    },
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg })),
            AppError::Upstream { status, error, details } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                json!({ "error": error, "details": details }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

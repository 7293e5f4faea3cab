//! HTTP handlers for payment endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{FromRequestParts, Json, Path, RawQuery, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;

use crate::application::handlers::payment::{
    CreatePaymentCommand, CreatePaymentHandler, GetPaymentHandler, GetPaymentQuery,
    HandlePaymentCallbackCommand, HandlePaymentCallbackHandler, HandlePaymentCallbackResult,
};
use crate::domain::foundation::{ErrorCode, PaymentId, UserId};
use crate::domain::payment::{GatewayResponseCode, PaymentError, PaymentStatus};
use crate::ports::{PaymentGateway, PaymentRepository};

use super::dto::{
    CreatePaymentRequest, CreatePaymentResponse, ErrorResponse, IpnResponse,
    PaymentResponse, PaymentReturnResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for payment endpoints.
#[derive(Clone)]
pub struct PaymentAppState {
    pub payment_repository: Arc<dyn PaymentRepository>,
    pub gateway: Arc<dyn PaymentGateway>,
    /// Minutes a new payment stays payable.
    pub expire_minutes: i64,
}

impl PaymentAppState {
    pub fn create_payment_handler(&self) -> CreatePaymentHandler {
        CreatePaymentHandler::new(
            self.payment_repository.clone(),
            self.gateway.clone(),
            self.expire_minutes,
        )
    }

    pub fn get_payment_handler(&self) -> GetPaymentHandler {
        GetPaymentHandler::new(self.payment_repository.clone())
    }

    pub fn callback_handler(&self) -> HandlePaymentCallbackHandler {
        HandlePaymentCallbackHandler::new(self.payment_repository.clone(), self.gateway.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Request Context
// ════════════════════════════════════════════════════════════════════════════════

/// Authenticated user context extracted from request.
///
/// Identity comes from the `X-User-Id` header set by the upstream gateway.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Rejection type for AuthenticatedUser extraction.
pub struct AuthenticationRequired;

impl IntoResponse for AuthenticationRequired {
    fn into_response(self) -> axum::response::Response {
        let error = ErrorResponse::new(
            ErrorCode::Unauthorized.to_string(),
            "Authentication is required",
        );
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthenticationRequired;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("X-User-Id")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| UserId::new(s).ok())
            .ok_or(AuthenticationRequired)?;

        Ok(AuthenticatedUser { user_id })
    }
}

/// Customer IP for `vnp_IpAddr`: first `X-Forwarded-For` hop, then
/// `X-Real-IP`, then loopback.
pub fn client_ip(headers: &HeaderMap) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    header("X-Forwarded-For")
        .and_then(|v| v.split(',').next().map(|s| s.trim().to_string()))
        .filter(|s| !s.is_empty())
        .or_else(|| header("X-Real-IP").map(|s| s.trim().to_string()))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "127.0.0.1".to_string())
}

// ════════════════════════════════════════════════════════════════════════════════
// User Endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/payments - Start a payment, returns the gateway URL
pub async fn create_payment(
    State(state): State<PaymentAppState>,
    user: AuthenticatedUser,
    headers: HeaderMap,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<impl IntoResponse, PaymentApiError> {
    let handler = state.create_payment_handler();
    let cmd = CreatePaymentCommand {
        user_id: user.user_id,
        course_id: request.course_id,
        amount: request.amount,
        order_info: request.order_info,
        client_ip: client_ip(&headers),
        bank_code: request.bank_code,
    };

    let result = handler.handle(cmd).await?;

    let response = CreatePaymentResponse {
        payment_id: result.payment.id.to_string(),
        payment_url: result.payment_url,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/payments/:id - Get one of the current user's payments
pub async fn get_payment(
    State(state): State<PaymentAppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, PaymentApiError> {
    let payment_id: PaymentId = id
        .parse()
        .map_err(|_| PaymentError::validation("id", "must be a UUID"))?;

    let handler = state.get_payment_handler();
    let payment = handler
        .handle(GetPaymentQuery {
            payment_id,
            user_id: user.user_id,
        })
        .await?;

    Ok(Json(PaymentResponse::from(payment)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Gateway Callbacks (no auth, signature verified)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/payments/vnpay/return - Browser redirect back from the gateway
pub async fn vnpay_return(
    State(state): State<PaymentAppState>,
    RawQuery(query): RawQuery,
) -> Result<impl IntoResponse, PaymentApiError> {
    let handler = state.callback_handler();
    let result = handler
        .handle(HandlePaymentCallbackCommand {
            raw_query: query.unwrap_or_default(),
        })
        .await?;

    let message = match &result {
        HandlePaymentCallbackResult::Settled { response_code, .. } => {
            response_code.description().to_string()
        }
        HandlePaymentCallbackResult::AlreadySettled { payment } => {
            let code = GatewayResponseCode::new(payment.response_code.clone().unwrap_or_default());
            code.description().to_string()
        }
    };
    let payment = result.payment();

    Ok(Json(PaymentReturnResponse {
        success: payment.status == PaymentStatus::Success,
        status: payment.status,
        payment_id: payment.id.to_string(),
        message,
    }))
}

/// GET /api/payments/vnpay/ipn - Server-to-server payment notification
///
/// Always answers 200; the outcome is carried in `RspCode`.
pub async fn vnpay_ipn(
    State(state): State<PaymentAppState>,
    RawQuery(query): RawQuery,
) -> Json<IpnResponse> {
    let handler = state.callback_handler();
    let result = handler
        .handle(HandlePaymentCallbackCommand {
            raw_query: query.unwrap_or_default(),
        })
        .await;

    let response = match result {
        Ok(HandlePaymentCallbackResult::Settled { .. }) => IpnResponse::confirmed(),
        Ok(HandlePaymentCallbackResult::AlreadySettled { .. }) => IpnResponse::already_confirmed(),
        Err(PaymentError::InvalidSignature) => IpnResponse::invalid_signature(),
        Err(PaymentError::NotFound(_)) => IpnResponse::order_not_found(),
        Err(PaymentError::AmountMismatch { .. }) => IpnResponse::invalid_amount(),
        Err(PaymentError::AlreadyFinalized(_)) => IpnResponse::already_confirmed(),
        Err(err) => {
            tracing::error!(error = %err, "IPN processing failed");
            IpnResponse::unknown_error()
        }
    };

    Json(response)
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts payment errors to HTTP responses.
#[derive(Debug)]
pub struct PaymentApiError(PaymentError);

impl From<PaymentError> for PaymentApiError {
    fn from(err: PaymentError) -> Self {
        Self(err)
    }
}

impl IntoResponse for PaymentApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            PaymentError::NotFound(_) => StatusCode::NOT_FOUND,
            PaymentError::InvalidSignature => StatusCode::UNAUTHORIZED,
            PaymentError::AmountMismatch { .. } => StatusCode::BAD_REQUEST,
            PaymentError::AlreadyFinalized(_) | PaymentError::InvalidState { .. } => {
                StatusCode::CONFLICT
            }
            PaymentError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            PaymentError::Configuration(_) | PaymentError::Infrastructure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "Payment request failed");
        }

        let error_code = self.0.code().to_string();
        let body = match &self.0 {
            PaymentError::ValidationFailed { field, .. } => ErrorResponse::with_details(
                error_code,
                self.0.message(),
                serde_json::json!({ "field": field }),
            ),
            // Internal details stay in the log.
            PaymentError::Configuration(_) | PaymentError::Infrastructure(_) => {
                ErrorResponse::new(error_code, "Internal error")
            }
            _ => ErrorResponse::new(error_code, self.0.message()),
        };
        (status, Json(body)).into_response()
    }
}

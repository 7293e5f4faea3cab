//! Axum router configuration for payment endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    create_payment, get_payment, vnpay_ipn, vnpay_return, PaymentAppState,
};

/// Create the payment API router.
///
/// # Routes
///
/// ## User Endpoints (require authentication)
/// - `POST /` - Start a payment and get the gateway URL
/// - `GET /:id` - Get payment details
///
/// ## Gateway Endpoints (no auth, signature verified)
/// - `GET /vnpay/return` - Browser return from the gateway
/// - `GET /vnpay/ipn` - Server-to-server notification
pub fn payment_routes() -> Router<PaymentAppState> {
    Router::new()
        // User endpoints
        .route("/", post(create_payment))
        .route("/:id", get(get_payment))
        // Gateway endpoints
        .route("/vnpay/return", get(vnpay_return))
        .route("/vnpay/ipn", get(vnpay_ipn))
}

/// Create the complete payment module router, mounted at `/api/payments`.
///
/// # Example
///
/// ```ignore
/// let app = Router::new()
///     .merge(payment_router())
///     .with_state(payment_state);
/// ```
pub fn payment_router() -> Router<PaymentAppState> {
    Router::new().nest("/api/payments", payment_routes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::adapters::memory::InMemoryPaymentRepository;
    use crate::application::handlers::payment::test_support::{
        gateway, pending_payment, repo_with, signed_callback,
    };
    use crate::domain::payment::PaymentStatus;
    use crate::ports::PaymentRepository;

    fn app(repo: Arc<InMemoryPaymentRepository>) -> Router {
        let state = PaymentAppState {
            payment_repository: repo,
            gateway: gateway(),
            expire_minutes: 15,
        };
        payment_router().with_state(state)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    // ════════════════════════════════════════════════════════════════════
    // Create / Get
    // ════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn create_payment_returns_signed_url() {
        let repo = Arc::new(InMemoryPaymentRepository::new());
        let body = serde_json::json!({
            "course_id": uuid::Uuid::new_v4(),
            "amount": 100_000,
            "order_info": "Rust fundamentals",
        });

        let response = app(repo.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/payments")
                    .header("content-type", "application/json")
                    .header("X-User-Id", "user-1")
                    .header("X-Forwarded-For", "203.0.113.7")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        let url = json["payment_url"].as_str().unwrap();
        assert!(url.starts_with("https://sandbox.vnpayment.vn/paymentv2/vpcpay.html?"));
        assert!(url.contains("vnp_Amount=10000000"));
        assert!(url.contains("vnp_IpAddr=203.0.113.7"));
        assert!(url.contains("&vnp_SecureHash="));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn create_payment_without_user_is_401() {
        let repo = Arc::new(InMemoryPaymentRepository::new());
        let body = serde_json::json!({
            "course_id": uuid::Uuid::new_v4(),
            "amount": 100_000,
            "order_info": "Rust fundamentals",
        });

        let response = app(repo.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/payments")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn create_payment_below_minimum_is_400() {
        let repo = Arc::new(InMemoryPaymentRepository::new());
        let body = serde_json::json!({
            "course_id": uuid::Uuid::new_v4(),
            "amount": 100,
            "order_info": "Rust fundamentals",
        });

        let response = app(repo)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/payments")
                    .header("content-type", "application/json")
                    .header("X-User-Id", "user-1")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_payment_returns_owned_payment() {
        let payment = pending_payment("user-1", 100_000);
        let repo = repo_with(&[&payment]).await;

        let response = app(repo)
            .oneshot(
                Request::builder()
                    .uri(format!("/api/payments/{}", payment.id))
                    .header("X-User-Id", "user-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["id"], payment.id.to_string());
        assert_eq!(json["status"], "pending");
    }

    #[tokio::test]
    async fn get_payment_of_other_user_is_404() {
        let payment = pending_payment("user-1", 100_000);
        let repo = repo_with(&[&payment]).await;

        let response = app(repo)
            .oneshot(
                Request::builder()
                    .uri(format!("/api/payments/{}", payment.id))
                    .header("X-User-Id", "user-2")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn get_payment_with_malformed_id_is_400() {
        let repo = Arc::new(InMemoryPaymentRepository::new());

        let response = app(repo)
            .oneshot(
                Request::builder()
                    .uri("/api/payments/not-a-uuid")
                    .header("X-User-Id", "user-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // ════════════════════════════════════════════════════════════════════
    // Gateway callbacks
    // ════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn return_url_settles_payment() {
        let payment = pending_payment("user-1", 100_000);
        let repo = repo_with(&[&payment]).await;
        let query = signed_callback(&payment.txn_ref(), 100_000, "00");

        let response = app(repo.clone())
            .oneshot(
                Request::builder()
                    .uri(format!("/api/payments/vnpay/return?{}", query))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["status"], "success");

        let stored = repo.find_by_id(&payment.id).await.unwrap().unwrap();
        assert_eq!(stored.status, PaymentStatus::Success);
    }

    #[tokio::test]
    async fn return_url_with_bad_signature_is_401() {
        let payment = pending_payment("user-1", 100_000);
        let repo = repo_with(&[&payment]).await;
        let query = signed_callback(&payment.txn_ref(), 100_000, "00")
            .replace("vnp_BankCode=NCB", "vnp_BankCode=VCB");

        let response = app(repo.clone())
            .oneshot(
                Request::builder()
                    .uri(format!("/api/payments/vnpay/return?{}", query))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let stored = repo.find_by_id(&payment.id).await.unwrap().unwrap();
        assert_eq!(stored.status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn ipn_confirms_then_reports_already_confirmed() {
        let payment = pending_payment("user-1", 100_000);
        let repo = repo_with(&[&payment]).await;
        let query = signed_callback(&payment.txn_ref(), 100_000, "00");
        let app = app(repo);

        let request = || {
            Request::builder()
                .uri(format!("/api/payments/vnpay/ipn?{}", query))
                .body(Body::empty())
                .unwrap()
        };

        let first = app.clone().oneshot(request()).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(body_json(first).await["RspCode"], "00");

        let second = app.oneshot(request()).await.unwrap();
        assert_eq!(second.status(), StatusCode::OK);
        assert_eq!(body_json(second).await["RspCode"], "02");
    }

    #[tokio::test]
    async fn ipn_reports_invalid_signature_as_97() {
        let payment = pending_payment("user-1", 100_000);
        let repo = repo_with(&[&payment]).await;
        let query = signed_callback(&payment.txn_ref(), 100_000, "00")
            .replace("vnp_Amount=10000000", "vnp_Amount=100");

        let response = app(repo)
            .oneshot(
                Request::builder()
                    .uri(format!("/api/payments/vnpay/ipn?{}", query))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["RspCode"], "97");
    }

    #[tokio::test]
    async fn ipn_reports_unknown_order_as_01() {
        let repo = Arc::new(InMemoryPaymentRepository::new());
        let query = signed_callback(&crate::domain::foundation::PaymentId::new().txn_ref(), 100_000, "00");

        let response = app(repo)
            .oneshot(
                Request::builder()
                    .uri(format!("/api/payments/vnpay/ipn?{}", query))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(body_json(response).await["RspCode"], "01");
    }

    #[tokio::test]
    async fn ipn_reports_amount_mismatch_as_04() {
        let payment = pending_payment("user-1", 100_000);
        let repo = repo_with(&[&payment]).await;
        let query = signed_callback(&payment.txn_ref(), 50_000, "00");

        let response = app(repo)
            .oneshot(
                Request::builder()
                    .uri(format!("/api/payments/vnpay/ipn?{}", query))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(body_json(response).await["RspCode"], "04");
    }
}

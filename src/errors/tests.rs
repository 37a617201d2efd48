use super::*;
use axum::body::to_bytes;
use axum::response::IntoResponse;

/// Helper to extract status code and body JSON from an ApiError response
async fn error_response(error: ApiError) -> (StatusCode, serde_json::Value) {
    let response = error.into_response();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    (status, json)
}

#[tokio::test]
async fn test_internal_error_keeps_message() {
    let error = ApiError::Internal(anyhow::anyhow!("disk I/O error"));
    let (status, body) = error_response(error).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "disk I/O error");
}

#[tokio::test]
async fn test_not_found_response() {
    let (status, body) = error_response(ApiError::NotFound("Wallet not found".into())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Wallet not found");
}

#[tokio::test]
async fn test_validation_response() {
    let (status, body) = error_response(ApiError::Validation("Insufficient balance".into())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Insufficient balance");
}

#[tokio::test]
async fn test_unauthorized_response() {
    let (status, body) = error_response(ApiError::Unauthorized("No token provided".into())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "No token provided");
}

#[tokio::test]
async fn test_forbidden_response() {
    let (status, body) =
        error_response(ApiError::Forbidden("Insufficient permissions".into())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Insufficient permissions");
}

#[tokio::test]
async fn test_conflict_response() {
    let (status, body) =
        error_response(ApiError::Conflict("Order already completed".into())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Order already completed");
}

#[test]
fn test_anyhow_converts_to_internal_error() {
    let error: ApiError = anyhow::anyhow!("boom").into();
    assert!(matches!(error, ApiError::Internal(_)));
    assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_ledger_error_statuses() {
    let cases = [
        (LedgerError::WalletNotFound, StatusCode::NOT_FOUND, "Wallet not found"),
        (LedgerError::VendorWalletNotFound, StatusCode::NOT_FOUND, "Vendor wallet not found"),
        (LedgerError::InsufficientBalance, StatusCode::BAD_REQUEST, "Insufficient balance"),
        (LedgerError::OrderAlreadyCompleted, StatusCode::CONFLICT, "Order already completed"),
        (
            LedgerError::BalanceLimitExceeded,
            StatusCode::BAD_REQUEST,
            "Balance would exceed the maximum amount",
        ),
        (
            LedgerError::UnknownProducts,
            StatusCode::BAD_REQUEST,
            "Some products not found or not owned by vendor",
        ),
        (
            LedgerError::Payment(crate::payments::PaymentError::Declined),
            StatusCode::BAD_REQUEST,
            "Payment failed. Please use a card starting with 4242 for demo.",
        ),
    ];

    for (error, expected_status, expected_message) in cases {
        let (status, body) = error_response(ApiError::from(error)).await;
        assert_eq!(status, expected_status);
        assert_eq!(body["error"], expected_message);
    }
}

#[tokio::test]
async fn test_ledger_database_error_is_internal() {
    let error = ApiError::from(LedgerError::Database(diesel::result::Error::NotFound));
    assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_duplicate_email_is_bad_request() {
    let (status, body) = error_response(ApiError::from(UserError::EmailTaken)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "User already exists");
}

use super::*;
use axum::http::Request;

fn keys() -> TokenKeys {
    TokenKeys::new("test-secret", 168)
}

#[test]
fn test_hash_and_verify_password() {
    let hash = hash_password("password123").unwrap();

    assert!(hash.starts_with("$argon2"));
    assert!(verify_password(&hash, "password123").unwrap());
    assert!(!verify_password(&hash, "password124").unwrap());
}

#[test]
fn test_hash_uses_random_salt() {
    let first = hash_password("password123").unwrap();
    let second = hash_password("password123").unwrap();
    assert_ne!(first, second);
}

#[test]
fn test_verify_rejects_garbage_hash() {
    assert!(verify_password("not-a-hash", "password123").is_err());
}

#[test]
fn test_issue_and_verify_token() {
    let keys = keys();
    let token = keys.issue("user-1", Role::Vendor).unwrap();

    assert_eq!(token.split('.').count(), 3);
    let claims = keys.verify(&token).unwrap();
    assert_eq!(claims.user_id, "user-1");
    assert_eq!(claims.role, Role::Vendor);
    assert_eq!(claims.exp - claims.iat, 168 * 3600);
}

#[test]
fn test_token_lifetime_is_clamped() {
    let now = Utc::now();
    for (ttl_hours, expected_hours) in [(0, 1), (-24, 1), (i64::MAX, MAX_TOKEN_TTL_HOURS)] {
        let keys = TokenKeys::new("test-secret", ttl_hours);
        let token = keys.issue_at("user-1", Role::Vendor, now).unwrap();
        let claims = keys.verify_at(&token, now).unwrap();
        assert_eq!(claims.exp - claims.iat, expected_hours * 3600);
    }
}

#[test]
fn test_expiry_past_max_date_is_an_error() {
    let result = keys().issue_at("user-1", Role::Vendor, DateTime::<Utc>::MAX_UTC);
    assert_eq!(result, Err(TokenError::ExpiryOutOfRange));
}

#[test]
fn test_claims_are_camel_case() {
    let token = keys().issue("user-1", Role::Customer).unwrap();
    let claims_part = token.split('.').nth(1).unwrap();
    let json: serde_json::Value =
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(claims_part).unwrap()).unwrap();

    assert_eq!(json["userId"], "user-1");
    assert_eq!(json["role"], "CUSTOMER");
}

#[test]
fn test_expired_token_is_rejected() {
    let keys = keys();
    let issued = Utc::now() - Duration::hours(200);
    let token = keys.issue_at("user-1", Role::Customer, issued).unwrap();

    assert_eq!(keys.verify(&token), Err(TokenError::Expired));
}

#[test]
fn test_token_signed_with_other_secret_is_rejected() {
    let token = TokenKeys::new("other-secret", 168)
        .issue("user-1", Role::Vendor)
        .unwrap();
    assert_eq!(keys().verify(&token), Err(TokenError::BadSignature));
}

#[test]
fn test_tampered_claims_are_rejected() {
    let keys = keys();
    let token = keys.issue("user-1", Role::Customer).unwrap();
    let parts: Vec<&str> = token.split('.').collect();

    let forged_claims = URL_SAFE_NO_PAD.encode(
        serde_json::to_vec(&serde_json::json!({
            "userId": "user-1",
            "role": "VENDOR",
            "iat": 0,
            "exp": i64::MAX,
        }))
        .unwrap(),
    );
    let forged = format!("{}.{}.{}", parts[0], forged_claims, parts[2]);

    assert_eq!(keys.verify(&forged), Err(TokenError::BadSignature));
}

#[test]
fn test_unsupported_algorithm_is_rejected() {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let token = format!("{}.e30.", header);
    assert_eq!(
        keys().verify(&token),
        Err(TokenError::UnsupportedAlgorithm("none".to_string()))
    );
}

#[test]
fn test_malformed_tokens_are_rejected() {
    let keys = keys();
    assert_eq!(keys.verify("garbage"), Err(TokenError::Malformed));
    assert_eq!(keys.verify("a.b"), Err(TokenError::Malformed));
    assert_eq!(keys.verify("a.b.c.d"), Err(TokenError::Malformed));
    assert_eq!(keys.verify("!!.!!.!!"), Err(TokenError::Malformed));
}

#[test]
fn test_debug_hides_secret() {
    let rendered = format!("{:?}", keys());
    assert!(!rendered.contains("test-secret"));
}

fn parts_with(auth: Option<&str>) -> Parts {
    let mut builder = Request::builder().uri("/");
    if let Some(value) = auth {
        builder = builder.header(AUTHORIZATION, value);
    }
    builder.body(()).unwrap().into_parts().0
}

#[tokio::test]
async fn test_extractor_requires_header() {
    let mut parts = parts_with(None);
    let err = AuthUser::from_request_parts(&mut parts, &keys()).await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(ref msg) if msg == "No token provided"));

    let mut parts = parts_with(Some("Basic abc"));
    let err = AuthUser::from_request_parts(&mut parts, &keys()).await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(ref msg) if msg == "No token provided"));
}

#[tokio::test]
async fn test_extractor_rejects_bad_token() {
    let mut parts = parts_with(Some("Bearer not.a.token"));
    let err = AuthUser::from_request_parts(&mut parts, &keys()).await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(ref msg) if msg == "Invalid token"));
}

#[tokio::test]
async fn test_role_extractors() {
    let keys = keys();
    let vendor_token = keys.issue("vendor-1", Role::Vendor).unwrap();
    let header = format!("Bearer {}", vendor_token);

    let mut parts = parts_with(Some(&header));
    let VendorUser(user) = VendorUser::from_request_parts(&mut parts, &keys).await.unwrap();
    assert_eq!(user.user_id, "vendor-1");

    let mut parts = parts_with(Some(&header));
    let err = CustomerUser::from_request_parts(&mut parts, &keys).await.unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(ref msg) if msg == "Insufficient permissions"));
}

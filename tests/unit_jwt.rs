use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::json;

use eduplatform_auth::{
    AuthError, Principal, Role, issue_token, issue_token_at, verify_token, verify_token_at,
};
use eduplatform_config::JwtConfig;

const SECRET: &str = "unit-test-secret";
const THIRTY_DAYS: i64 = 30 * 24 * 60 * 60;

fn config() -> JwtConfig {
    JwtConfig::new(SECRET, THIRTY_DAYS)
}

#[test]
fn test_round_trip_for_every_role() {
    for role in Role::ALL {
        let principal = Principal::new("user-123", role);
        let token = issue_token(&principal, &config()).unwrap();
        let decoded = verify_token(&token, &config()).unwrap();
        assert_eq!(decoded.subject_id, "user-123");
        assert_eq!(decoded.role, role);
    }
}

#[test]
fn test_round_trip_is_deep_equal() {
    let principal = Principal::new("u1", Role::Instructor);
    let token = issue_token(&principal, &config()).unwrap();
    assert_eq!(verify_token(&token, &config()).unwrap(), principal);
}

#[test]
fn test_tampered_signature_is_invalid() {
    let token = issue_token(&Principal::new("u1", Role::Student), &config()).unwrap();
    let (rest, signature) = token.rsplit_once('.').unwrap();
    let flipped = if signature.starts_with('A') { "B" } else { "A" };
    let tampered = format!("{rest}.{flipped}{}", &signature[1..]);

    let err = verify_token(&tampered, &config()).unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredential));
}

#[test]
fn test_token_signed_with_other_secret_is_invalid() {
    let token = issue_token(
        &Principal::new("u1", Role::Admin),
        &JwtConfig::new("some-other-secret", THIRTY_DAYS),
    )
    .unwrap();
    assert!(matches!(
        verify_token(&token, &config()),
        Err(AuthError::InvalidCredential)
    ));
}

#[test]
fn test_garbage_is_invalid() {
    assert!(matches!(
        verify_token("not.a.jwt", &config()),
        Err(AuthError::InvalidCredential)
    ));
}

#[test]
fn test_expired_token_is_rejected() {
    let issued = Utc::now().timestamp() - THIRTY_DAYS - 60;
    let token = issue_token_at(&Principal::new("u1", Role::Student), &config(), issued).unwrap();

    let err = verify_token(&token, &config()).unwrap_err();
    assert!(matches!(err, AuthError::Unauthenticated(_)));
    assert_eq!(err.to_string(), "Token has expired");
}

#[test]
fn test_thirty_day_token_valid_now_and_expired_after_thirty_one_days() {
    let now = Utc::now().timestamp();
    let token = issue_token_at(&Principal::new("u1", Role::Admin), &config(), now).unwrap();

    assert!(verify_token_at(&token, &config(), now).is_ok());
    assert!(verify_token_at(&token, &config(), now + 31 * 24 * 60 * 60).is_err());
}

#[test]
fn test_nested_payload_shape_still_verifies() {
    let now = Utc::now().timestamp();
    let payload = json!({
        "user": { "id": "legacy-1", "role": "STUDENT" },
        "iat": now,
        "exp": now + 3600,
    });
    let token = encode(
        &Header::default(),
        &payload,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    let principal = verify_token(&token, &config()).unwrap();
    assert_eq!(principal, Principal::new("legacy-1", Role::Student));
}

#[test]
fn test_empty_secret_fails_issuance() {
    let err = issue_token(
        &Principal::new("u1", Role::Admin),
        &JwtConfig::new("", THIRTY_DAYS),
    )
    .unwrap_err();
    assert!(matches!(err, AuthError::Configuration(_)));
}

#[test]
fn test_expiry_past_clock_range_fails_issuance() {
    let err = issue_token(
        &Principal::new("u1", Role::Instructor),
        &JwtConfig::new(SECRET, i64::MAX),
    )
    .unwrap_err();
    assert!(matches!(err, AuthError::Internal(_)));
}

#[test]
fn test_ten_year_lifetime_issues_valid_token() {
    let ten_years = eduplatform_config::jwt::MAX_TOKEN_EXPIRY_SECS;
    let cfg = JwtConfig::new(SECRET, ten_years);
    let now = Utc::now().timestamp();

    let token = issue_token_at(&Principal::new("u1", Role::Admin), &cfg, now).unwrap();
    assert!(verify_token_at(&token, &cfg, now + ten_years - 1).is_ok());
    assert!(verify_token_at(&token, &cfg, now + ten_years).is_err());
}

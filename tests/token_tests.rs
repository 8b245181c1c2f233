mod common;

use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use futures::future::join_all;
use serde_json::Value;

use apns_dispatch::token::TokenIssuer;

fn decode_segment(segment: &str) -> Value {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .expect("JWT segment is base64url");
    serde_json::from_slice(&bytes).expect("JWT segment is JSON")
}

fn issued_at(token: &str) -> i64 {
    let payload = decode_segment(token.split('.').nth(1).unwrap());
    payload["iat"].as_i64().unwrap()
}

#[test]
fn test_provider_token_structure() {
    let issuer = TokenIssuer::new(&common::test_config()).unwrap();
    let token = issuer.current_token().unwrap();

    let parts: Vec<&str> = token.split('.').collect();
    assert_eq!(parts.len(), 3, "JWT must have header.payload.signature");

    let header = decode_segment(parts[0]);
    assert_eq!(header["alg"], "ES256");
    assert_eq!(header["kid"], common::TEST_KEY_ID);

    let payload = decode_segment(parts[1]);
    assert_eq!(payload["iss"], common::TEST_TEAM_ID);
    let iat = payload["iat"].as_i64().unwrap();
    let now = chrono::Utc::now().timestamp();
    assert!((now - iat).abs() <= 5, "iat should be the mint time");

    // ES256 signatures are raw r||s, not DER.
    let signature = URL_SAFE_NO_PAD.decode(parts[2]).unwrap();
    assert_eq!(signature.len(), 64);
}

#[test]
fn test_cached_token_reused() {
    let issuer = TokenIssuer::new(&common::test_config()).unwrap();
    let first = issuer.current_token().unwrap();
    let second = issuer.current_token().unwrap();
    // ECDSA signing is randomized, so byte equality proves the second call
    // never reached the signer.
    assert_eq!(first, second);
}

#[test]
fn test_zero_threshold_mints_every_call() {
    let cfg = common::test_config();
    let issuer = TokenIssuer::with_refresh_threshold(&cfg, 0).unwrap();
    let first = issuer.current_token().unwrap();
    let second = issuer.current_token().unwrap();
    assert_ne!(first, second, "threshold 0 must disable reuse");
}

#[test]
fn test_stale_token_replaced() {
    let cfg = common::test_config();
    let issuer = TokenIssuer::with_refresh_threshold(&cfg, 1).unwrap();

    let first = issuer.current_token().unwrap();
    std::thread::sleep(Duration::from_millis(1500));
    let second = issuer.current_token().unwrap();

    assert_ne!(first, second);
    assert!(
        issued_at(&second) > issued_at(&first),
        "replacement token must carry a later iat"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_share_one_mint() {
    let issuer = Arc::new(TokenIssuer::new(&common::test_config()).unwrap());

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let issuer = Arc::clone(&issuer);
            tokio::spawn(async move { issuer.current_token().unwrap() })
        })
        .collect();

    let tokens: Vec<String> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let first = &tokens[0];
    assert!(
        tokens.iter().all(|token| token == first),
        "concurrent callers observed more than one minted token"
    );
}

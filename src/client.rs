use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use tracing::{error, info, warn};

use crate::config::ApnsConfig;
use crate::errors::ApnsError;
use crate::models::{DispatchResult, GatewayErrorBody, NotificationContent};
use crate::token::TokenIssuer;

/// Default guard on the whole request/response exchange. A hung gateway
/// connection must surface as a failed dispatch, not hang the caller.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the APNs HTTP/2 gateway.
///
/// Holds a shared connection pool, so clones are cheap and reuse the same
/// negotiated connections. Gateway connections upgrade to HTTP/2 via ALPN
/// and stay warm across dispatches.
#[derive(Clone)]
pub struct ApnsClient {
    http: reqwest::Client,
    issuer: Arc<TokenIssuer>,
    gateway_origin: String,
    topic: String,
}

impl ApnsClient {
    /// Create a client with the default request timeout.
    pub fn new(cfg: &ApnsConfig, issuer: Arc<TokenIssuer>) -> Result<Self, ApnsError> {
        Self::with_request_timeout(cfg, issuer, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a client whose whole request/response exchange is bounded by
    /// `timeout` instead of [`DEFAULT_REQUEST_TIMEOUT`].
    pub fn with_request_timeout(
        cfg: &ApnsConfig,
        issuer: Arc<TokenIssuer>,
        timeout: Duration,
    ) -> Result<Self, ApnsError> {
        if timeout.is_zero() {
            return Err(ApnsError::Config(
                "request timeout must be positive".to_string(),
            ));
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApnsError::HttpClient(e.to_string()))?;

        info!(
            bundle_id = %cfg.bundle_id,
            production = cfg.production,
            host = %cfg.endpoint(),
            "initialized APNs client"
        );

        Ok(Self {
            http,
            issuer,
            gateway_origin: cfg.gateway_origin(),
            topic: cfg.bundle_id.clone(),
        })
    }

    /// Dispatch one notification to one device.
    ///
    /// Every outcome is folded into the returned [`DispatchResult`]; token
    /// minting failures, transport errors and gateway rejections all come
    /// back as `success == false` with the reason in `error`.
    pub async fn send(&self, device_token: &str, content: &NotificationContent) -> DispatchResult {
        let token_prefix: String = device_token.chars().take(8).collect();

        let credential = match self.issuer.current_token() {
            Ok(token) => token,
            Err(e) => {
                error!(error = %e, "failed to obtain APNs provider token");
                return DispatchResult::failed(e, None);
            }
        };

        let body = content.envelope().to_string();
        let url = format!("{}/3/device/{}", self.gateway_origin, device_token);

        let response = match self
            .http
            .post(&url)
            .header("authorization", format!("bearer {credential}"))
            .header("apns-topic", &self.topic)
            .header("apns-push-type", "alert")
            .header("content-type", "application/json")
            .header("content-length", body.len())
            .body(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                // reqwest embeds the request URL in its display text, and
                // the URL path carries the full device token. Strip it so
                // only the prefix ever reaches logs or the audit trail.
                let e = e.without_url();
                error!(token_prefix = %token_prefix, error = %e, "APNs request failed");
                return DispatchResult::failed(e.to_string(), None);
            }
        };

        let status = response.status();
        let apns_id = response
            .headers()
            .get("apns-id")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        // Drain the body before classifying; rejection reasons ride in it.
        let raw_body = response.text().await.unwrap_or_default();

        if status == StatusCode::OK {
            info!(token_prefix = %token_prefix, apns_id = ?apns_id, "push notification delivered");
            return DispatchResult::delivered(apns_id);
        }

        let reason = serde_json::from_str::<GatewayErrorBody>(&raw_body)
            .ok()
            .and_then(|b| b.reason)
            .unwrap_or_else(|| format!("APNs HTTP {}", status.as_u16()));
        warn!(
            token_prefix = %token_prefix,
            status = status.as_u16(),
            reason = %reason,
            "push notification rejected"
        );
        DispatchResult::failed(reason, apns_id)
    }
}

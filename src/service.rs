use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use crate::client::ApnsClient;
use crate::errors::ApnsError;
use crate::models::{DeliveryRecord, DispatchResult, NotificationContent};
use crate::registry::DynDeviceRegistry;

/// Push dispatch orchestration: device lookup, delivery, audit trail.
///
/// Sits one level above [`ApnsClient`]; callers that already hold a device
/// token use [`dispatch`](Self::dispatch), callers that just want "the
/// user's current device" use [`dispatch_latest`](Self::dispatch_latest).
pub struct PushService {
    client: ApnsClient,
    registry: DynDeviceRegistry,
    audit: Option<UnboundedSender<DeliveryRecord>>,
}

impl PushService {
    pub fn new(client: ApnsClient, registry: DynDeviceRegistry) -> Self {
        Self {
            client,
            registry,
            audit: None,
        }
    }

    /// Send a [`DeliveryRecord`] for every dispatch attempt to `sink`.
    pub fn with_audit(mut self, sink: UnboundedSender<DeliveryRecord>) -> Self {
        self.audit = Some(sink);
        self
    }

    /// Dispatch to an explicit device token.
    pub async fn dispatch(
        &self,
        device_token: &str,
        content: NotificationContent,
    ) -> DispatchResult {
        let result = self.client.send(device_token, &content).await;
        self.record_attempt(&content, &result);

        if result.success {
            info!(title = %content.title, "notification dispatched");
        } else {
            warn!(
                title = %content.title,
                error = ?result.error,
                "notification dispatch failed"
            );
        }
        result
    }

    /// Dispatch to the most recently registered device.
    ///
    /// Returns [`ApnsError::NoDeviceRegistered`] when the registry is empty;
    /// registry lookup failures surface as [`ApnsError::Registry`]. Neither
    /// case reaches the gateway.
    pub async fn dispatch_latest(
        &self,
        content: NotificationContent,
    ) -> Result<DispatchResult, ApnsError> {
        let device = self
            .registry
            .most_recent_device()
            .await?
            .ok_or(ApnsError::NoDeviceRegistered)?;
        Ok(self.dispatch(&device.token, content).await)
    }

    fn record_attempt(&self, content: &NotificationContent, result: &DispatchResult) {
        if let Some(audit) = &self.audit {
            let record = DeliveryRecord::from_outcome(content, result);
            // Fire and forget: a closed audit sink must not fail the dispatch.
            if audit.send(record).is_err() {
                warn!("audit sink closed; delivery record dropped");
            }
        }
    }
}

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::ApnsError;
use crate::models::RegisteredDevice;

/// Source of registered device tokens.
///
/// Implementations sit in front of whatever store tracks device
/// registrations. Lookup failures map to [`ApnsError::Registry`].
#[async_trait]
pub trait DeviceRegistry: Send + Sync {
    /// The most recently registered device, or `None` when the registry
    /// is empty.
    async fn most_recent_device(&self) -> Result<Option<RegisteredDevice>, ApnsError>;
}

/// Shared trait object, the form [`PushService`](crate::service::PushService)
/// consumes.
pub type DynDeviceRegistry = Arc<dyn DeviceRegistry>;

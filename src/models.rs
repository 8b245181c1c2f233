use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

/// User-visible notification content plus optional custom payload data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
    /// Custom keys delivered to the app alongside the alert. Placed at the
    /// top level of the payload, next to `aps`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
}

impl NotificationContent {
    pub fn new(title: String, body: String) -> Self {
        Self {
            title,
            body,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = Some(data);
        self
    }

    /// Build the APNs payload envelope.
    ///
    /// The alert and a default sound go under `aps`; custom data keys are
    /// merged in at the top level. On a key collision the caller's data
    /// wins, including over `aps` itself, so callers that need full control
    /// of the envelope can take it.
    pub fn envelope(&self) -> Value {
        let mut payload = Map::new();
        payload.insert(
            "aps".to_string(),
            json!({
                "alert": {
                    "title": self.title,
                    "body": self.body,
                },
                "sound": "default",
            }),
        );
        if let Some(data) = &self.data {
            for (key, value) in data {
                payload.insert(key.clone(), value.clone());
            }
        }
        Value::Object(payload)
    }
}

/// Outcome of a single dispatch attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchResult {
    pub success: bool,
    /// Gateway-assigned notification id, when the response carried one.
    pub apns_id: Option<String>,
    pub error: Option<String>,
}

impl DispatchResult {
    pub fn delivered(apns_id: Option<String>) -> Self {
        Self {
            success: true,
            apns_id,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>, apns_id: Option<String>) -> Self {
        Self {
            success: false,
            apns_id,
            error: Some(error.into()),
        }
    }
}

/// Terminal status of a dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Failed,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Sent => "sent",
            DeliveryStatus::Failed => "failed",
        }
    }
}

/// Audit record of one dispatch attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryRecord {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
    pub status: DeliveryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub attempted_at: DateTime<Utc>,
}

impl DeliveryRecord {
    pub fn from_outcome(content: &NotificationContent, result: &DispatchResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: content.title.clone(),
            body: content.body.clone(),
            data: content.data.clone(),
            status: if result.success {
                DeliveryStatus::Sent
            } else {
                DeliveryStatus::Failed
            },
            error: result.error.clone(),
            attempted_at: Utc::now(),
        }
    }
}

/// A device known to the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredDevice {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Error body the gateway returns on rejection.
#[derive(Debug, Deserialize)]
pub struct GatewayErrorBody {
    pub reason: Option<String>,
}

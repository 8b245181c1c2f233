//! APNs Push Dispatch Library
//!
//! This library delivers push notifications to a single registered device
//! through Apple's push gateway.
//!
//! It handles:
//! - ES256 provider token minting, with single-slot caching and refresh
//! - HTTP/2 delivery to the production or sandbox gateway
//! - Gateway response classification into a uniform dispatch result
//! - Delivery record emission for audit logging
//!
//! Device lookup and audit persistence are external collaborators: the
//! [`DeviceRegistry`] trait and the audit channel on [`PushService`] are the
//! seams they plug into.

pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod registry;
pub mod service;
pub mod token;

pub use client::ApnsClient;
pub use config::ApnsConfig;
pub use errors::ApnsError;
pub use models::{
    DeliveryRecord, DeliveryStatus, DispatchResult, NotificationContent, RegisteredDevice,
};
pub use registry::{DeviceRegistry, DynDeviceRegistry};
pub use service::PushService;
pub use token::TokenIssuer;

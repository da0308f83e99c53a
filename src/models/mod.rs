//! Request and Response models for the worker's host endpoints
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{NotificationClickRequest, SyncRequest};
pub use responses::{HealthResponse, StatsResponse, SyncResponse, VersionReply};

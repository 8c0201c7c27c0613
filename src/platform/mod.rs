//! Platform module - Talk to the remote conversational-AI platform.
//!
//! This module contains:
//! - Platform trait for abstraction
//! - REST client implementation (the only production backend)

pub mod api;
pub mod rest;

pub use api::{
    FlowNode, FlowSnapshot, Intent, Locale, LocalizeOptions, LocalizeSummary, Platform,
    PlatformError, Project, DEFAULT_BATCH_SIZE,
};
pub use rest::RestClient;

//! Platform trait - Abstraction over the remote platform API.
//!
//! Commands are written against this trait so they can be exercised with a
//! scripted backend in tests. The REST client is the production impl.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Number of node/intent ids sent per localization request, and the page
/// size used when downloading a Flow.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// A language/region variant known to the platform.
///
/// The wire object carries more fields; only the name matters here, it is
/// the identity users refer to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    pub name: String,
}

/// Project metadata, as returned by the project check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
}

/// A single node of a Flow chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
}

/// An intent attached to a Flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    pub id: String,
    pub name: String,
}

/// What `pull` writes to disk: the full Flow as of the download.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowSnapshot {
    pub name: String,
    pub nodes: Vec<FlowNode>,
    pub intents: Vec<Intent>,
    pub pulled_at: DateTime<Utc>,
}

/// Options for the localize operation.
///
/// `locale_name` is required; the locale validator treats an empty name as
/// "not provided" and stops before anything reaches the platform.
#[derive(Debug, Clone, Default)]
pub struct LocalizeOptions {
    /// Name of the target locale (must exist on the platform)
    pub locale_name: String,
    /// Skip the interactive confirmation prompt
    pub force_yes: bool,
    /// Remove localizations instead of adding them
    pub reverse: bool,
}

/// What a localize run touched, for the closing message.
#[derive(Debug, Clone, Copy)]
pub struct LocalizeSummary {
    pub nodes: usize,
    pub intents: usize,
    pub removed: bool,
}

/// Errors from the platform API.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("the API key cannot access this project")]
    Unauthorized,

    #[error("{0} can't be found on the platform")]
    NotFound(String),

    #[error("platform returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("cannot write local Flow copy: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for all platform backends.
///
/// Every remote interaction the commands need goes through here.
pub trait Platform {
    /// Fetch the full list of locales known to the platform.
    fn pull_locales(&self) -> Result<Vec<Locale>, PlatformError>;

    /// Verify the configured project exists and the API key can retrieve it.
    fn check_project(&self) -> Result<Project, PlatformError>;

    /// Add (or, with `reverse`, remove) localizations on a Flow's nodes and
    /// intents, `batch_size` ids per request.
    fn localize_flow(
        &self,
        flow_name: &str,
        batch_size: usize,
        options: &LocalizeOptions,
    ) -> Result<LocalizeSummary, PlatformError>;

    /// Download a Flow and write it into the local flows directory.
    /// Returns the path of the written snapshot.
    fn pull_flow(&self, flow_name: &str, batch_size: usize) -> Result<PathBuf, PlatformError>;
}

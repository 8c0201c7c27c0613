//! REST client for the platform API.
//!
//! Every request carries the API key in the `X-API-Key` header. Large
//! collections (Flow nodes, intents) are paged with `skip`/`limit`; the
//! localize operation sends ids in batches of the same size.

use super::api::{
    FlowNode, FlowSnapshot, Intent, Locale, LocalizeOptions, LocalizeSummary, Platform,
    PlatformError, Project,
};
use crate::config::Config;
use crate::utils::progress;
use anyhow::{Context, Result};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Header carrying the API key.
const API_KEY_HEADER: &str = "X-API-Key";

/// Per-request timeout. The platform has no long-running endpoints; anything
/// slower than this is a stuck connection.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Paged collection envelope used by all list endpoints.
#[derive(Debug, Deserialize)]
struct Page<T> {
    items: Vec<T>,
}

/// Flow metadata, the part of `GET /v1/flows/{name}` we keep.
#[derive(Debug, Deserialize)]
struct FlowMeta {
    name: String,
}

/// Body of `POST /v1/flows/{name}/localizations`.
#[derive(Debug, Serialize)]
struct LocalizePayload<'a> {
    locale: &'a str,
    node_ids: &'a [String],
    intent_ids: &'a [String],
    remove: bool,
}

/// Blocking REST client over the platform's v1 API.
pub struct RestClient {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    project_id: String,
    flows_dir: PathBuf,
}

impl RestClient {
    /// Build a client from the saved configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Cannot build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            project_id: config.project_id.clone(),
            flows_dir: config.flows_dir.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// GET `path` and decode the JSON body. `resource` names what we were
    /// looking for in the 404 case.
    fn get_json<T: DeserializeOwned>(&self, resource: &str, path: &str) -> Result<T, PlatformError> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");

        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()?;

        let response = check_status(resource, response)?;
        Ok(response.json()?)
    }

    /// Drain a paged list endpoint, `limit` items per request, until a
    /// short page signals the end.
    fn get_paged<T: DeserializeOwned>(
        &self,
        resource: &str,
        path: &str,
        limit: usize,
    ) -> Result<Vec<T>, PlatformError> {
        let limit = limit.max(1);
        let mut items = Vec::new();
        let mut skip = 0;

        loop {
            let page: Page<T> =
                self.get_json(resource, &format!("{}?skip={}&limit={}", path, skip, limit))?;
            let fetched = page.items.len();
            items.extend(page.items);

            if fetched < limit {
                return Ok(items);
            }
            skip += fetched;
        }
    }

    /// Send one localization batch for a Flow.
    fn post_localization(
        &self,
        flow_name: &str,
        payload: &LocalizePayload<'_>,
    ) -> Result<(), PlatformError> {
        let url = self.url(&format!("flows/{}/localizations", flow_name));
        tracing::debug!(%url, nodes = payload.node_ids.len(), intents = payload.intent_ids.len(), "POST");

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(payload)
            .send()?;

        check_status(&format!("Flow {}", flow_name), response)?;
        Ok(())
    }

    /// Download the full Flow: metadata, then nodes and intents page by page.
    fn fetch_flow(&self, flow_name: &str, batch_size: usize) -> Result<FlowSnapshot, PlatformError> {
        let resource = format!("Flow {}", flow_name);
        let meta: FlowMeta = self.get_json(&resource, &format!("flows/{}", flow_name))?;

        let nodes: Vec<FlowNode> =
            self.get_paged(&resource, &format!("flows/{}/nodes", flow_name), batch_size)?;
        let intents: Vec<Intent> =
            self.get_paged(&resource, &format!("flows/{}/intents", flow_name), batch_size)?;

        Ok(FlowSnapshot {
            name: meta.name,
            nodes,
            intents,
            pulled_at: Utc::now(),
        })
    }
}

impl Platform for RestClient {
    fn pull_locales(&self) -> Result<Vec<Locale>, PlatformError> {
        let page: Page<Locale> = self.get_json("Locales", "locales")?;
        Ok(page.items)
    }

    fn check_project(&self) -> Result<Project, PlatformError> {
        let path = format!("projects/{}", self.project_id);
        self.get_json(&format!("Project {}", self.project_id), &path)
    }

    fn localize_flow(
        &self,
        flow_name: &str,
        batch_size: usize,
        options: &LocalizeOptions,
    ) -> Result<LocalizeSummary, PlatformError> {
        let flow = self.fetch_flow(flow_name, batch_size)?;

        let node_ids: Vec<String> = flow.nodes.into_iter().map(|n| n.id).collect();
        let intent_ids: Vec<String> = flow.intents.into_iter().map(|i| i.id).collect();

        let batch_size = batch_size.max(1);
        let total = batch_count(node_ids.len(), batch_size) + batch_count(intent_ids.len(), batch_size);
        let bar = progress::batch_bar(total as u64);

        for batch in node_ids.chunks(batch_size) {
            self.post_localization(
                flow_name,
                &LocalizePayload {
                    locale: &options.locale_name,
                    node_ids: batch,
                    intent_ids: &[],
                    remove: options.reverse,
                },
            )?;
            bar.inc(1);
        }

        for batch in intent_ids.chunks(batch_size) {
            self.post_localization(
                flow_name,
                &LocalizePayload {
                    locale: &options.locale_name,
                    node_ids: &[],
                    intent_ids: batch,
                    remove: options.reverse,
                },
            )?;
            bar.inc(1);
        }

        bar.finish_and_clear();

        Ok(LocalizeSummary {
            nodes: node_ids.len(),
            intents: intent_ids.len(),
            removed: options.reverse,
        })
    }

    fn pull_flow(&self, flow_name: &str, batch_size: usize) -> Result<PathBuf, PlatformError> {
        let snapshot = self.fetch_flow(flow_name, batch_size)?;

        std::fs::create_dir_all(&self.flows_dir)?;
        let path = self.flows_dir.join(format!("{}.json", flow_name));
        std::fs::write(&path, serde_json::to_string_pretty(&snapshot)?)?;

        tracing::debug!(path = %path.display(), "wrote Flow snapshot");
        Ok(path)
    }
}

/// Join the API base with a v1 path, tolerating a trailing slash on the base.
fn join_url(base_url: &str, path: &str) -> String {
    format!("{}/v1/{}", base_url.trim_end_matches('/'), path)
}

/// Number of requests needed to cover `total` ids at `size` per request.
fn batch_count(total: usize, size: usize) -> usize {
    total.div_ceil(size.max(1))
}

/// Map a non-success status onto the error contract. `resource` is what the
/// request was about, for the 404 message.
fn check_status(
    resource: &str,
    response: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, PlatformError> {
    use reqwest::StatusCode;

    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(PlatformError::Unauthorized),
        StatusCode::NOT_FOUND => Err(PlatformError::NotFound(resource.to_string())),
        status => {
            let message = response.text().unwrap_or_default();
            Err(PlatformError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

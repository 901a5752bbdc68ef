//! Lighting-bridge group client.
//!
//! Talks to the bridge's local REST API with a pre-provisioned username.
//! Pairing and bridge discovery are not handled here.

use std::collections::HashMap;

use monitor_core::color::Xy;
use monitor_core::error::{MonitorError, Result};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::actuator::Actuator;

/// The subset of a bridge group description needed to find it by name.
#[derive(Debug, Deserialize)]
struct GroupInfo {
    name: String,
}

/// One light group on a bridge.
#[derive(Debug, Clone)]
pub struct HueGroup {
    http: reqwest::Client,
    /// `http://{host}/api/{user}`.
    api_base: String,
    id: String,
    name: String,
}

impl HueGroup {
    /// Resolve `group_name` on the bridge at `host` and take it out of
    /// entertainment streaming mode so plain color commands apply.
    pub async fn connect(host: &str, user: &str, group_name: &str) -> Result<Self> {
        // Default certificate verification; the bridge is not covered by the
        // telemetry client's self-signed exception.
        let http = reqwest::Client::new();
        let api_base = format!("{}/api/{user}", bridge_origin(host));

        let groups: Value = request_json(http.get(format!("{api_base}/groups"))).await?;
        if let Some(message) = bridge_error(&groups) {
            return Err(MonitorError::Actuator(message));
        }
        let groups: HashMap<String, GroupInfo> = serde_json::from_value(groups)
            .map_err(|e| MonitorError::Actuator(format!("unexpected groups payload: {e}")))?;

        for (id, info) in &groups {
            tracing::debug!(id = %id, name = %info.name, "bridge group");
        }

        let id = groups
            .into_iter()
            .find(|(_, info)| info.name == group_name)
            .map(|(id, _)| id)
            .ok_or_else(|| MonitorError::Config(format!("light group not found: {group_name:?}")))?;

        let group = Self {
            http,
            api_base,
            id,
            name: group_name.to_string(),
        };

        if let Err(e) = group.disable_streaming().await {
            tracing::warn!(group = %group.name, error = %e, "failed to disable streaming");
        }

        tracing::info!(group = %group.name, id = %group.id, "light group connected");
        Ok(group)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    async fn disable_streaming(&self) -> Result<()> {
        let url = format!("{}/groups/{}", self.api_base, self.id);
        self.put(&url, json!({ "stream": { "active": false } })).await
    }

    async fn put(&self, url: &str, body: Value) -> Result<()> {
        let response: Value = request_json(self.http.put(url).json(&body)).await?;
        match bridge_error(&response) {
            Some(message) => Err(MonitorError::Actuator(message)),
            None => Ok(()),
        }
    }
}

impl Actuator for HueGroup {
    async fn set_xy(&self, xy: Xy) -> Result<()> {
        let url = format!("{}/groups/{}/action", self.api_base, self.id);
        self.put(&url, json!({ "xy": xy.to_wire() })).await
    }
}

// ── Private helpers ───────────────────────────────────────────────────────────

fn bridge_origin(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{host}")
    }
}

async fn request_json(request: reqwest::RequestBuilder) -> Result<Value> {
    let response = request
        .send()
        .await
        .map_err(|e| MonitorError::Actuator(format!("bridge request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(MonitorError::Actuator(format!("bridge returned {status}")));
    }

    response
        .json()
        .await
        .map_err(|e| MonitorError::Actuator(format!("bridge response parse failed: {e}")))
}

/// The bridge reports failures inside 2xx bodies as
/// `[{"error": {"description": ...}}]`.
fn bridge_error(body: &Value) -> Option<String> {
    let errors: Vec<&str> = body
        .as_array()?
        .iter()
        .filter_map(|item| item.get("error"))
        .map(|err| {
            err.get("description")
                .and_then(Value::as_str)
                .unwrap_or("unknown bridge error")
        })
        .collect();

    (!errors.is_empty()).then(|| errors.join("; "))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

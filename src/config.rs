//! Runtime configuration.

use anyhow::Context;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Tunables for the chat pipeline. Every field has a default, so a
/// partial YAML document is enough.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Minimum classification confidence before an intent is acted on.
    pub confidence_threshold: f32,
    /// Turns remembered per session.
    pub history_limit: usize,
    /// Most tasks shown in one list or search reply.
    pub list_preview_limit: usize,
    /// Idle seconds before a session is eligible for eviction.
    pub session_idle_timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            history_limit: 10,
            list_preview_limit: 10,
            session_idle_timeout_secs: 1800,
        }
    }
}

impl ChatConfig {
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(yaml).context("failed to parse chat configuration")
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::seconds(self.session_idle_timeout_secs as i64)
    }
}

//! Chat relay client.
//!
//! The relay fronts the agent runtime: messages go in as form posts to
//! `<relay>/<agent_id>/message`, replies come back as either a single JSON
//! object or an array of objects carrying `text` fields.

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// Shown when the agent produced no text at all.
const EMPTY_REPLY: &str = "(no reply)";

pub struct RelayClient {
    pub base_url: String,
    http: Client,
}

impl RelayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Send a user message to an agent and return its combined reply text.
    pub async fn send_message(&self, agent_id: &str, text: &str) -> Result<String> {
        let url = format!("{}/{}/message", self.base_url, urlencoding::encode(agent_id));
        debug!("Relay message to agent {}", agent_id);

        let form = [("text", text), ("user", "user")];
        let resp = self
            .http
            .post(&url)
            .form(&form)
            .send()
            .await
            .with_context(|| format!("Relay request failed for agent {}", agent_id))?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v["message"].as_str().map(str::to_string))
                .unwrap_or(body);
            anyhow::bail!("Relay error {}: {}", status.as_u16(), message);
        }

        let data: Value = serde_json::from_str(&body)
            .with_context(|| format!("Relay returned non-JSON reply for agent {}", agent_id))?;
        Ok(join_reply_texts(&data))
    }
}

/// Flatten a relay reply into display text. The reply is one object or an
/// array of objects; `text` fields are newline-joined, empty ones skipped.
pub fn join_reply_texts(data: &Value) -> String {
    let entries: Vec<&Value> = match data {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };

    let joined = entries
        .iter()
        .filter_map(|entry| entry.get("text").and_then(|t| t.as_str()))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    if joined.is_empty() {
        EMPTY_REPLY.to_string()
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_join_single_object() {
        let data = json!({ "text": "hello" });
        assert_eq!(join_reply_texts(&data), "hello");
    }

    #[test]
    fn test_join_array_skips_empty_and_missing() {
        let data = json!([
            { "text": "first" },
            { "text": "" },
            { "action": "NONE" },
            { "text": "second" }
        ]);
        assert_eq!(join_reply_texts(&data), "first\nsecond");
    }

    #[test]
    fn test_join_falls_back_when_nothing_remains() {
        assert_eq!(join_reply_texts(&json!([])), EMPTY_REPLY);
        assert_eq!(join_reply_texts(&json!({ "action": "NONE" })), EMPTY_REPLY);
        assert_eq!(join_reply_texts(&json!([{ "text": "" }])), EMPTY_REPLY);
    }

    #[test]
    fn test_join_ignores_non_string_text() {
        let data = json!([{ "text": 42 }, { "text": "ok" }]);
        assert_eq!(join_reply_texts(&data), "ok");
    }
}

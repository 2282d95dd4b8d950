//! Navi open API portfolio queries and formatting.

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use tokio::time::Duration;
use tracing::debug;

use crate::defi::retry::with_retry;

const PORTFOLIO_RETRIES: u32 = 3;
const PORTFOLIO_RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Supply/borrow position for one token, balances in base units.
#[derive(Debug, Clone)]
pub struct TokenPosition {
    pub token: String,
    pub supply_balance: f64,
    pub borrow_balance: f64,
}

/// SUI pool stats as reported by the open API.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    pub base_supply_rate: String,
    pub base_borrow_rate: String,
    pub token_price: String,
    pub max_ltv: String,
}

/// One claimable reward bucket. The `key` is Navi's reward index.
#[derive(Debug, Clone)]
pub struct RewardEntry {
    pub key: String,
    pub available: String,
}

#[derive(Debug, Clone)]
pub struct NaviPortfolio {
    pub positions: Vec<TokenPosition>,
    pub pool: PoolStats,
    pub rewards: Vec<RewardEntry>,
    pub health_factor: f64,
}

/// HTTP client for the Navi open API.
pub struct NaviApiClient {
    pub base_url: String,
    http: Client,
}

impl NaviApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn get_json(&self, path: &str) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .with_context(|| format!("Navi API request failed: GET {}", path))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("Navi API error: GET {} -> {}: {}", path, status.as_u16(), text);
        }
        resp.json().await.context("Navi API returned non-JSON body")
    }

    /// Full portfolio for an address. Each sub-query is retried on its own,
    /// matching how flaky the open API is in practice.
    pub async fn portfolio(&self, address: &str) -> Result<NaviPortfolio> {
        let encoded = urlencoding::encode(address).into_owned();
        debug!("Fetching Navi portfolio for {}", encoded);

        let positions = with_retry(
            || async {
                let data = self
                    .get_json(&format!("/navi/user/{}/portfolio", encoded))
                    .await?;
                Ok(parse_positions(&data))
            },
            PORTFOLIO_RETRIES,
            PORTFOLIO_RETRY_DELAY,
        )
        .await?;

        let pool = with_retry(
            || async {
                let data = self.get_json("/navi/pools/sui").await?;
                Ok(parse_pool_stats(&data))
            },
            PORTFOLIO_RETRIES,
            PORTFOLIO_RETRY_DELAY,
        )
        .await?;

        let rewards = with_retry(
            || async {
                let data = self
                    .get_json(&format!("/navi/user/{}/rewards", encoded))
                    .await?;
                Ok(parse_rewards(&data))
            },
            PORTFOLIO_RETRIES,
            PORTFOLIO_RETRY_DELAY,
        )
        .await?;

        let health_factor = with_retry(
            || async {
                let data = self
                    .get_json(&format!("/navi/user/{}/health-factor", encoded))
                    .await?;
                Ok(parse_health_factor(&data))
            },
            PORTFOLIO_RETRIES,
            PORTFOLIO_RETRY_DELAY,
        )
        .await?;

        Ok(NaviPortfolio {
            positions,
            pool,
            rewards,
            health_factor,
        })
    }
}

fn json_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn json_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn parse_positions(data: &Value) -> Vec<TokenPosition> {
    let entries = data
        .get("data")
        .and_then(|d| d.as_array())
        .or_else(|| data.as_array())
        .cloned()
        .unwrap_or_default();

    entries
        .iter()
        .map(|e| TokenPosition {
            token: e
                .get("token")
                .or_else(|| e.get("symbol"))
                .map(json_string)
                .unwrap_or_default(),
            supply_balance: e
                .get("supplyBalance")
                .or_else(|| e.get("supply_balance"))
                .map(json_f64)
                .unwrap_or(0.0),
            borrow_balance: e
                .get("borrowBalance")
                .or_else(|| e.get("borrow_balance"))
                .map(json_f64)
                .unwrap_or(0.0),
        })
        .collect()
}

fn parse_pool_stats(data: &Value) -> PoolStats {
    let body = data.get("data").unwrap_or(data);
    PoolStats {
        base_supply_rate: body
            .get("base_supply_rate")
            .map(json_string)
            .unwrap_or_default(),
        base_borrow_rate: body
            .get("base_borrow_rate")
            .map(json_string)
            .unwrap_or_default(),
        token_price: body
            .get("tokenPrice")
            .or_else(|| body.get("token_price"))
            .map(json_string)
            .unwrap_or_default(),
        max_ltv: body.get("max_ltv").map(json_string).unwrap_or_default(),
    }
}

fn parse_rewards(data: &Value) -> Vec<RewardEntry> {
    let body = data.get("data").unwrap_or(data);
    let Some(map) = body.as_object() else {
        return Vec::new();
    };
    map.iter()
        .map(|(key, reward)| RewardEntry {
            key: key.clone(),
            available: reward
                .get("available")
                .map(json_string)
                .unwrap_or_default(),
        })
        .collect()
}

fn parse_health_factor(data: &Value) -> f64 {
    let body = data.get("data").unwrap_or(data);
    body.get("healthFactor")
        .or_else(|| body.get("health_factor"))
        .map(json_f64)
        .unwrap_or_else(|| json_f64(body))
}

// ---- Formatting ----

/// Token names for Navi reward buckets.
fn reward_token_name(key: &str) -> &str {
    match key {
        "0" => "vSui",
        "0extra" => "NAVX",
        _ => "Unknown",
    }
}

/// Balance in base units rendered as a 4-decimal token amount.
fn format_token_amount(amount: f64) -> String {
    format!("{:.4}", amount / 1e9)
}

/// Render a portfolio as the chat-facing summary text.
pub fn format_portfolio(info: &NaviPortfolio) -> String {
    let mut text = String::from("Navi Portfolio Summary\n\nPositions:\n");

    for position in &info.positions {
        if position.supply_balance <= 0.0 && position.borrow_balance <= 0.0 {
            continue;
        }
        text.push_str(&format!("{}:\n", position.token));
        if position.supply_balance > 0.0 {
            text.push_str(&format!(
                "  Supply: {}\n",
                format_token_amount(position.supply_balance)
            ));
        }
        if position.borrow_balance > 0.0 {
            text.push_str(&format!(
                "  Borrow: {}\n",
                format_token_amount(position.borrow_balance)
            ));
        }
    }

    text.push_str("\nSUI Pool Stats:\n");
    text.push_str(&format!("Supply APR: {}%\n", info.pool.base_supply_rate));
    text.push_str(&format!("Borrow APR: {}%\n", info.pool.base_borrow_rate));
    text.push_str(&format!("Token Price: ${}\n", info.pool.token_price));
    let ltv_pct = info.pool.max_ltv.parse::<f64>().unwrap_or(0.0) * 100.0;
    text.push_str(&format!("Max LTV: {:.0}%\n", ltv_pct));

    text.push_str(&format!("\nHealth Factor: {:.2}\n", info.health_factor));

    if !info.rewards.is_empty() {
        text.push_str("\nAvailable Rewards:\n");
        for reward in &info.rewards {
            text.push_str(&format!(
                "{} {}\n",
                reward.available,
                reward_token_name(&reward.key)
            ));
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_portfolio() -> NaviPortfolio {
        NaviPortfolio {
            positions: vec![
                TokenPosition {
                    token: "Sui".into(),
                    supply_balance: 2_500_000_000.0,
                    borrow_balance: 0.0,
                },
                TokenPosition {
                    token: "USDC".into(),
                    supply_balance: 0.0,
                    borrow_balance: 0.0,
                },
            ],
            pool: PoolStats {
                base_supply_rate: "2.1".into(),
                base_borrow_rate: "4.9".into(),
                token_price: "3.52".into(),
                max_ltv: "0.8".into(),
            },
            rewards: vec![
                RewardEntry {
                    key: "0".into(),
                    available: "1.25".into(),
                },
                RewardEntry {
                    key: "0extra".into(),
                    available: "10".into(),
                },
            ],
            health_factor: 42.12345,
        }
    }

    #[test]
    fn test_format_portfolio() {
        let text = format_portfolio(&sample_portfolio());
        assert!(text.contains("Sui:\n  Supply: 2.5000\n"));
        // Zero positions are skipped entirely.
        assert!(!text.contains("USDC"));
        assert!(text.contains("Supply APR: 2.1%"));
        assert!(text.contains("Max LTV: 80%"));
        assert!(text.contains("Health Factor: 42.12"));
        assert!(text.contains("1.25 vSui"));
        assert!(text.contains("10 NAVX"));
    }

    #[test]
    fn test_reward_token_name() {
        assert_eq!(reward_token_name("0"), "vSui");
        assert_eq!(reward_token_name("0extra"), "NAVX");
        assert_eq!(reward_token_name("9"), "Unknown");
    }

    #[test]
    fn test_parse_positions_both_casings() {
        let data = json!({ "data": [
            { "symbol": "Sui", "supply_balance": "1000000000", "borrow_balance": 0 },
            { "token": "USDC", "supplyBalance": 5.0, "borrowBalance": 2.0 }
        ]});
        let positions = parse_positions(&data);
        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0].token, "Sui");
        assert_eq!(positions[0].supply_balance, 1_000_000_000.0);
        assert_eq!(positions[1].borrow_balance, 2.0);
    }

    #[test]
    fn test_parse_health_factor_variants() {
        assert_eq!(parse_health_factor(&json!({ "data": { "healthFactor": 3.5 } })), 3.5);
        assert_eq!(parse_health_factor(&json!({ "health_factor": "2.25" })), 2.25);
        assert_eq!(parse_health_factor(&json!({ "data": 7.0 })), 7.0);
    }

    #[test]
    fn test_parse_rewards() {
        let data = json!({ "data": {
            "0": { "asset_id": "0", "funds": "x", "available": "1.5" },
            "0extra": { "available": "3" }
        }});
        let rewards = parse_rewards(&data);
        assert_eq!(rewards.len(), 2);
        assert!(rewards.iter().any(|r| r.key == "0" && r.available == "1.5"));
    }
}

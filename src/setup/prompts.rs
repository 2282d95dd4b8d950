//! Prompts
//!
//! Interactive terminal prompts for the setup wizard.
//! Uses the `dialoguer` crate for input handling.

use anyhow::Result;
use colored::Colorize;
use dialoguer::{Confirm, Input, Select};
use std::str::FromStr;
use sui_sdk_types as sui;

use crate::types::Network;

/// Prompt the user for a required string value.
/// Repeats until a non-empty value is entered.
pub fn prompt_required(label: &str) -> Result<String> {
    loop {
        let value: String = Input::new()
            .with_prompt(format!("  {} {}", "\u{2192}".cyan(), label.white()))
            .allow_empty(true)
            .interact_text()?;

        let trimmed = value.trim().to_string();
        if !trimmed.is_empty() {
            return Ok(trimmed);
        }
        println!("{}", "  This field is required.".yellow());
    }
}

/// Prompt the user for an optional string value.
/// Returns the default when the user presses Enter.
pub fn prompt_optional(label: &str, default: &str) -> Result<String> {
    let value: String = Input::new()
        .with_prompt(format!("  {} {}", "\u{2192}".cyan(), label.white()))
        .allow_empty(true)
        .default(default.to_string())
        .interact_text()?;

    Ok(value.trim().to_string())
}

/// Prompt the user for a Sui object or package ID with validation.
/// Must parse as a 32-byte Sui address.
pub fn prompt_object_id(label: &str) -> Result<String> {
    loop {
        let value: String = Input::new()
            .with_prompt(format!("  {} {}", "\u{2192}".cyan(), label.white()))
            .allow_empty(true)
            .interact_text()?;

        let trimmed = value.trim().to_string();
        if sui::Address::from_str(&trimmed).is_ok() {
            return Ok(trimmed);
        }
        println!(
            "{}",
            "  Invalid Sui ID. Must be 0x followed by up to 64 hex characters.".yellow()
        );
    }
}

/// Prompt the user to pick a Sui network.
pub fn prompt_network(default: Network) -> Result<Network> {
    let networks = [
        Network::Mainnet,
        Network::Testnet,
        Network::Devnet,
        Network::Localnet,
    ];
    let default_index = networks.iter().position(|n| *n == default).unwrap_or(1);

    let selected = Select::new()
        .with_prompt(format!("  {} {}", "\u{2192}".cyan(), "Sui network".white()))
        .items(&networks.map(|n| n.to_string()))
        .default(default_index)
        .interact()?;

    Ok(networks[selected])
}

/// Prompt the user for a yes/no answer.
pub fn prompt_confirm(label: &str, default: bool) -> Result<bool> {
    let value = Confirm::new()
        .with_prompt(format!("  {} {}", "\u{2192}".cyan(), label.white()))
        .default(default)
        .interact()?;

    Ok(value)
}

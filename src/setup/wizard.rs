//! Setup Wizard
//!
//! Interactive first-run setup wizard. Walks through wallet generation,
//! network selection, on-chain object configuration, and off-chain
//! service endpoints, then persists the result.

use anyhow::{Context, Result};
use colored::Colorize;

use crate::config::{default_config, get_anemone_dir, save_config};
use crate::types::AnemoneConfig;

use super::prompts::{
    prompt_confirm, prompt_network, prompt_object_id, prompt_optional, prompt_required,
};

/// Run the interactive setup wizard.
/// Returns a fully populated `AnemoneConfig`, already saved to disk.
pub async fn run_setup_wizard() -> Result<AnemoneConfig> {
    show_banner();

    println!(
        "{}",
        "  First-run setup. Let's wire up your anemone agent.\n".white()
    );

    // ---- 1. Generate wallet -------------------------------------------------
    println!("{}", "  [1/4] Generating identity (wallet)...".cyan());

    let (address, _signer, is_new) =
        crate::identity::wallet::get_wallet().context("Failed to get or create wallet")?;

    if is_new {
        println!("{}", format!("  Wallet created: {}", address).green());
    } else {
        println!("{}", format!("  Wallet loaded: {}", address).green());
    }

    let anemone_dir = get_anemone_dir();
    println!(
        "{}",
        format!(
            "  Private key stored at: {}/wallet.json\n",
            anemone_dir.display()
        )
        .dimmed()
    );

    // ---- 2. Network and contracts -------------------------------------------
    println!("{}", "  [2/4] Network and contracts\n".cyan());

    let mut config = default_config();

    config.network = prompt_network(config.network)?;
    println!("{}", format!("  Network: {}\n", config.network).green());

    config.rpc_url = prompt_optional(
        "Fullnode RPC URL (Enter for network default)",
        &config.rpc_url,
    )?;

    config.package_id = prompt_object_id("Anemone package ID (0x...)")?;
    config.mint_cap_id = prompt_object_id("MintCap object ID (0x...)")?;

    // ---- 3. Off-chain services ----------------------------------------------
    println!("\n{}", "  [3/4] Off-chain services\n".cyan());

    config.mapping_api_url =
        prompt_optional("NFT mapping service URL", &config.mapping_api_url)?;
    config.relay_url = prompt_required("Agent chat relay URL")?;

    if prompt_confirm("Configure Navi lending objects now? (mainnet only)", false)? {
        config.navi.package_id = prompt_object_id("Navi package ID (0x...)")?;
        config.navi.storage_id = prompt_object_id("Navi storage object ID (0x...)")?;
        config.navi.sui_pool_id = prompt_object_id("Navi SUI pool object ID (0x...)")?;
        config.navi.oracle_id = prompt_object_id("Navi oracle object ID (0x...)")?;
        config.navi.incentive_v1_id = prompt_object_id("Navi incentive v1 object ID (0x...)")?;
        config.navi.incentive_v2_id = prompt_object_id("Navi incentive v2 object ID (0x...)")?;
        println!("{}", "  Navi objects configured.\n".green());
    } else {
        println!(
            "{}",
            "  Skipped. Navi actions will be unavailable until configured.\n".dimmed()
        );
    }

    // ---- 4. Write config ----------------------------------------------------
    println!("{}", "  [4/4] Writing configuration...".cyan());

    save_config(&config).context("Failed to save config")?;
    println!(
        "{}",
        format!("  anemone.json written to {}\n", anemone_dir.display()).green()
    );

    show_funding_panel(&address.to_string());

    Ok(config)
}

/// Display the startup banner.
fn show_banner() {
    println!();
    println!("{}", "   ANEMONE".cyan().bold());
    println!("{}", "   on-chain agent runtime for Sui".dimmed());
    println!();
}

/// Display the funding panel with instructions.
fn show_funding_panel(address: &str) {
    let short = if address.len() > 11 {
        format!("{}...{}", &address[..6], &address[address.len() - 5..])
    } else {
        address.to_string()
    };
    let w = 58;

    let pad = |s: &str| -> String {
        let padding = if s.len() < w { w - s.len() } else { 0 };
        format!("{}{}", s, " ".repeat(padding))
    };

    let border_top = format!("  {}{}{}", "\u{256D}", "\u{2500}".repeat(w), "\u{256E}");
    let border_bot = format!("  {}{}{}", "\u{2570}", "\u{2500}".repeat(w), "\u{256F}");
    let empty_line = format!("  \u{2502}{}\u{2502}", " ".repeat(w));

    println!("{}", border_top.cyan());
    println!(
        "{}",
        format!("  \u{2502}{}\u{2502}", pad("  Fund your agent wallet")).cyan()
    );
    println!("{}", empty_line.cyan());
    println!(
        "{}",
        format!("  \u{2502}{}\u{2502}", pad(&format!("  Address: {}", short))).cyan()
    );
    println!("{}", empty_line.cyan());
    println!(
        "{}",
        format!(
            "  \u{2502}{}\u{2502}",
            pad("  Send SUI to the address above to cover gas")
        )
        .cyan()
    );
    println!(
        "{}",
        format!(
            "  \u{2502}{}\u{2502}",
            pad("  and the initial role deposit (0.1 SUI).")
        )
        .cyan()
    );
    println!("{}", empty_line.cyan());
    println!("{}", border_bot.cyan());
    println!();
}

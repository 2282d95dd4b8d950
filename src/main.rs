//! Anemone CLI
//!
//! Command-line entry point for the anemone agent runtime: minting agent
//! roles, managing their balances and skills, chatting through the relay,
//! and moving idle SUI in and out of Navi lending.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::{BufRead, Write};

use anemone::agent::{create_actions, dispatch, ActionContext};
use anemone::api::relay::RelayClient;
use anemone::api::MappingHttpClient;
use anemone::chain::{get_sui_balance, SuiConnection};
use anemone::chain::object::{get_bot_nft_info, get_role_info, get_skill_info};
use anemone::config::{get_config_path, load_config, load_or_default, resolve_rpc_url};
use anemone::defi::{format_portfolio, NaviApiClient, NaviService};
use anemone::identity::wallet;
use anemone::sdk::{RoleManager, SkillManager};
use anemone::setup::wizard::run_setup_wizard;
use anemone::tokens::{mist_to_sui_string, sui_to_mist};
use anemone::types::{AnemoneConfig, MappingStore, TxResult};

const VERSION: &str = "0.1.0";

/// Default deposit when minting a new role: 0.1 SUI.
const DEFAULT_MINT_DEPOSIT: &str = "0.1";

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(
    name = "anemone",
    version = VERSION,
    about = "On-chain agent runtime for Sui",
    long_about = "Anemone mints agent roles as on-chain objects, wires them to \
                  off-chain bot identities through a mapping service, and lets \
                  them chat, manage skills, and lend idle SUI on Navi."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive setup wizard
    Setup,

    /// Show configuration, wallet, and balance
    Status,

    /// Mint a new agent: generate a bot address, create the Role, store the mapping
    Mint {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        /// Image URL for the BotNFT
        #[arg(long)]
        image: String,
        /// Initial deposit in SUI
        #[arg(long, default_value = DEFAULT_MINT_DEPOSIT)]
        deposit: String,
    },

    /// Deposit SUI into a Role
    Deposit {
        #[arg(long)]
        role_id: String,
        /// Amount in SUI
        #[arg(long)]
        amount: String,
    },

    /// Withdraw SUI from a Role (requires the BotNFT)
    Withdraw {
        #[arg(long)]
        role_id: String,
        #[arg(long)]
        nft_id: String,
        /// Amount in SUI
        #[arg(long)]
        amount: String,
    },

    /// Show on-chain Role state (and optionally the BotNFT)
    Role {
        #[arg(long)]
        role_id: String,
        #[arg(long)]
        nft_id: Option<String>,
    },

    /// List NFT mappings known to the mapping service
    Mappings,

    /// Chat with an agent through the relay
    Chat {
        #[arg(long)]
        agent_id: String,
    },

    /// Create, update, or toggle skills
    Skill {
        #[command(subcommand)]
        command: SkillCommands,
    },

    /// Navi lending operations
    Navi {
        #[command(subcommand)]
        command: NaviCommands,
    },

    /// Inspect and invoke agent actions directly
    Agent {
        #[command(subcommand)]
        command: AgentCommands,
    },
}

#[derive(Subcommand)]
enum AgentCommands {
    /// List the actions exposed to agents, with their parameter schemas
    List,
    /// Invoke an action as the bot behind a role
    Invoke {
        #[arg(long)]
        role_id: String,
        /// Action name, e.g. deposit_to_navi
        #[arg(long)]
        action: String,
        /// JSON payload for the action
        #[arg(long, default_value = "{}")]
        payload: String,
    },
}

#[derive(Subcommand)]
enum SkillCommands {
    /// Publish a new Skill object
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        /// Usage documentation shown to agents
        #[arg(long)]
        doc: String,
        /// Usage fee in SUI
        #[arg(long, default_value = "0")]
        fee: String,
    },
    /// Update an existing Skill
    Update {
        #[arg(long)]
        skill_id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        doc: String,
        /// Usage fee in SUI
        #[arg(long, default_value = "0")]
        fee: String,
    },
    /// Flip a Skill's enabled flag
    Toggle {
        #[arg(long)]
        skill_id: String,
    },
}

#[derive(Subcommand)]
enum NaviCommands {
    /// Supply SUI from the local wallet to the Navi pool
    Deposit {
        /// Amount in SUI
        #[arg(long)]
        amount: String,
    },
    /// Withdraw SUI from Navi and deposit it into a Role
    Withdraw {
        /// Amount in SUI
        #[arg(long)]
        amount: String,
        #[arg(long)]
        role_id: String,
    },
    /// Show the Navi portfolio for an address (defaults to the local wallet)
    Portfolio {
        #[arg(long)]
        address: Option<String>,
    },
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load the saved config, or walk through first-run setup when missing.
async fn load_config_or_setup() -> Result<AnemoneConfig> {
    match load_config() {
        Some(config) => Ok(config),
        None => {
            println!("{}", "No configuration found.".yellow());
            run_setup_wizard().await
        }
    }
}

fn connect(config: &AnemoneConfig) -> Result<SuiConnection> {
    let rpc_url = resolve_rpc_url(config);
    SuiConnection::new(config.network, &rpc_url)
}

fn require_package(config: &AnemoneConfig) -> Result<()> {
    if config.package_id.is_empty() {
        anyhow::bail!("Package ID is not configured. Run `anemone setup` first.");
    }
    Ok(())
}

fn print_tx_result(result: &TxResult, connection: &SuiConnection) {
    if result.success {
        println!("{}", result.message.green());
        println!("  {}", connection.transaction_link(&result.tx).dimmed());
    } else {
        println!("{} {}", "Failed:".red(), result.message);
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

async fn show_status() -> Result<()> {
    let config = load_or_default();
    let config_path = get_config_path();

    println!();
    println!("{}", "=== ANEMONE STATUS ===".cyan().bold());
    println!();
    println!("  Config:      {}", config_path.display());
    println!("  Network:     {}", config.network);
    println!("  RPC URL:     {}", resolve_rpc_url(&config));
    println!(
        "  Package:     {}",
        if config.package_id.is_empty() {
            "(not set)".to_string()
        } else {
            config.package_id.clone()
        }
    );
    println!(
        "  MintCap:     {}",
        if config.mint_cap_id.is_empty() {
            "(not set)".to_string()
        } else {
            config.mint_cap_id.clone()
        }
    );
    println!("  Mapping API: {}", config.mapping_api_url);
    println!(
        "  Relay:       {}",
        if config.relay_url.is_empty() {
            "(not set)".to_string()
        } else {
            config.relay_url.clone()
        }
    );
    println!(
        "  Navi:        {}",
        if config.navi.is_configured() {
            "configured"
        } else {
            "not configured"
        }
    );

    match wallet::get_wallet_address() {
        Some(address) => {
            println!("  Wallet:      {}", address);
            match connect(&config) {
                Ok(connection) => {
                    let mut client = connection.client();
                    let owner = anemone::chain::client::parse_address(&address)?;
                    match get_sui_balance(&mut client, owner).await {
                        Ok(balance) => println!(
                            "  Balance:     {} SUI",
                            mist_to_sui_string(balance, 4)
                        ),
                        Err(e) => println!("  Balance:     unavailable ({})", e),
                    }
                }
                Err(e) => println!("  Balance:     unavailable ({})", e),
            }
        }
        None => println!("  Wallet:      {}", "not created (run `anemone setup`)".yellow()),
    }

    println!();
    Ok(())
}

async fn cmd_mint(
    config: &AnemoneConfig,
    name: &str,
    description: &str,
    image: &str,
    deposit: &str,
) -> Result<()> {
    require_package(config)?;
    if config.mint_cap_id.is_empty() {
        anyhow::bail!("MintCap ID is not configured. Run `anemone setup` first.");
    }

    let connection = connect(config)?;
    let store = MappingHttpClient::new(&config.mapping_api_url);
    let (sender, sk, _) = wallet::get_wallet()?;
    let amount = sui_to_mist(deposit)?;

    println!("{}", "Generating bot address...".cyan());
    let bot_address = store
        .generate_address()
        .await
        .context("Failed to generate bot address")?;
    println!("  Bot address: {}", bot_address);

    println!("{}", "Creating role on-chain...".cyan());
    let spec = RoleManager::new().create_role(
        &bot_address,
        &config.mint_cap_id,
        name,
        description,
        image,
        amount,
    );
    let executed = connection
        .execute_call(&config.package_id, &spec, sender, &sk)
        .await
        .context("create_role transaction failed")?;

    let role_id = executed
        .created
        .iter()
        .find(|o| o.type_ends_with("::role_manager::Role"))
        .map(|o| o.id.clone())
        .context("No Role object found in transaction effects")?;
    let nft_id = executed
        .created
        .iter()
        .find(|o| o.type_ends_with("::bot_nft::BotNFT"))
        .map(|o| o.id.clone())
        .context("No BotNFT object found in transaction effects")?;

    println!("{}", "Storing NFT mapping...".cyan());
    store
        .store_mapping(&bot_address, &nft_id, &role_id)
        .await
        .context("Failed to store NFT mapping")?;

    println!();
    println!("{}", "Agent minted successfully".green().bold());
    println!("  Role:    {}", role_id);
    println!("  BotNFT:  {}", nft_id);
    println!("  Bot:     {}", bot_address);
    println!("  Deposit: {} SUI", mist_to_sui_string(amount, 4));
    println!(
        "  {}",
        connection.transaction_link(&executed.digest).dimmed()
    );
    Ok(())
}

async fn cmd_deposit(config: &AnemoneConfig, role_id: &str, amount: &str) -> Result<()> {
    require_package(config)?;
    let connection = connect(config)?;
    let (sender, sk, _) = wallet::get_wallet()?;
    let mist = sui_to_mist(amount)?;

    let spec = RoleManager::new().deposit_sui(role_id, mist);
    let executed = connection
        .execute_call(&config.package_id, &spec, sender, &sk)
        .await
        .context("deposit_sui transaction failed")?;

    println!(
        "{}",
        format!("Deposited {} SUI into role", mist_to_sui_string(mist, 4)).green()
    );
    println!(
        "  {}",
        connection.transaction_link(&executed.digest).dimmed()
    );
    Ok(())
}

async fn cmd_withdraw(
    config: &AnemoneConfig,
    role_id: &str,
    nft_id: &str,
    amount: &str,
) -> Result<()> {
    require_package(config)?;
    let connection = connect(config)?;
    let (sender, sk, _) = wallet::get_wallet()?;
    let mist = sui_to_mist(amount)?;

    let spec = RoleManager::new().withdraw_sui_with_nft(role_id, nft_id, mist);
    let executed = connection
        .execute_call(&config.package_id, &spec, sender, &sk)
        .await
        .context("withdraw_sui_with_nft transaction failed")?;

    println!(
        "{}",
        format!("Withdrew {} SUI from role", mist_to_sui_string(mist, 4)).green()
    );
    println!(
        "  {}",
        connection.transaction_link(&executed.digest).dimmed()
    );
    Ok(())
}

async fn cmd_role(config: &AnemoneConfig, role_id: &str, nft_id: Option<&str>) -> Result<()> {
    let connection = connect(config)?;
    let mut client = connection.client();

    let role = get_role_info(&mut client, role_id).await?;

    println!();
    println!("{}", "=== ROLE ===".cyan().bold());
    println!("  ID:       {}", role.id);
    println!("  Balance:  {} SUI", mist_to_sui_string(role.balance, 2));
    println!("  Health:   {}", role.health);
    println!("  Active:   {}", role.is_active);
    println!("  Locked:   {}", role.is_locked);
    println!("  Bot:      {}", role.bot_address);
    if role.skills.is_empty() {
        println!("  Skills:   (none)");
    } else {
        println!("  Skills:");
        for skill_id in &role.skills {
            match get_skill_info(&mut client, skill_id).await {
                Ok(skill) => println!(
                    "    - {} ({}, fee {} SUI)",
                    skill.name,
                    if skill.is_enabled { "enabled" } else { "disabled" },
                    mist_to_sui_string(skill.fee, 2)
                ),
                Err(_) => println!("    - {}", skill_id),
            }
        }
    }

    if let Some(nft_id) = nft_id {
        let nft = get_bot_nft_info(&mut client, nft_id).await?;
        println!();
        println!("{}", "=== BOT NFT ===".cyan().bold());
        println!("  ID:          {}", nft.id);
        println!("  Name:        {}", nft.name);
        println!("  Description: {}", nft.description);
        println!("  Image:       {}", nft.url);
    }

    println!();
    Ok(())
}

async fn cmd_mappings(config: &AnemoneConfig) -> Result<()> {
    let store = MappingHttpClient::new(&config.mapping_api_url);
    let mappings = store.list_mappings().await?;

    if mappings.is_empty() {
        println!("No NFT mappings found.");
        return Ok(());
    }

    println!();
    println!("{}", format!("=== NFT MAPPINGS ({}) ===", mappings.len()).cyan().bold());
    for mapping in &mappings {
        println!();
        println!("  Address: {}", mapping.address);
        println!("  Role:    {}", mapping.role_id);
        println!("  NFT:     {}", mapping.nft_id);
        if !mapping.created_at.is_empty() {
            println!("  Created: {}", mapping.created_at.dimmed());
        }
    }
    println!();
    Ok(())
}

async fn cmd_chat(config: &AnemoneConfig, agent_id: &str) -> Result<()> {
    if config.relay_url.is_empty() {
        anyhow::bail!("Relay URL is not configured. Run `anemone setup` first.");
    }

    let relay = RelayClient::new(&config.relay_url);

    println!(
        "{}",
        format!("Chatting with agent {}. Type 'exit' to quit.", agent_id).dimmed()
    );

    let stdin = std::io::stdin();
    loop {
        print!("{} ", "you>".cyan().bold());
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if text == "exit" || text == "quit" {
            break;
        }

        match relay.send_message(agent_id, text).await {
            Ok(reply) => println!("{} {}", "agent>".green().bold(), reply),
            Err(e) => println!("{} {:#}", "error>".red().bold(), e),
        }
    }

    Ok(())
}

async fn cmd_skill(config: &AnemoneConfig, command: SkillCommands) -> Result<()> {
    require_package(config)?;
    let connection = connect(config)?;
    let (sender, sk, _) = wallet::get_wallet()?;
    let skills = SkillManager::new();

    let (spec, done_message) = match &command {
        SkillCommands::Create {
            name,
            description,
            doc,
            fee,
        } => (
            skills.create_skill(name, description, doc, sui_to_mist(fee)?),
            format!("Skill '{}' created", name),
        ),
        SkillCommands::Update {
            skill_id,
            name,
            description,
            doc,
            fee,
        } => (
            skills.update_skill(skill_id, name, description, doc, sui_to_mist(fee)?),
            format!("Skill {} updated", skill_id),
        ),
        SkillCommands::Toggle { skill_id } => (
            skills.toggle_skill(skill_id),
            format!("Skill {} toggled", skill_id),
        ),
    };

    let executed = connection
        .execute_call(&config.package_id, &spec, sender, &sk)
        .await
        .context("Skill transaction failed")?;

    println!("{}", done_message.green());
    if let SkillCommands::Create { .. } = command {
        for created in &executed.created {
            if created.type_ends_with("::skill_manager::Skill") {
                println!("  Skill ID: {}", created.id);
            }
        }
    }
    println!(
        "  {}",
        connection.transaction_link(&executed.digest).dimmed()
    );
    Ok(())
}

async fn cmd_navi(config: &AnemoneConfig, command: NaviCommands) -> Result<()> {
    let connection = connect(config)?;
    let navi = NaviService::new(
        connection.clone(),
        config.navi.clone(),
        config.package_id.clone(),
    );

    match command {
        NaviCommands::Deposit { amount } => {
            let (sender, sk, _) = wallet::get_wallet()?;
            let mist = sui_to_mist(&amount)?;
            let result = navi.deposit_sui(mist, sender, &sk).await;
            print_tx_result(&result, &connection);
        }
        NaviCommands::Withdraw { amount, role_id } => {
            // Withdrawals are signed by the role's bot key, same as the
            // agent-facing action.
            let store = MappingHttpClient::new(&config.mapping_api_url);
            let (sender, sk) =
                anemone::identity::resolver::resolve_bot_signer(&store, &role_id).await?;
            let mist = sui_to_mist(&amount)?;
            let result = navi.withdraw_to_role(mist, &role_id, sender, &sk).await;
            print_tx_result(&result, &connection);
        }
        NaviCommands::Portfolio { address } => {
            let address = match address {
                Some(a) => a,
                None => wallet::get_wallet_address()
                    .context("No wallet found. Run `anemone setup` first.")?,
            };
            let api = NaviApiClient::new(&config.navi.open_api_url);
            let portfolio = api.portfolio(&address).await?;
            println!("{}", format_portfolio(&portfolio));
        }
    }

    Ok(())
}

async fn cmd_agent(config: &AnemoneConfig, command: AgentCommands) -> Result<()> {
    match command {
        AgentCommands::List => {
            for action in create_actions() {
                println!();
                println!("{}", action.name.cyan().bold());
                println!("  {}", action.description);
                println!(
                    "  {}",
                    serde_json::to_string(&action.parameters)?.dimmed()
                );
            }
            println!();
        }
        AgentCommands::Invoke {
            role_id,
            action,
            payload,
        } => {
            require_package(config)?;
            let payload: serde_json::Value =
                serde_json::from_str(&payload).context("Payload is not valid JSON")?;

            let connection = connect(config)?;
            let store = MappingHttpClient::new(&config.mapping_api_url);
            let navi = NaviService::new(
                connection.clone(),
                config.navi.clone(),
                config.package_id.clone(),
            );
            let navi_api = NaviApiClient::new(&config.navi.open_api_url);
            let ctx = ActionContext::for_role(
                &store,
                &role_id,
                connection,
                navi,
                navi_api,
                config.package_id.clone(),
            )
            .await?;

            let result = dispatch(&action, &payload, &ctx).await;
            if result.success {
                println!("{}", result.text);
            } else {
                println!("{} {}", "Failed:".red(), result.text);
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Setup => run_setup_wizard().await.map(|_| ()),
        Commands::Status => show_status().await,
        Commands::Mint {
            name,
            description,
            image,
            deposit,
        } => match load_config_or_setup().await {
            Ok(config) => cmd_mint(&config, &name, &description, &image, &deposit).await,
            Err(e) => Err(e),
        },
        Commands::Deposit { role_id, amount } => match load_config_or_setup().await {
            Ok(config) => cmd_deposit(&config, &role_id, &amount).await,
            Err(e) => Err(e),
        },
        Commands::Withdraw {
            role_id,
            nft_id,
            amount,
        } => match load_config_or_setup().await {
            Ok(config) => cmd_withdraw(&config, &role_id, &nft_id, &amount).await,
            Err(e) => Err(e),
        },
        Commands::Role { role_id, nft_id } => match load_config_or_setup().await {
            Ok(config) => cmd_role(&config, &role_id, nft_id.as_deref()).await,
            Err(e) => Err(e),
        },
        Commands::Mappings => match load_config_or_setup().await {
            Ok(config) => cmd_mappings(&config).await,
            Err(e) => Err(e),
        },
        Commands::Chat { agent_id } => match load_config_or_setup().await {
            Ok(config) => cmd_chat(&config, &agent_id).await,
            Err(e) => Err(e),
        },
        Commands::Skill { command } => match load_config_or_setup().await {
            Ok(config) => cmd_skill(&config, command).await,
            Err(e) => Err(e),
        },
        Commands::Navi { command } => match load_config_or_setup().await {
            Ok(config) => cmd_navi(&config, command).await,
            Err(e) => Err(e),
        },
        Commands::Agent { command } => match load_config_or_setup().await {
            Ok(config) => cmd_agent(&config, command).await,
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

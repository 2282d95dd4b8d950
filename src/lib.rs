//! Anemone -- On-Chain Agent Wallet SDK
//!
//! An agent identity on Sui: a Role object holding a SUI balance and a set of
//! skills, gated by a BotNFT ownership credential. This crate builds and
//! executes the move calls for role and skill management, integrates the Navi
//! lending protocol for the agent's treasury, and talks to the off-chain
//! mapping service and chat relay.

pub mod types;
pub mod config;
pub mod error;
pub mod tokens;
pub mod identity;
pub mod chain;
pub mod sdk;
pub mod api;
pub mod defi;
pub mod agent;
pub mod setup;

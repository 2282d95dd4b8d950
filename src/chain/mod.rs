//! Sui gRPC interface.
//!
//! [`SuiConnection`] owns the gRPC client and lowers [`CallSpec`]s into
//! signed programmable transactions. Object JSON reads live in [`object`],
//! SUI balance queries and the balance-wait helper in [`balance`].
//!
//! [`CallSpec`]: crate::sdk::CallSpec

pub mod balance;
pub mod client;
pub mod object;
pub mod parse;

pub use balance::{get_sui_balance, wait_for_balance};
pub use client::{CreatedObject, ExecutedCall, SuiConnection};

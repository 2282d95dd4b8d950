//! Navi lending protocol integration.
//!
//! [`NaviService`] builds and executes deposits and withdrawals against the
//! configured Navi pool objects; [`portfolio`] talks to the Navi open API.

pub mod navi;
pub mod portfolio;
pub mod retry;

pub use navi::NaviService;
pub use portfolio::{format_portfolio, NaviApiClient, NaviPortfolio};
pub use retry::with_retry;

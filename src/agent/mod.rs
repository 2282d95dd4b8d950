//! Agent runtime actions.
//!
//! The fixed set of operations an agent can perform on behalf of its Role,
//! exposed with JSON-schema parameter definitions and a name-based
//! dispatcher.

pub mod actions;

pub use actions::{create_actions, dispatch, ActionContext, ActionResult, AgentAction};

//! Setup Module
//!
//! Interactive setup wizard and terminal prompts for first-run
//! initialization.

pub mod prompts;
pub mod wizard;

//! Identity: key material for the operator and the agent's bot signer.

pub mod keypair;
pub mod resolver;
pub mod wallet;

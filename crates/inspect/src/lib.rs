//! Command line client for reading resources from an fsmcp server.

pub mod client;
pub mod cmd;
pub mod error;

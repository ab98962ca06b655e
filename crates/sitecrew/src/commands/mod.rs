//! Command handlers, one module per top-level subcommand.

pub mod assign;
pub mod certs;
pub mod config_cmd;
pub mod personnel;
pub mod sites;
pub mod stats;

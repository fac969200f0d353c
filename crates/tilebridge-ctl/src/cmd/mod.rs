//! CLI command modules.

pub mod chunks;

//! CLI command implementations

pub mod completions;
pub mod config;
pub mod dashboard;
pub mod delivery;
pub mod inventory;
pub mod projects;
pub mod sheets;
pub mod status;

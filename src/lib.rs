//! # TW Log Analyzer
//!
//! Territory War battle-log analysis: attack ledgers, leader matchups,
//! defensive footprint and participation reports.
//!
//! ## Architecture
//!
//! - **models**: Raw event shape, derived records and aggregate rows
//! - **classify**: Per-event classification into attacks, deployments and noise
//! - **ledger**: Deduplicated, guild-partitioned attack ledgers
//! - **calculate**: Aggregations over attack records
//! - **participation**: Roster-aware participation reconciliation
//! - **analysis**: One loaded snapshot and every view derived from it
//! - **storage**: Local document loading and refresh metadata
//! - **fetch**: Upstream data API client
//! - **report**: Text tables and the Markdown context block
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod analysis;
pub mod api;
pub mod calculate;
pub mod classify;
pub mod config;
pub mod fetch;
pub mod ledger;
pub mod models;
pub mod participation;
pub mod report;
pub mod storage;

pub use models::*;

/// Flatten player-name arguments, accepting comma-separated lists.
pub fn parse_player_names<S: AsRef<str>>(args: &[S]) -> Vec<String> {
    args.iter()
        .flat_map(|arg| arg.as_ref().split(','))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

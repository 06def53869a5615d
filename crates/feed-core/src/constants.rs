//! Application-wide constants
//!
//! Centralized location for configuration values that are used across
//! multiple modules.

/// Number of items fetched per backward page.
pub const PAGE_SIZE: usize = 7;

/// Seconds between presence heartbeat mutations.
pub const HEARTBEAT_INTERVAL_SECS: u64 = 30;

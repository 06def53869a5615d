use std::time::Duration;

use crate::constants::{HEARTBEAT_INTERVAL_SECS, PAGE_SIZE};

#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Items per backward page.
    pub page_size: usize,
    /// Cadence of the presence heartbeat.
    pub heartbeat_interval: Duration,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            page_size: PAGE_SIZE,
            heartbeat_interval: Duration::from_secs(HEARTBEAT_INTERVAL_SECS),
        }
    }
}

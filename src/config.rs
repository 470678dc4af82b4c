//! Driver configuration.
//!
//! Only values the protocol core consumes live here; where the
//! configuration comes from is up to the embedding application.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::protocol::UPDATE_INTERVAL_DEFAULT_MS;

/// Settings applied when a controller is probed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Requested status report period in milliseconds.
    pub update_interval_ms: u32,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: UPDATE_INTERVAL_DEFAULT_MS,
        }
    }
}

impl DriverConfig {
    /// Parse a JSON document, filling missing fields with defaults.
    ///
    /// # Example
    /// ```
    /// use nzxt_smart_devices::config::DriverConfig;
    ///
    /// let config = DriverConfig::from_json(r#"{ "update_interval_ms": 500 }"#).unwrap();
    /// assert_eq!(config.update_interval_ms, 500);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Record key of the snapshot being edited.
pub const SNAPSHOT_KEY: &str = "savings_current";

/// Record key of the history log.
pub const HISTORY_KEY: &str = "savings_history";

/// Record key of the user settings.
pub const SETTINGS_KEY: &str = "savings_settings";

/// User-configurable settings, stored as their own record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// The currency all values are expressed in (e.g., "EGP").
    #[serde(default = "default_local_currency")]
    pub local_currency: String,

    /// Maximum number of history entries to keep. `None` keeps everything.
    #[serde(default)]
    pub history_limit: Option<usize>,

    /// Optional API keys for providers that require them.
    /// Keys: provider name (e.g., "metals_dev").
    #[serde(default)]
    pub api_keys: HashMap<String, String>,
}

fn default_local_currency() -> String {
    "EGP".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            local_currency: default_local_currency(),
            history_limit: None,
            api_keys: HashMap::new(),
        }
    }
}

/// Where the cloud backend keeps per-user documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudConfig {
    pub collection: String,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            collection: "userData".to_string(),
        }
    }
}

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Configuration from jotter.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub user: UserConfig,
    #[serde(default)]
    pub trash: TrashConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    /// Actor name recorded as `deletedBy` on trash records
    #[serde(default = "default_user_name")]
    pub name: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        UserConfig {
            name: default_user_name(),
        }
    }
}

fn default_user_name() -> String {
    "Anonymous".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrashConfig {
    /// Trash service endpoint. Absent → deletes go to the in-memory
    /// trash (demo mode).
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    /// Color overrides by theme slot name, e.g. `highlight = "#FB4196"`
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// Open the completed view by default
    #[serde(default)]
    pub show_completed: bool,
}

//! Client configuration

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Base address of the media server, e.g. "http://tv.local:8888"
    #[serde(default = "default_server")]
    pub server_address: String,
    /// Global timeout for a single request/response exchange, in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// Connect timeout, in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_server() -> String {
    "http://localhost:8888".to_string()
}
fn default_timeout() -> u64 {
    30
}
fn default_connect_timeout() -> u64 {
    10
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            server_address: default_server(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl CoreConfig {
    fn config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("mediahome");
        fs::create_dir_all(&path).ok();
        path.push("config.json");
        path
    }

    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            if let Ok(content) = fs::read_to_string(path) {
                if let Ok(config) = serde_json::from_str(&content) {
                    return config;
                }
            }
        }

        Self::default()
    }

    pub fn save(&self) {
        self.save_to(&Self::config_path());
    }

    pub fn save_to(&self, path: &Path) {
        if let Ok(content) = serde_json::to_string_pretty(self) {
            let _ = fs::write(path, content);
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

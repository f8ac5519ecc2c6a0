use serde::{Deserialize, Serialize};

/// Configuration from config.json in the data directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// iCal feed URLs (https:// or webcal://).
    #[serde(default)]
    pub calendar_urls: Vec<String>,
    /// Data file name, relative to the config directory.
    #[serde(default = "default_data_file")]
    pub data_file: String,
    /// Quote files, absolute or relative to the config directory.
    /// `.json` files hold a quote array; anything else is parsed as PQF.
    #[serde(default)]
    pub quote_files: Vec<String>,
    /// Calendar feed cache lifetime in seconds.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_time_format")]
    pub time_format: String,
    #[serde(default = "default_theme")]
    pub theme: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            calendar_urls: Vec::new(),
            data_file: default_data_file(),
            quote_files: Vec::new(),
            refresh_interval: default_refresh_interval(),
            date_format: default_date_format(),
            time_format: default_time_format(),
            theme: default_theme(),
        }
    }
}

fn default_data_file() -> String {
    "data.json".to_string()
}

fn default_refresh_interval() -> u64 {
    300
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_time_format() -> String {
    "%H:%M".to_string()
}

fn default_theme() -> String {
    "dracula".to_string()
}

use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use stop_words::{get, LANGUAGE};

/// Application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub dashboard: DashboardConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Where the message export lives and how its columns are named.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub csv_path: String,
    pub timestamp_column: String,
    pub direction_column: String,
    pub text_column: String,
    pub incoming_value: String,
    pub outgoing_value: String,
    pub incoming_party: String,
    pub outgoing_party: String,
    pub photos_dir: String,
}

/// Defaults for the interactive controls and the periodic panels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub default_smoothing_span: u32,
    pub default_ngram_size: usize,
    /// Whitespace-separated stop words used when the page sends none
    pub default_stop_words: String,
    pub sample_size: usize,
    pub message_refresh_secs: u64,
    pub photo_refresh_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
    pub format: String, // "json" or "text"
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8050,
            },
            data: DataConfig {
                csv_path: "data/messages.csv".to_string(),
                timestamp_column: "Message Date".to_string(),
                direction_column: "Type".to_string(),
                text_column: "Text".to_string(),
                incoming_value: "Incoming".to_string(),
                outgoing_value: "Outgoing".to_string(),
                incoming_party: "Them".to_string(),
                outgoing_party: "Me".to_string(),
                photos_dir: "data/photos".to_string(),
            },
            dashboard: DashboardConfig {
                default_smoothing_span: 1,
                default_ngram_size: 2,
                default_stop_words: get(LANGUAGE::English).join(" "),
                sample_size: 5,
                message_refresh_secs: 10,
                photo_refresh_secs: 30,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                format: "text".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence
    pub fn load() -> Result<Self> {
        // Start with default values
        let mut builder = Config::builder();
        for (key, value) in AppConfig::default() {
            builder = builder.set_default(key, value)?;
        }

        let config = builder
            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(File::with_name("config").required(false))
            // Add environment variables with prefix
            .add_source(Environment::with_prefix("TXT_DASHBOARD").separator("__"))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

        let app_config: AppConfig = config
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to deserialize configuration: {}", e))?;

        // Validate configuration
        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate server config
        if self.server.port == 0 {
            return Err(anyhow::anyhow!("server.port must be greater than 0"));
        }

        // Validate data config
        if self.data.incoming_party.trim().is_empty() || self.data.outgoing_party.trim().is_empty()
        {
            return Err(anyhow::anyhow!("party labels must not be empty"));
        }
        if self.data.incoming_party == self.data.outgoing_party {
            return Err(anyhow::anyhow!("party labels must be distinct"));
        }
        if self.data.incoming_value == self.data.outgoing_value {
            return Err(anyhow::anyhow!("direction values must be distinct"));
        }

        // Validate dashboard config
        if !(1..=365).contains(&self.dashboard.default_smoothing_span) {
            return Err(anyhow::anyhow!(
                "default_smoothing_span must be between 1 and 365, got {}",
                self.dashboard.default_smoothing_span
            ));
        }
        if !(1..=5).contains(&self.dashboard.default_ngram_size) {
            return Err(anyhow::anyhow!(
                "default_ngram_size must be between 1 and 5, got {}",
                self.dashboard.default_ngram_size
            ));
        }
        if self.dashboard.sample_size == 0 {
            return Err(anyhow::anyhow!("sample_size must be greater than 0"));
        }
        if self.dashboard.message_refresh_secs == 0 || self.dashboard.photo_refresh_secs == 0 {
            return Err(anyhow::anyhow!("refresh intervals must be greater than 0"));
        }

        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            ));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format,
                valid_formats
            ));
        }

        Ok(())
    }

    /// Get CSV path from environment or config
    pub fn get_csv_path(&self) -> String {
        std::env::var("MESSAGES_CSV_PATH").unwrap_or_else(|_| self.data.csv_path.clone())
    }

    /// Get log level from environment or config
    pub fn get_log_level(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| self.logging.level.clone())
    }
}

impl IntoIterator for AppConfig {
    type Item = (String, config::Value);
    type IntoIter = std::collections::hash_map::IntoIter<String, config::Value>;

    fn into_iter(self) -> Self::IntoIter {
        let mut map = std::collections::HashMap::new();

        // Flatten the configuration into key-value pairs
        map.insert(
            "server.host".to_string(),
            config::Value::from(self.server.host),
        );
        map.insert(
            "server.port".to_string(),
            config::Value::from(u32::from(self.server.port)),
        );

        map.insert(
            "data.csv_path".to_string(),
            config::Value::from(self.data.csv_path),
        );
        map.insert(
            "data.timestamp_column".to_string(),
            config::Value::from(self.data.timestamp_column),
        );
        map.insert(
            "data.direction_column".to_string(),
            config::Value::from(self.data.direction_column),
        );
        map.insert(
            "data.text_column".to_string(),
            config::Value::from(self.data.text_column),
        );
        map.insert(
            "data.incoming_value".to_string(),
            config::Value::from(self.data.incoming_value),
        );
        map.insert(
            "data.outgoing_value".to_string(),
            config::Value::from(self.data.outgoing_value),
        );
        map.insert(
            "data.incoming_party".to_string(),
            config::Value::from(self.data.incoming_party),
        );
        map.insert(
            "data.outgoing_party".to_string(),
            config::Value::from(self.data.outgoing_party),
        );
        map.insert(
            "data.photos_dir".to_string(),
            config::Value::from(self.data.photos_dir),
        );

        map.insert(
            "dashboard.default_smoothing_span".to_string(),
            config::Value::from(self.dashboard.default_smoothing_span),
        );
        map.insert(
            "dashboard.default_ngram_size".to_string(),
            config::Value::from(self.dashboard.default_ngram_size as u64),
        );
        map.insert(
            "dashboard.default_stop_words".to_string(),
            config::Value::from(self.dashboard.default_stop_words),
        );
        map.insert(
            "dashboard.sample_size".to_string(),
            config::Value::from(self.dashboard.sample_size as u64),
        );
        map.insert(
            "dashboard.message_refresh_secs".to_string(),
            config::Value::from(self.dashboard.message_refresh_secs),
        );
        map.insert(
            "dashboard.photo_refresh_secs".to_string(),
            config::Value::from(self.dashboard.photo_refresh_secs),
        );

        map.insert(
            "logging.level".to_string(),
            config::Value::from(self.logging.level),
        );
        if let Some(file_path) = self.logging.file_path {
            map.insert(
                "logging.file_path".to_string(),
                config::Value::from(file_path),
            );
        }
        map.insert(
            "logging.format".to_string(),
            config::Value::from(self.logging.format),
        );

        map.into_iter()
    }
}

//! Configuration service for loading and generating config files.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::types::default_log_path_for_config_dir;
use super::Config;

/// Configuration service.
pub struct ConfigService;

impl ConfigService {
    /// Get the default configuration file path.
    /// Always uses ~/.config/crashgate/config.toml for cross-platform consistency.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("crashgate")
            .join("config.toml")
    }

    /// Load configuration from file.
    ///
    /// If `path` is `None`, uses the default path.
    /// If the file doesn't exist, creates default configuration file.
    /// Validates configuration after loading.
    /// Log path defaults to the same directory as config file.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let path = path.map(PathBuf::from).unwrap_or_else(Self::default_path);

        if !path.exists() {
            // Create default config file
            Self::generate_at(&path)?;
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content, path.parent())
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Parse and validate configuration text.
    ///
    /// `config_dir` anchors the default log directory when the file sets none.
    pub fn parse(content: &str, config_dir: Option<&Path>) -> Result<Config> {
        let mut config: Config = toml::from_str(content).context("Failed to parse config file")?;

        // Check if log_path matches the general default (meaning it wasn't set in file)
        let general_default = default_log_path_for_config_dir(None);
        if config.log_path == general_default {
            config.log_path = default_log_path_for_config_dir(config_dir);
        }

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Generate default configuration file at the default path.
    pub fn generate_default() -> Result<()> {
        Self::generate_at(&Self::default_path())
    }

    /// Generate default configuration file at the specified path.
    pub fn generate_at(path: &Path) -> Result<()> {
        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, Self::default_config_content())
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Generate default configuration content with comments.
    fn default_config_content() -> &'static str {
        r#"# crashgate configuration file

# Enable debug logging to file (default: false)
debug = false

# Path to log directory (default: same directory as config.toml/logs)
# log_path = "~/.config/crashgate/logs"

# Days to keep rotated log files (default: 2)
log_retention_days = 2

# Version stamped onto reports that do not carry one
# version = "1.0.0"

# Require a request context for every client (web applications)
request_scoped = false

# Wrapper errors whose cause should be reported instead
[unwrap]
kinds = [
    "java.lang.reflect.InvocationTargetException",
    "javax.servlet.ServletException",
]
# patterns = ["^com\\.example\\..*WrapperException$"]

# Suppress identical errors delivered within ttl_secs
[duplicate]
enabled = true
ttl_secs = 60
# "full" (kind + message + leading stack frames) or "kind_and_message"
strategy = "full"
stack_depth = 5

# Drop whole reports
[exclude]
status_codes = []
kinds = []
patterns = []
local_requests = false

# Replace sensitive request values before sending
[redact]
replacement = "[FILTERED]"
query_string = ["password"]
headers = ["Authorization", "Cookie"]
form = ["password"]
cookies = []
"#
    }
}

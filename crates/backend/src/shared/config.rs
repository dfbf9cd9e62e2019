use once_cell::sync::OnceCell;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub activity_log: ActivityLogConfig,
}

/// Process-wide settings of activity-log composition
#[derive(Debug, Deserialize, Clone)]
pub struct ActivityLogConfig {
    /// Lowercase action-name prefix that marks student pages
    pub student_page_prefix: String,
    /// Lowercase action-name prefix that marks instructor pages
    pub instructor_page_prefix: String,
    /// URL prefix of system-triggered automated actions
    pub auto_page_prefix: String,
    /// Actions treated as instructor pages by exact name
    pub instructor_stats_actions: Vec<String>,
    /// Fixed admin time zone, as an offset from UTC in hours
    pub admin_time_zone_offset_hours: i32,
}

impl Default for ActivityLogConfig {
    fn default() -> Self {
        Self {
            student_page_prefix: "student".to_string(),
            instructor_page_prefix: "instructor".to_string(),
            auto_page_prefix: "/auto/".to_string(),
            instructor_stats_actions: vec![
                "instructorFeedbackStatsPage".to_string(),
                "instructorCourseStatsPage".to_string(),
            ],
            admin_time_zone_offset_hours: 8,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            activity_log: ActivityLogConfig::default(),
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[activity_log]
student_page_prefix = "student"
instructor_page_prefix = "instructor"
auto_page_prefix = "/auto/"
instructor_stats_actions = ["instructorFeedbackStatsPage", "instructorCourseStatsPage"]
admin_time_zone_offset_hours = 8
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::Io)?;
                let config: Config = toml::from_str(&contents).map_err(ConfigError::Parse)?;
                return Ok(config);
            } else {
                tracing::debug!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG).map_err(ConfigError::Parse)?;
    Ok(config)
}

static CONFIG: OnceCell<Config> = OnceCell::new();

/// Process-wide configuration, loaded on first access.
/// A file-load failure falls back to the built-in defaults.
pub fn get_config() -> &'static Config {
    CONFIG.get_or_init(|| {
        load_config().unwrap_or_else(|e| {
            tracing::warn!("Falling back to default config: {}", e);
            Config::default()
        })
    })
}

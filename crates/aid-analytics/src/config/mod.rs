use std::env;
use std::fmt;
use std::path::PathBuf;

const DEFAULT_TOP_N: usize = 3;

/// Distinguishes runtime behavior for different stages of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the dashboard.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub dashboard: DashboardConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let snapshot = env::var("DASHBOARD_SNAPSHOT")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let top_n = match env::var("DASHBOARD_TOP_N") {
            Ok(value) => value
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|top_n| *top_n > 0)
                .ok_or(ConfigError::InvalidTopN { value })?,
            Err(_) => DEFAULT_TOP_N,
        };

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            dashboard: DashboardConfig { snapshot, top_n },
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where records come from and how large the leaderboard is.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub snapshot: Option<PathBuf>,
    pub top_n: usize,
}

impl DashboardConfig {
    /// Snapshot to load, preferring an explicit override over the environment.
    pub fn snapshot_path(&self, override_path: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
        override_path
            .or_else(|| self.snapshot.clone())
            .ok_or(ConfigError::MissingSnapshot)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidTopN { value: String },
    MissingSnapshot,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTopN { value } => {
                write!(f, "DASHBOARD_TOP_N must be a positive integer, got '{}'", value)
            }
            ConfigError::MissingSnapshot => {
                write!(f, "no records snapshot given; pass --snapshot or set DASHBOARD_SNAPSHOT")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

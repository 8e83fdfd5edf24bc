use chrono::Weekday;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub workforce: WorkforceConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            workforce: WorkforceConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Business dials shared by the attendance and reporting workflows.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkforceConfig {
    /// Days that never count as working days (Friday and Saturday unless overridden).
    pub weekend: Vec<Weekday>,
    /// Attendance rate, in percent, below which an employee is flagged as at risk.
    pub at_risk_rate: f64,
    /// Minimum records in the window before the at-risk rule applies.
    pub at_risk_min_records: usize,
    /// How far back approved evaluations count towards department performance.
    pub performance_lookback_months: u32,
}

impl Default for WorkforceConfig {
    fn default() -> Self {
        Self {
            weekend: vec![Weekday::Fri, Weekday::Sat],
            at_risk_rate: 75.0,
            at_risk_min_records: 5,
            performance_lookback_months: 3,
        }
    }
}

impl WorkforceConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let weekend = match env::var("APP_WEEKEND_DAYS") {
            Ok(raw) => parse_weekend(&raw)?,
            Err(_) => defaults.weekend,
        };

        let at_risk_rate = match env::var("APP_AT_RISK_RATE") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|rate| (0.0..=100.0).contains(rate))
                .ok_or(ConfigError::InvalidAtRiskRate(raw))?,
            Err(_) => defaults.at_risk_rate,
        };

        let at_risk_min_records = match env::var("APP_AT_RISK_MIN_RECORDS") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidNumber {
                    key: "APP_AT_RISK_MIN_RECORDS",
                    value: raw,
                })?,
            Err(_) => defaults.at_risk_min_records,
        };

        let performance_lookback_months = match env::var("APP_PERFORMANCE_LOOKBACK_MONTHS") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidNumber {
                    key: "APP_PERFORMANCE_LOOKBACK_MONTHS",
                    value: raw,
                })?,
            Err(_) => defaults.performance_lookback_months,
        };

        Ok(Self {
            weekend,
            at_risk_rate,
            at_risk_min_records,
            performance_lookback_months,
        })
    }
}

/// Parse a comma separated list of weekday names (`fri,sat`, `Friday, Saturday`).
pub fn parse_weekend(raw: &str) -> Result<Vec<Weekday>, ConfigError> {
    let mut days = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        let day = part
            .parse::<Weekday>()
            .map_err(|_| ConfigError::InvalidWeekday(part.to_string()))?;
        if !days.contains(&day) {
            days.push(day);
        }
    }
    Ok(days)
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidWeekday(String),
    InvalidAtRiskRate(String),
    InvalidNumber { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidWeekday(value) => {
                write!(f, "APP_WEEKEND_DAYS contains unknown weekday '{value}'")
            }
            ConfigError::InvalidAtRiskRate(value) => {
                write!(f, "APP_AT_RISK_RATE must be a percentage between 0 and 100, got '{value}'")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be a non-negative integer, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("APP_WEEKEND_DAYS");
        env::remove_var("APP_AT_RISK_RATE");
        env::remove_var("APP_AT_RISK_MIN_RECORDS");
        env::remove_var("APP_PERFORMANCE_LOOKBACK_MONTHS");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.workforce, WorkforceConfig::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn weekend_days_are_configurable() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_WEEKEND_DAYS", "Saturday, sun");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.workforce.weekend, vec![Weekday::Sat, Weekday::Sun]);
        reset_env();
    }

    #[test]
    fn rejects_unknown_weekday_and_out_of_range_rate() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_WEEKEND_DAYS", "fri,caturday");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidWeekday(day)) if day == "caturday"
        ));

        reset_env();
        env::set_var("APP_AT_RISK_RATE", "140");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidAtRiskRate(_))
        ));
        reset_env();
    }

    #[test]
    fn parse_weekend_skips_duplicates_and_blanks() {
        let days = parse_weekend("fri, ,Fri,sat").expect("parses");
        assert_eq!(days, vec![Weekday::Fri, Weekday::Sat]);
    }
}

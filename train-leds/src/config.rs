//! Process configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::domain::LineName;
use crate::feed::FeedConfig;
use crate::geo::Precision;
use crate::sink::SinkConfig;

/// Survey files shipped with the crate.
const DEFAULT_ROUTE_FILES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/RouteFiles");
const DEFAULT_FETCH_INTERVAL_SECS: u64 = 20;
const DEFAULT_STATUS_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_TRACKED_LINES: &str = "UP-NW";

/// Errors reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not valid: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("TRACKED_LINES names no lines")]
    NoTrackedLines,
}

/// Everything the binary needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub username: String,
    pub password: String,
    pub feed_base_url: String,
    /// Read positions from this file instead of the live feed.
    pub mock_feed_path: Option<PathBuf>,
    pub led_server_url: String,
    pub route_files_dir: PathBuf,
    pub fetch_interval: Duration,
    pub precision: Precision,
    pub status_addr: SocketAddr,
    pub tracked_lines: Vec<LineName>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable lookup. Unset and empty values take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let username = get("METRA_USERNAME").unwrap_or_default();
        let password = get("METRA_PASSWORD").unwrap_or_default();
        let mock_feed_path = get("MOCK_FEED_PATH").map(PathBuf::from);
        if mock_feed_path.is_none() && (username.is_empty() || password.is_empty()) {
            warn!("METRA_USERNAME or METRA_PASSWORD not set, feed requests will fail");
        }

        let fetch_interval_secs = match get("FETCH_INTERVAL_SECS") {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                Ok(_) => return Err(invalid("FETCH_INTERVAL_SECS", value, "must be positive")),
                Err(e) => return Err(invalid("FETCH_INTERVAL_SECS", value, e)),
            },
            None => DEFAULT_FETCH_INTERVAL_SECS,
        };

        let precision = match get("GEOHASH_PRECISION") {
            Some(value) => value
                .trim()
                .parse::<usize>()
                .map_err(|e| e.to_string())
                .and_then(|chars| Precision::new(chars).map_err(|e| e.to_string()))
                .map_err(|reason| invalid("GEOHASH_PRECISION", value.clone(), reason))?,
            None => Precision::DEFAULT,
        };

        let status_addr = get("STATUS_ADDR").unwrap_or_else(|| DEFAULT_STATUS_ADDR.to_string());
        let status_addr = status_addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| invalid("STATUS_ADDR", status_addr.clone(), e))?;

        let tracked = get("TRACKED_LINES").unwrap_or_else(|| DEFAULT_TRACKED_LINES.to_string());
        let tracked_lines = tracked
            .split(',')
            .filter(|name| !name.trim().is_empty())
            .map(|name| LineName::parse(name).map_err(|e| invalid("TRACKED_LINES", tracked.clone(), e)))
            .collect::<Result<Vec<_>, _>>()?;
        if tracked_lines.is_empty() {
            return Err(ConfigError::NoTrackedLines);
        }

        let feed_base_url = get("FEED_BASE_URL")
            .unwrap_or_else(|| FeedConfig::new(&username, &password).base_url);
        let led_server_url = get("LED_SERVER_URL").unwrap_or_else(|| SinkConfig::default().url);

        Ok(Self {
            username,
            password,
            feed_base_url,
            mock_feed_path,
            led_server_url,
            route_files_dir: get("ROUTE_FILES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ROUTE_FILES_DIR)),
            fetch_interval: Duration::from_secs(fetch_interval_secs),
            precision,
            status_addr,
            tracked_lines,
        })
    }

    pub fn feed_config(&self) -> FeedConfig {
        FeedConfig::new(&self.username, &self.password).with_base_url(&self.feed_base_url)
    }

    pub fn sink_config(&self) -> SinkConfig {
        SinkConfig::new(&self.led_server_url)
    }
}

fn invalid(var: &'static str, value: String, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        var,
        value,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.feed_base_url, FeedConfig::new("", "").base_url);
        assert_eq!(config.feed_base_url, "https://gtfsapi.metrarail.com");
        assert_eq!(config.led_server_url, SinkConfig::default().url);
        assert_eq!(config.led_server_url, "http://localhost:8675");
        assert!(config.route_files_dir.ends_with("data/RouteFiles"));
        assert!(config.route_files_dir.join("LineData-UP-NW.csv").is_file());
        assert_eq!(config.fetch_interval, Duration::from_secs(20));
        assert_eq!(config.precision, Precision::DEFAULT);
        assert_eq!(config.status_addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(config.tracked_lines, vec![LineName::parse("UP-NW").unwrap()]);
        assert!(config.mock_feed_path.is_none());
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("METRA_USERNAME", "user"),
            ("METRA_PASSWORD", "secret"),
            ("MOCK_FEED_PATH", "data/positions.json"),
            ("FETCH_INTERVAL_SECS", "5"),
            ("GEOHASH_PRECISION", "7"),
            ("STATUS_ADDR", "0.0.0.0:8080"),
            ("TRACKED_LINES", "UP-NW, MD-W,"),
        ])
        .unwrap();

        assert_eq!(config.username, "user");
        assert_eq!(config.mock_feed_path, Some(PathBuf::from("data/positions.json")));
        assert_eq!(config.fetch_interval, Duration::from_secs(5));
        assert_eq!(config.precision.chars(), 7);
        assert_eq!(config.status_addr.port(), 8080);
        let names: Vec<&str> = config.tracked_lines.iter().map(|l| l.as_str()).collect();
        assert_eq!(names, vec!["UP-NW", "MD-W"]);

        assert_eq!(config.feed_config().username, "user");
        assert_eq!(config.sink_config().url, "http://localhost:8675");
    }

    #[test]
    fn empty_values_take_defaults() {
        let config = config(&[("FETCH_INTERVAL_SECS", ""), ("LED_SERVER_URL", "  ")]).unwrap();
        assert_eq!(config.fetch_interval, Duration::from_secs(20));
        assert_eq!(config.led_server_url, "http://localhost:8675");
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            config(&[("FETCH_INTERVAL_SECS", "soon")]),
            Err(ConfigError::Invalid { var: "FETCH_INTERVAL_SECS", .. })
        ));
        assert!(matches!(
            config(&[("FETCH_INTERVAL_SECS", "0")]),
            Err(ConfigError::Invalid { var: "FETCH_INTERVAL_SECS", .. })
        ));
        assert!(matches!(
            config(&[("GEOHASH_PRECISION", "13")]),
            Err(ConfigError::Invalid { var: "GEOHASH_PRECISION", .. })
        ));
        assert!(matches!(
            config(&[("STATUS_ADDR", "localhost")]),
            Err(ConfigError::Invalid { var: "STATUS_ADDR", .. })
        ));
        assert!(matches!(
            config(&[("TRACKED_LINES", "UP NW")]),
            Err(ConfigError::Invalid { var: "TRACKED_LINES", .. })
        ));
        assert!(matches!(
            config(&[("TRACKED_LINES", ",,")]),
            Err(ConfigError::NoTrackedLines)
        ));
    }
}

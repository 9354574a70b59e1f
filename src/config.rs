use anyhow::Context;
use chrono::Duration as ChronoDuration;
use chrono_tz::Tz;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::themes::Theme;

const DEFAULT_SECRETS_DIR: &str = "/etc/secrets";
const OPENWEATHER_KEY_SECRET: &str = "openweather-api-key";

/// A credential that never shows up in `Debug` output or logs.
#[derive(Clone)]
pub struct Secret(String);

impl Secret {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_addr: String,
    pub static_dir: PathBuf,
    pub openweather_api_key: Secret,
    pub openweather_base_url: String,
    pub openweather_onecall_path: String,
    pub latitude: f64,
    pub longitude: f64,
    pub units: String,
    pub noaa_base_url: String,
    pub noaa_datagetter_path: String,
    pub tide_station: String,
    pub spacedevs_base_url: String,
    pub spacedevs_upcoming_path: String,
    pub launch_location_id: Option<String>,
    pub display_timezone: Tz,
    pub cache_expiration: Duration,
    pub cache_cleanup_interval: Duration,
    pub upstream_timeout: Duration,
    pub forecast_offsets: Vec<ChronoDuration>,
    pub theme: Theme,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let openweather_api_key = match lookup("OPENWEATHER_API_KEY").filter(|k| !k.trim().is_empty()) {
            Some(key) => Secret(key.trim().to_string()),
            None => {
                let secrets_dir = var("SECRETS_DIR", DEFAULT_SECRETS_DIR);
                read_secret(Path::new(&secrets_dir), OPENWEATHER_KEY_SECRET)
                    .context("OPENWEATHER_API_KEY not set and no secret file found")?
            }
        };

        let display_timezone = var("DISPLAY_TIMEZONE", "America/New_York");
        let display_timezone = display_timezone
            .parse::<Tz>()
            .map_err(|_| anyhow::anyhow!("Invalid DISPLAY_TIMEZONE: {}", display_timezone))?;

        let theme = var("WEATHER_THEME", "none")
            .parse::<Theme>()
            .map_err(|e| anyhow::anyhow!("Invalid WEATHER_THEME: {}", e))?;

        let log_format = match var("LOG_FORMAT", "pretty").to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Config {
            bind_addr: var("BIND_ADDR", "0.0.0.0:8080"),
            static_dir: PathBuf::from(var("STATIC_DIR", ".")),
            openweather_api_key,
            openweather_base_url: var("OPENWEATHER_BASE_URL", "https://api.openweathermap.org"),
            openweather_onecall_path: var("OPENWEATHER_ONECALL_PATH", "/data/3.0/onecall"),
            latitude: parse_coordinate(lookup("LATITUDE"), 29.65, 90.0, "LATITUDE")?,
            longitude: parse_coordinate(lookup("LONGITUDE"), -81.20, 180.0, "LONGITUDE")?,
            units: var("UNITS", "imperial"),
            noaa_base_url: var("NOAA_BASE_URL", "https://api.tidesandcurrents.noaa.gov"),
            noaa_datagetter_path: var("NOAA_DATAGETTER_PATH", "/api/prod/datagetter"),
            tide_station: var("TIDE_STATION", "8720218"),
            spacedevs_base_url: var("SPACEDEVS_BASE_URL", "https://ll.thespacedevs.com"),
            spacedevs_upcoming_path: var("SPACEDEVS_UPCOMING_PATH", "/2.3.0/launches/upcoming/"),
            launch_location_id: Some(var("LAUNCH_LOCATION_ID", "27"))
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
            display_timezone,
            cache_expiration: seconds_or_default(lookup("CACHE_EXPIRATION"), 1800),
            cache_cleanup_interval: seconds_or_default(lookup("CACHE_CLEANUP_INTERVAL"), 3600),
            upstream_timeout: seconds_or_default(lookup("UPSTREAM_TIMEOUT_SECS"), 10),
            forecast_offsets: parse_offsets(lookup("FORECAST_OFFSETS_HOURS"))?,
            theme,
            log_format,
        })
    }
}

/// Reads a mounted secret file, trimming the trailing newline most tooling adds.
pub fn read_secret(dir: &Path, name: &str) -> anyhow::Result<Secret> {
    let path = dir.join(name);
    let value = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read secret file {}", path.display()))?;
    let value = value.trim();
    if value.is_empty() {
        anyhow::bail!("secret file {} is empty", path.display());
    }
    Ok(Secret(value.to_string()))
}

/// Whole seconds; unparseable or zero values mean "use the default".
fn seconds_or_default(value: Option<String>, default_secs: u64) -> Duration {
    let secs = value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|&secs| secs > 0)
        .unwrap_or(default_secs);
    Duration::from_secs(secs)
}

fn parse_coordinate(value: Option<String>, default: f64, limit: f64, name: &str) -> anyhow::Result<f64> {
    let Some(value) = value else {
        return Ok(default);
    };
    let parsed: f64 = value
        .trim()
        .parse()
        .with_context(|| format!("Invalid {}: {}", name, value))?;
    if !(-limit..=limit).contains(&parsed) {
        anyhow::bail!("{} out of range: {}", name, parsed);
    }
    Ok(parsed)
}

/// Comma-separated forward offsets in hours, e.g. `2,4,6,8`.
fn parse_offsets(value: Option<String>) -> anyhow::Result<Vec<ChronoDuration>> {
    let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
        return Ok(crate::forecast::sampler::default_offsets());
    };

    value
        .split(',')
        .map(|part| -> anyhow::Result<ChronoDuration> {
            let hours: i64 = part
                .trim()
                .parse()
                .with_context(|| format!("Invalid FORECAST_OFFSETS_HOURS entry: {:?}", part))?;
            if !(0..=168).contains(&hours) {
                anyhow::bail!("FORECAST_OFFSETS_HOURS entry out of range (0-168): {}", hours);
            }
            Ok(ChronoDuration::hours(hours))
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Configuration with an inline API key plus the given overrides.
    pub(crate) fn test_config(overrides: &[(&str, &str)]) -> Config {
        let mut vars: HashMap<String, String> = HashMap::new();
        vars.insert("OPENWEATHER_API_KEY".to_string(), "test-key".to_string());
        for (key, value) in overrides {
            vars.insert(key.to_string(), value.to_string());
        }
        Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
    }

    fn temp_secrets_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("kindle-weather-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_defaults() {
        let config = test_config(&[]);

        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.latitude, 29.65);
        assert_eq!(config.longitude, -81.2);
        assert_eq!(config.units, "imperial");
        assert_eq!(config.tide_station, "8720218");
        assert_eq!(config.launch_location_id.as_deref(), Some("27"));
        assert_eq!(config.display_timezone, chrono_tz::America::New_York);
        assert_eq!(config.cache_expiration, Duration::from_secs(1800));
        assert_eq!(config.cache_cleanup_interval, Duration::from_secs(3600));
        assert_eq!(config.upstream_timeout, Duration::from_secs(10));
        assert_eq!(
            config.forecast_offsets,
            vec![
                ChronoDuration::hours(2),
                ChronoDuration::hours(4),
                ChronoDuration::hours(6),
                ChronoDuration::hours(8)
            ]
        );
        assert_eq!(config.theme, Theme::Plain);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.openweather_api_key.expose(), "test-key");
    }

    #[test]
    fn test_cache_durations_fall_back_on_zero_or_garbage() {
        let config = test_config(&[("CACHE_EXPIRATION", "0"), ("CACHE_CLEANUP_INTERVAL", "soon")]);
        assert_eq!(config.cache_expiration, Duration::from_secs(1800));
        assert_eq!(config.cache_cleanup_interval, Duration::from_secs(3600));

        let config = test_config(&[("CACHE_EXPIRATION", "60"), ("CACHE_CLEANUP_INTERVAL", "120")]);
        assert_eq!(config.cache_expiration, Duration::from_secs(60));
        assert_eq!(config.cache_cleanup_interval, Duration::from_secs(120));
    }

    #[test]
    fn test_forecast_offsets() {
        let config = test_config(&[("FORECAST_OFFSETS_HOURS", "1, 3,12")]);
        assert_eq!(
            config.forecast_offsets,
            vec![ChronoDuration::hours(1), ChronoDuration::hours(3), ChronoDuration::hours(12)]
        );

        let lookup = |key: &str| match key {
            "OPENWEATHER_API_KEY" => Some("k".to_string()),
            "FORECAST_OFFSETS_HOURS" => Some("2,later".to_string()),
            _ => None,
        };
        assert!(Config::from_lookup(lookup).is_err());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        for (key, value) in [
            ("LATITUDE", "91"),
            ("LONGITUDE", "east"),
            ("DISPLAY_TIMEZONE", "Mars/Olympus"),
            ("WEATHER_THEME", "easter"),
        ] {
            let lookup = |k: &str| match k {
                "OPENWEATHER_API_KEY" => Some("k".to_string()),
                k if k == key => Some(value.to_string()),
                _ => None,
            };
            assert!(Config::from_lookup(lookup).is_err(), "{key}={value} should be rejected");
        }
    }

    #[test]
    fn test_empty_launch_location_disables_launches() {
        let config = test_config(&[("LAUNCH_LOCATION_ID", " ")]);
        assert!(config.launch_location_id.is_none());
    }

    #[test]
    fn test_api_key_from_secret_file() {
        let dir = temp_secrets_dir("secret");
        std::fs::write(dir.join(OPENWEATHER_KEY_SECRET), "file-key\n").unwrap();

        let dir_str = dir.to_string_lossy().to_string();
        let lookup = |key: &str| match key {
            "SECRETS_DIR" => Some(dir_str.clone()),
            _ => None,
        };
        let config = Config::from_lookup(lookup).unwrap();
        assert_eq!(config.openweather_api_key.expose(), "file-key");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_secret_is_an_error() {
        let dir = temp_secrets_dir("missing");
        let dir_str = dir.to_string_lossy().to_string();
        let lookup = |key: &str| match key {
            "SECRETS_DIR" => Some(dir_str.clone()),
            _ => None,
        };
        assert!(Config::from_lookup(lookup).is_err());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = test_config(&[]);
        let debug = format!("{:?}", config);
        assert!(!debug.contains("test-key"));
    }
}

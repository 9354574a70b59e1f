use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// Raw OpenWeather One Call 3.0 payload. Optional upstream fields default so a
// sparse response still decodes.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneCallResponse {
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
    pub timezone: String,
    #[serde(default)]
    pub timezone_offset: i32,
    pub current: OneCallCurrent,
    #[serde(default)]
    pub hourly: Vec<OneCallHourly>,
    #[serde(default)]
    pub daily: Vec<OneCallDaily>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneCallCurrent {
    pub dt: i64,
    #[serde(default)]
    pub sunrise: i64,
    #[serde(default)]
    pub sunset: i64,
    pub temp: f64,
    #[serde(default)]
    pub feels_like: f64,
    #[serde(default)]
    pub pressure: f64,
    #[serde(default)]
    pub humidity: f64,
    #[serde(default)]
    pub dew_point: f64,
    #[serde(default)]
    pub uvi: f64,
    #[serde(default)]
    pub clouds: f64,
    #[serde(default)]
    pub visibility: Option<i64>,
    #[serde(default)]
    pub wind_speed: f64,
    #[serde(default)]
    pub wind_deg: f64,
    #[serde(default)]
    pub wind_gust: Option<f64>,
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneCallHourly {
    pub dt: i64,
    pub temp: f64,
    #[serde(default)]
    pub feels_like: f64,
    #[serde(default)]
    pub pressure: f64,
    #[serde(default)]
    pub humidity: f64,
    #[serde(default)]
    pub dew_point: f64,
    #[serde(default)]
    pub uvi: f64,
    #[serde(default)]
    pub clouds: f64,
    #[serde(default)]
    pub visibility: Option<i64>,
    #[serde(default)]
    pub wind_speed: f64,
    #[serde(default)]
    pub wind_gust: Option<f64>,
    #[serde(default)]
    pub wind_deg: f64,
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
    #[serde(default)]
    pub pop: f64,
    pub rain: Option<HashMap<String, f64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneCallDaily {
    pub dt: i64,
    #[serde(default)]
    pub moonrise: i64,
    #[serde(default)]
    pub moonset: i64,
    #[serde(default)]
    pub moon_phase: f64,
    #[serde(default)]
    pub summary: String,
    pub temp: Option<OneCallDailyTemp>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneCallDailyTemp {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherCondition {
    pub id: i32,
    #[serde(default)]
    pub main: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

// Display-ready weather, produced by `normalize`.

#[derive(Debug, Clone)]
pub struct WeatherReport {
    pub timezone: String,
    pub current: CurrentConditions,
    pub hourly: Vec<HourlySample>,
    pub daily: Vec<DailySummary>,
    pub fetched_at: DateTime<Utc>,
}

impl WeatherReport {
    pub fn today(&self) -> Option<&DailySummary> {
        self.daily.first()
    }
}

#[derive(Debug, Clone)]
pub struct CurrentConditions {
    pub temp: i64,
    pub feels_like: i64,
    pub dew_point: i64,
    pub wind_speed: i64,
    pub wind_gust: i64,
    pub wind_deg: i64,
    pub humidity: i64,
    pub pressure: i64,
    pub uvi: f64,
    pub clouds: f64,
    pub visibility: Option<i64>,
    pub condition: Option<WeatherCondition>,
    pub sunrise_label: String,
    pub sunset_label: String,
}

#[derive(Debug, Clone)]
pub struct HourlySample {
    pub dt: i64,
    pub time_label: String,
    pub temp: i64,
    pub feels_like: i64,
    pub humidity: i64,
    pub wind_speed: i64,
    pub wind_gust: i64,
    pub wind_deg: i64,
    /// Probability of precipitation, percent.
    pub pop: i64,
    pub rain_1h: i64,
    pub condition: Option<WeatherCondition>,
}

#[derive(Debug, Clone)]
pub struct DailySummary {
    pub summary: String,
    pub moon_phase: f64,
    /// `None` when the moon does not rise (or set) that day.
    pub moonrise_label: Option<String>,
    pub moonset_label: Option<String>,
    pub temp_min: Option<i64>,
    pub temp_max: Option<i64>,
}

// NOAA CO-OPS datagetter payload.

#[derive(Debug, Clone, Deserialize)]
pub struct NoaaTideResponse {
    #[serde(default)]
    pub predictions: Vec<NoaaPrediction>,
    pub error: Option<NoaaError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NoaaPrediction {
    pub t: String,
    #[serde(default)]
    pub v: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NoaaError {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TideKind {
    High,
    Low,
    Other(String),
}

impl TideKind {
    pub fn from_code(code: &str) -> Self {
        match code {
            "H" | "HH" => TideKind::High,
            "L" | "LL" => TideKind::Low,
            other => TideKind::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            TideKind::High => "High",
            TideKind::Low => "Low",
            TideKind::Other(code) => code,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TidePrediction {
    pub time_label: String,
    pub kind: TideKind,
    /// Predicted water level in feet above MLLW.
    pub level: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct TideReport {
    pub predictions: Vec<TidePrediction>,
}

// Launch Library 2 payload.

#[derive(Debug, Clone, Deserialize)]
pub struct LaunchListResponse {
    #[serde(default)]
    pub results: Vec<RawLaunch>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLaunch {
    pub name: String,
    #[serde(default)]
    pub window_start: Option<String>,
    #[serde(default)]
    pub window_end: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Launch {
    pub name: String,
    pub window_start_label: Option<String>,
    pub window_end_label: Option<String>,
}

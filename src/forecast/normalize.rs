use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;

use super::types::*;

/// Clock-face format used across the page, e.g. `3:04 PM`.
pub const TIME_LABEL_FORMAT: &str = "%-I:%M %p";

/// Rounds half away from zero. Every displayed measurement goes through here.
pub fn round_measurement(value: f64) -> i64 {
    value.round() as i64
}

/// Probability of precipitation as a whole percentage.
pub fn pop_percent(pop: f64) -> i64 {
    round_measurement(pop * 100.0)
}

/// Zone used to render epoch timestamps as wall-clock labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocalZone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl LocalZone {
    /// Resolves the zone a weather payload reports about itself.
    ///
    /// The IANA name wins when it parses; otherwise the fixed UTC offset is
    /// used, and an out-of-range offset degrades to UTC.
    pub fn resolve(name: &str, offset_seconds: i32) -> Self {
        if let Ok(tz) = name.parse::<Tz>() {
            return LocalZone::Named(tz);
        }

        match FixedOffset::east_opt(offset_seconds) {
            Some(offset) => {
                tracing::debug!(timezone = name, offset_seconds, "Unknown timezone name, using fixed offset");
                LocalZone::Fixed(offset)
            }
            None => {
                tracing::warn!(timezone = name, offset_seconds, "Unusable timezone and offset, falling back to UTC");
                LocalZone::Named(Tz::UTC)
            }
        }
    }

    pub fn format(&self, epoch_seconds: i64, fmt: &str) -> Option<String> {
        let utc = DateTime::<Utc>::from_timestamp(epoch_seconds, 0)?;
        let label = match self {
            LocalZone::Named(tz) => utc.with_timezone(tz).format(fmt).to_string(),
            LocalZone::Fixed(offset) => utc.with_timezone(offset).format(fmt).to_string(),
        };
        Some(label)
    }

    pub fn time_label(&self, epoch_seconds: i64) -> String {
        self.format(epoch_seconds, TIME_LABEL_FORMAT).unwrap_or_default()
    }
}

/// Turns a raw One Call payload into display-ready values.
pub fn normalize(raw: OneCallResponse) -> WeatherReport {
    let zone = LocalZone::resolve(&raw.timezone, raw.timezone_offset);

    let current = normalize_current(raw.current, &zone);
    let hourly = raw
        .hourly
        .into_iter()
        .map(|hour| normalize_hourly(hour, &zone))
        .collect();
    let daily = raw
        .daily
        .into_iter()
        .map(|day| normalize_daily(day, &zone))
        .collect();

    WeatherReport {
        timezone: raw.timezone,
        current,
        hourly,
        daily,
        fetched_at: Utc::now(),
    }
}

fn normalize_current(current: OneCallCurrent, zone: &LocalZone) -> CurrentConditions {
    CurrentConditions {
        temp: round_measurement(current.temp),
        feels_like: round_measurement(current.feels_like),
        dew_point: round_measurement(current.dew_point),
        wind_speed: round_measurement(current.wind_speed),
        wind_gust: round_measurement(current.wind_gust.unwrap_or(0.0)),
        wind_deg: round_measurement(current.wind_deg),
        humidity: round_measurement(current.humidity),
        pressure: round_measurement(current.pressure),
        uvi: current.uvi,
        clouds: current.clouds,
        visibility: current.visibility,
        condition: current.weather.into_iter().next(),
        sunrise_label: zone.time_label(current.sunrise),
        sunset_label: zone.time_label(current.sunset),
    }
}

fn normalize_hourly(hour: OneCallHourly, zone: &LocalZone) -> HourlySample {
    let rain_1h = hour
        .rain
        .as_ref()
        .and_then(|rain| rain.get("1h"))
        .copied()
        .unwrap_or(0.0);

    HourlySample {
        dt: hour.dt,
        time_label: zone.time_label(hour.dt),
        temp: round_measurement(hour.temp),
        feels_like: round_measurement(hour.feels_like),
        humidity: round_measurement(hour.humidity),
        wind_speed: round_measurement(hour.wind_speed),
        wind_gust: round_measurement(hour.wind_gust.unwrap_or(0.0)),
        wind_deg: round_measurement(hour.wind_deg),
        pop: pop_percent(hour.pop),
        rain_1h: round_measurement(rain_1h),
        condition: hour.weather.into_iter().next(),
    }
}

fn normalize_daily(day: OneCallDaily, zone: &LocalZone) -> DailySummary {
    DailySummary {
        summary: day.summary,
        moon_phase: day.moon_phase,
        moonrise_label: (day.moonrise > 0).then(|| zone.time_label(day.moonrise)),
        moonset_label: (day.moonset > 0).then(|| zone.time_label(day.moonset)),
        temp_min: day.temp.as_ref().map(|t| round_measurement(t.min)),
        temp_max: day.temp.as_ref().map(|t| round_measurement(t.max)),
    }
}

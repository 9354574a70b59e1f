use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use reqwest::Client;

use super::types::*;
use super::upstream::{build_http_client, get_json, UpstreamError};
use crate::config::Config;

/// Launch windows are shown as e.g. `3:04pm`.
const LAUNCH_TIME_FORMAT: &str = "%-I:%M%P";

pub struct LaunchClient {
    client: Client,
    url: String,
    location_id: String,
    display_zone: Tz,
}

impl LaunchClient {
    /// Returns `None` when launch lookups are switched off.
    pub fn new(config: &Config) -> reqwest::Result<Option<Self>> {
        let Some(location_id) = config.launch_location_id.clone() else {
            return Ok(None);
        };

        Ok(Some(Self {
            client: build_http_client(config.upstream_timeout)?,
            url: format!("{}{}", config.spacedevs_base_url, config.spacedevs_upcoming_path),
            location_id,
            display_zone: config.display_timezone,
        }))
    }

    /// Launches from the configured pad whose NET falls on the current UTC day.
    pub async fn get_todays_launches(&self, now: DateTime<Utc>) -> Result<Vec<Launch>, UpstreamError> {
        let (start, end) = utc_day_bounds(now);
        let start = start.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        let end = end.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);

        tracing::debug!(location = %self.location_id, %start, %end, "Fetching upcoming launches");

        let raw: LaunchListResponse = get_json(
            &self.client,
            &self.url,
            &[
                ("location__ids", &self.location_id),
                ("format", "json"),
                ("net__gte", &start),
                ("net__lt", &end),
            ],
            "GET launch data",
        )
        .await?;

        Ok(raw
            .results
            .into_iter()
            .map(|launch| to_display_launch(launch, self.display_zone))
            .collect())
    }
}

fn utc_day_bounds(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.and_utc())
        .unwrap_or(now);
    (start, start + Duration::days(1) - Duration::seconds(1))
}

fn to_display_launch(raw: RawLaunch, zone: Tz) -> Launch {
    let convert = |value: Option<String>| -> Option<String> {
        let value = value.filter(|v| !v.is_empty())?;
        match DateTime::parse_from_rfc3339(&value) {
            Ok(instant) => Some(instant.with_timezone(&zone).format(LAUNCH_TIME_FORMAT).to_string()),
            Err(e) => {
                tracing::warn!(launch = %raw.name, value = %value, error = %e, "Failed to convert launch window time");
                Some(value)
            }
        }
    };

    Launch {
        window_start_label: convert(raw.window_start.clone()),
        window_end_label: convert(raw.window_end.clone()),
        name: raw.name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::test_config;
    use chrono::TimeZone;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn raw_launch(start: &str, end: &str) -> RawLaunch {
        RawLaunch {
            name: "Falcon 9 Block 5 | Starlink Group 6-40".to_string(),
            window_start: Some(start.to_string()),
            window_end: Some(end.to_string()),
        }
    }

    #[test]
    fn test_window_times_in_display_zone() {
        let launch = to_display_launch(
            raw_launch("2024-03-01T20:30:00Z", "2024-03-02T00:30:00Z"),
            chrono_tz::America::New_York,
        );
        assert_eq!(launch.window_start_label.as_deref(), Some("3:30pm"));
        assert_eq!(launch.window_end_label.as_deref(), Some("7:30pm"));
    }

    #[test]
    fn test_unparseable_window_is_kept_verbatim() {
        let launch = to_display_launch(raw_launch("TBD", ""), chrono_tz::America::New_York);
        assert_eq!(launch.window_start_label.as_deref(), Some("TBD"));
        assert_eq!(launch.window_end_label, None);
    }

    #[test]
    fn test_utc_day_bounds() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 17, 45, 12).unwrap();
        let (start, end) = utc_day_bounds(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 3, 1, 23, 59, 59).unwrap());
    }

    #[test]
    fn test_disabled_without_location() {
        let config = test_config(&[("LAUNCH_LOCATION_ID", "")]);
        assert!(LaunchClient::new(&config).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_todays_launches() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2.3.0/launches/upcoming/"))
            .and(query_param("location__ids", "27"))
            .and(query_param("net__gte", "2024-03-01T00:00:00Z"))
            .and(query_param("net__lt", "2024-03-01T23:59:59Z"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "count": 1,
                "results": [{
                    "name": "Falcon 9 Block 5 | Starlink Group 6-40",
                    "window_start": "2024-03-01T20:30:00Z",
                    "window_end": "2024-03-02T00:30:00Z"
                }]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let config = test_config(&[("SPACEDEVS_BASE_URL", &mock_server.uri())]);
        let client = LaunchClient::new(&config).unwrap().unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let launches = client.get_todays_launches(now).await.unwrap();

        assert_eq!(launches.len(), 1);
        assert_eq!(launches[0].window_start_label.as_deref(), Some("3:30pm"));
    }
}

use chrono::NaiveDateTime;
use reqwest::Client;

use super::normalize::TIME_LABEL_FORMAT;
use super::types::*;
use super::upstream::{build_http_client, get_json, UpstreamError};
use crate::config::Config;

/// Timestamp layout NOAA uses for `t`, already in station local time.
const NOAA_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub struct NoaaTideClient {
    client: Client,
    url: String,
    station: String,
}

impl NoaaTideClient {
    pub fn new(config: &Config) -> reqwest::Result<Self> {
        Ok(Self {
            client: build_http_client(config.upstream_timeout)?,
            url: format!("{}{}", config.noaa_base_url, config.noaa_datagetter_path),
            station: config.tide_station.clone(),
        })
    }

    /// Today's high/low tide predictions for the configured station.
    pub async fn get_tides(&self) -> Result<TideReport, UpstreamError> {
        tracing::debug!(station = %self.station, "Fetching tide predictions from NOAA");

        let raw: NoaaTideResponse = get_json(
            &self.client,
            &self.url,
            &[
                ("product", "predictions"),
                ("application", "NOS.COOPS.TAC.WL"),
                ("datum", "MLLW"),
                ("station", &self.station),
                ("time_zone", "lst_ldt"),
                ("units", "english"),
                ("interval", "hilo"),
                ("format", "json"),
                ("date", "today"),
            ],
            "GET tide data",
        )
        .await?;

        process_tide_data(raw)
    }
}

pub fn process_tide_data(raw: NoaaTideResponse) -> Result<TideReport, UpstreamError> {
    if let Some(error) = raw.error {
        return Err(UpstreamError::ApiError {
            operation: "GET tide data",
            message: error.message,
        });
    }

    let predictions = raw
        .predictions
        .into_iter()
        .map(|p| -> Result<TidePrediction, UpstreamError> {
            let time = NaiveDateTime::parse_from_str(&p.t, NOAA_TIME_FORMAT).map_err(|e| {
                UpstreamError::Parse {
                    operation: "parse tide time",
                    detail: format!("{:?}: {}", p.t, e),
                }
            })?;

            Ok(TidePrediction {
                time_label: time.format(TIME_LABEL_FORMAT).to_string(),
                kind: TideKind::from_code(&p.kind),
                level: p.v.as_deref().and_then(|v| v.trim().parse().ok()),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TideReport { predictions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::test_config;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn raw(value: serde_json::Value) -> NoaaTideResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_process_tide_data() {
        let report = process_tide_data(raw(serde_json::json!({
            "predictions": [
                {"t": "2024-03-01 04:12", "v": "0.183", "type": "L"},
                {"t": "2024-03-01 10:27", "v": "4.912", "type": "H"},
                {"t": "2024-03-01 16:45", "v": "0.402", "type": "L"},
                {"t": "2024-03-01 22:58", "v": "", "type": "H"}
            ]
        })))
        .unwrap();

        let labels: Vec<(&str, &str)> = report
            .predictions
            .iter()
            .map(|p| (p.kind.label(), p.time_label.as_str()))
            .collect();
        assert_eq!(
            labels,
            vec![("Low", "4:12 AM"), ("High", "10:27 AM"), ("Low", "4:45 PM"), ("High", "10:58 PM")]
        );
        assert_eq!(report.predictions[1].level, Some(4.912));
        assert_eq!(report.predictions[3].level, None);
    }

    #[test]
    fn test_unknown_tide_code_passes_through() {
        assert_eq!(TideKind::from_code("X"), TideKind::Other("X".to_string()));
        assert_eq!(TideKind::from_code("X").label(), "X");
    }

    #[test]
    fn test_bad_tide_time_is_an_error() {
        let err = process_tide_data(raw(serde_json::json!({
            "predictions": [{"t": "yesterday-ish", "type": "H"}]
        })))
        .unwrap_err();
        assert!(matches!(err, UpstreamError::Parse { .. }));
    }

    #[test]
    fn test_noaa_error_body() {
        let err = process_tide_data(raw(serde_json::json!({
            "error": {"message": "No Predictions data was found."}
        })))
        .unwrap_err();
        assert!(err.to_string().contains("No Predictions data was found."));
    }

    #[tokio::test]
    async fn test_get_tides() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/prod/datagetter"))
            .and(query_param("station", "8720218"))
            .and(query_param("interval", "hilo"))
            .and(query_param("date", "today"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "predictions": [{"t": "2024-03-01 10:27", "v": "4.912", "type": "H"}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let config = test_config(&[("NOAA_BASE_URL", &mock_server.uri())]);
        let client = NoaaTideClient::new(&config).unwrap();
        let report = client.get_tides().await.unwrap();

        assert_eq!(report.predictions.len(), 1);
        assert_eq!(report.predictions[0].kind, TideKind::High);
    }
}

use super::types::OneCallResponse;
use super::upstream::{build_http_client, get_json, UpstreamError};
use crate::config::Config;
use reqwest::Client;

pub struct OpenWeatherClient {
    client: Client,
    url: String,
    api_key: String,
    lat: String,
    lon: String,
    units: String,
}

impl OpenWeatherClient {
    pub fn new(config: &Config) -> reqwest::Result<Self> {
        Ok(Self {
            client: build_http_client(config.upstream_timeout)?,
            url: format!(
                "{}{}",
                config.openweather_base_url, config.openweather_onecall_path
            ),
            api_key: config.openweather_api_key.expose().to_string(),
            lat: config.latitude.to_string(),
            lon: config.longitude.to_string(),
            units: config.units.clone(),
        })
    }

    /// Current, hourly and daily weather for the configured location.
    pub async fn get_onecall(&self) -> Result<OneCallResponse, UpstreamError> {
        tracing::debug!(url = %self.url, "Fetching weather from OpenWeather");

        get_json(
            &self.client,
            &self.url,
            &[
                ("lat", &self.lat),
                ("lon", &self.lon),
                ("exclude", "minutely"),
                ("appid", &self.api_key),
                ("units", &self.units),
            ],
            "GET weather data",
        )
        .await
    }
}

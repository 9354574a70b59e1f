use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("{operation} failed (url: {url}): {source}")]
    RequestFailed {
        operation: &'static str,
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{operation} failed (url: {url}): HTTP {status}")]
    Status {
        operation: &'static str,
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("{operation} returned malformed JSON (url: {url}): {source}")]
    JsonParsing {
        operation: &'static str,
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{operation} reported an error: {message}")]
    ApiError {
        operation: &'static str,
        message: String,
    },
    #[error("{operation} returned an unreadable value: {detail}")]
    Parse {
        operation: &'static str,
        detail: String,
    },
}

pub fn build_http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(concat!("KindleWeather/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
}

/// Issues a GET and decodes a 2xx JSON body into `T`.
///
/// Errors carry the URL without its query string, which may hold an API key.
pub async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    params: &[(&str, &str)],
    operation: &'static str,
) -> Result<T, UpstreamError> {
    let request_failed = |source: reqwest::Error| UpstreamError::RequestFailed {
        operation,
        url: url.to_string(),
        source: source.without_url(),
    };

    let response = client
        .get(url)
        .query(params)
        .send()
        .await
        .map_err(request_failed)?;

    let status = response.status();
    if !status.is_success() {
        return Err(UpstreamError::Status {
            operation,
            url: url.to_string(),
            status,
        });
    }

    let body = response.bytes().await.map_err(request_failed)?;
    serde_json::from_slice(&body).map_err(|source| UpstreamError::JsonParsing {
        operation,
        url: url.to_string(),
        source,
    })
}

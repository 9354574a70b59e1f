use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tower_http::{services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer};

use crate::{
    config::Config,
    forecast::{
        init_cache,
        launches::LaunchClient,
        noaa::NoaaTideClient,
        normalize::normalize,
        openweather::OpenWeatherClient,
        sampler::nearest_samples,
        types::{Launch, WeatherReport},
        upstream::UpstreamError,
        WeatherCache, WEATHER_CACHE_KEY,
    },
    render::{icons::moon_phase_icon, render_page, PageContext},
};

/// Slack on top of the upstream budget so handler errors beat the route timeout.
const REQUEST_TIMEOUT_GRACE: Duration = Duration::from_secs(5);
/// Launches are decoration; the page never waits longer than this for them.
const LAUNCH_LOOKUP_TIMEOUT: Duration = Duration::from_secs(3);

// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub weather_cache: Arc<WeatherCache>,
    pub weather_client: Arc<OpenWeatherClient>,
    pub tide_client: Arc<NoaaTideClient>,
    pub launch_client: Option<Arc<LaunchClient>>,
    weather_refresh: Arc<Mutex<()>>,
}

impl AppState {
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let weather_client = Arc::new(OpenWeatherClient::new(&config)?);
        let tide_client = Arc::new(NoaaTideClient::new(&config)?);
        let launch_client = LaunchClient::new(&config)?.map(Arc::new);
        let weather_cache = Arc::new(init_cache(&config));

        Ok(Self {
            config: Arc::new(config),
            weather_cache,
            weather_client,
            tide_client,
            launch_client,
            weather_refresh: Arc::new(Mutex::new(())),
        })
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("weather data unavailable: {0}")]
    Weather(#[source] UpstreamError),
    #[error("tide data unavailable: {0}")]
    Tide(#[source] UpstreamError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Failed to build page");

        let message = match self {
            AppError::Weather(_) => "Could not get weather data",
            AppError::Tide(_) => "Could not get tide data",
        };
        (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
    pub weather_cached: bool,
}

// Route handlers
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        weather_cached: state.weather_cache.get(WEATHER_CACHE_KEY).is_some(),
    })
}

/// Serves the cached report, fetching and normalizing a fresh one on a miss.
///
/// Concurrent misses share one upstream call: the first request refreshes
/// while the rest wait on `weather_refresh` and then read the cache. A waiter
/// that is still blocked after one upstream timeout fetches on its own.
pub async fn load_weather(state: &AppState) -> Result<Arc<WeatherReport>, UpstreamError> {
    if let Some(report) = cached_weather(state) {
        return Ok(report);
    }

    let upstream_timeout = state.config.upstream_timeout;
    let _guard = match tokio::time::timeout(upstream_timeout, state.weather_refresh.lock()).await {
        Ok(guard) => {
            if let Some(report) = cached_weather(state) {
                return Ok(report);
            }
            Some(guard)
        }
        Err(_) => {
            tracing::debug!("Weather refresh still in flight, fetching directly");
            None
        }
    };

    let onecall = state.weather_client.get_onecall().await?;
    let report = Arc::new(normalize(onecall));
    state.weather_cache.set(WEATHER_CACHE_KEY, report.clone());
    tracing::info!(
        timezone = %report.timezone,
        ttl_secs = state.weather_cache.default_ttl().as_secs(),
        hours = report.hourly.len(),
        "Cached fresh weather report"
    );

    Ok(report)
}

fn cached_weather(state: &AppState) -> Option<Arc<WeatherReport>> {
    let report = state.weather_cache.get(WEATHER_CACHE_KEY)?;
    tracing::debug!(fetched_at = %report.fetched_at, "Weather cache hit");
    Some(report)
}

async fn load_launch(state: &AppState, now: chrono::DateTime<Utc>) -> Option<Launch> {
    let client = state.launch_client.as_ref()?;
    let budget = LAUNCH_LOOKUP_TIMEOUT.min(state.config.upstream_timeout);

    match tokio::time::timeout(budget, client.get_todays_launches(now)).await {
        Ok(Ok(launches)) => launches.into_iter().next(),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Launch lookup failed, rendering without it");
            None
        }
        Err(_) => {
            tracing::warn!(budget_ms = budget.as_millis() as u64, "Launch lookup timed out, rendering without it");
            None
        }
    }
}

/// Upper bound for a page request.
///
/// Weather can take one wait on another request's refresh plus its own
/// fetch; tides and launches then run side by side. Each leg is capped by
/// the upstream timeout.
pub fn request_timeout(upstream_timeout: Duration) -> Duration {
    upstream_timeout
        .saturating_mul(3)
        .saturating_add(REQUEST_TIMEOUT_GRACE)
}

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let now = Utc::now();

    let weather = load_weather(&state).await.map_err(AppError::Weather)?;
    let (tides, launch) = tokio::join!(state.tide_client.get_tides(), load_launch(&state, now));
    let tides = tides.map_err(AppError::Tide)?;

    let forecast = nearest_samples(&weather.hourly, now, &state.config.forecast_offsets);
    let today = weather.today();
    let moon_icon = moon_phase_icon(today.map_or(0.0, |day| day.moon_phase));

    let theme = state
        .config
        .theme
        .for_date(&now.with_timezone(&state.config.display_timezone));
    let summary = theme.apply(
        today.map_or("", |day| day.summary.as_str()),
        &mut rand::thread_rng(),
    );

    Ok(Html(render_page(&PageContext {
        weather: &weather,
        tides: &tides,
        forecast: &forecast,
        moon_phase_icon: moon_icon,
        summary: &summary,
        launch: launch.as_ref(),
    })))
}

// Create the router
pub fn create_router(state: AppState) -> Router {
    let static_dir = &state.config.static_dir;
    let timeout = request_timeout(state.config.upstream_timeout);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .nest_service("/css", ServeDir::new(static_dir.join("css")))
        .nest_service("/font", ServeDir::new(static_dir.join("font")))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .with_state(state)
}

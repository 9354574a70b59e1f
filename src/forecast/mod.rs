pub mod launches;
pub mod noaa;
pub mod normalize;
pub mod openweather;
pub mod sampler;
pub mod types;
pub mod upstream;

use std::sync::Arc;

use crate::cache::TtlCache;
use crate::config::Config;
use types::WeatherReport;

/// The one key the weather report is cached under.
pub const WEATHER_CACHE_KEY: &str = "weather";

pub type WeatherCache = TtlCache<&'static str, Arc<WeatherReport>>;

pub fn init_cache(config: &Config) -> WeatherCache {
    TtlCache::new(config.cache_expiration)
}

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{ Duration, Instant };

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;

use super::weather_provider::{ Coordinates, CurrentConditions, WeatherProvider };
use crate::error::{ AppError, Result };

const OPENWEATHER_API_BASE: &str = "https://api.openweathermap.org";
const GEOCODE_TTL: Duration = Duration::from_secs(24 * 60 * 60);
const GEOCODE_CACHE_CAPACITY: usize = 1024;

/// OpenWeatherMap geocoding + current weather.
///
/// Geocoding results are cached for a day, up to a fixed number of places;
/// the free tier is rate limited.
pub struct OpenWeatherClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    geocode_cache: Arc<RwLock<GeocodeCache>>,
}

#[derive(Debug, Clone, Copy)]
struct CachedCoordinates {
    coords: Coordinates,
    fetched_at: Instant,
}

/// Expiring place-name lookup capped at `capacity` entries.
struct GeocodeCache {
    entries: HashMap<String, CachedCoordinates>,
    ttl: Duration,
    capacity: usize,
}

impl GeocodeCache {
    fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            capacity,
        }
    }

    fn get(&self, key: &str, now: Instant) -> Option<Coordinates> {
        self.entries
            .get(key)
            .filter(|cached| now.duration_since(cached.fetched_at) < self.ttl)
            .map(|cached| cached.coords)
    }

    /// Expired entries go first when full, then the oldest one.
    fn insert(&mut self, key: String, coords: Coordinates, now: Instant) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            let ttl = self.ttl;
            self.entries.retain(|_, cached| now.duration_since(cached.fetched_at) < ttl);

            if self.entries.len() >= self.capacity {
                let oldest = self.entries
                    .iter()
                    .min_by_key(|(_, cached)| cached.fetched_at)
                    .map(|(key, _)| key.clone());
                if let Some(oldest) = oldest {
                    self.entries.remove(&oldest);
                }
            }
        }

        self.entries.insert(key, CachedCoordinates { coords, fetched_at: now });
    }
}

#[derive(Deserialize)]
struct GeocodeEntry {
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct WeatherResponse {
    weather: Vec<WeatherGroup>,
    main: MainReadings,
    #[serde(default)]
    wind: Option<WindReadings>,
    #[serde(default)]
    rain: Option<RainReadings>,
}

#[derive(Deserialize)]
struct WeatherGroup {
    main: String,
    description: String,
}

#[derive(Deserialize)]
struct MainReadings {
    temp: f64,
    humidity: u8,
}

#[derive(Deserialize)]
struct WindReadings {
    #[serde(default)]
    speed: f64,
}

#[derive(Deserialize)]
struct RainReadings {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_base_url(api_key, OPENWEATHER_API_BASE.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self> {
        let client = reqwest::Client
            ::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build weather client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            geocode_cache: Arc::new(
                RwLock::new(GeocodeCache::new(GEOCODE_TTL, GEOCODE_CACHE_CAPACITY))
            ),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.client
            .get(url)
            .send().await
            .map_err(|e| AppError::External(format!("OpenWeatherMap request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(
                AppError::External(
                    format!("OpenWeatherMap returned status: {}", response.status())
                )
            );
        }

        response
            .json().await
            .map_err(|e| AppError::External(format!("Failed to parse OpenWeatherMap response: {}", e)))
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn geocode(&self, location: &str) -> Result<Option<Coordinates>> {
        let key = location.trim().to_lowercase();
        if let Some(coords) = self.geocode_cache.read().await.get(&key, Instant::now()) {
            return Ok(Some(coords));
        }

        let url = format!(
            "{}/geo/1.0/direct?q={}&limit=1&appid={}",
            self.base_url,
            urlencoding::encode(location.trim()),
            self.api_key
        );

        let entries: Vec<GeocodeEntry> = self.get_json(&url).await?;
        let coords = entries.first().map(|e| Coordinates { lat: e.lat, lng: e.lon });

        if let Some(coords) = coords {
            self.geocode_cache.write().await.insert(key, coords, Instant::now());
        } else {
            tracing::debug!("No geocoding match for {:?}", location);
        }

        Ok(coords)
    }

    async fn current(&self, coords: Coordinates) -> Result<CurrentConditions> {
        let url = format!(
            "{}/data/2.5/weather?lat={}&lon={}&appid={}&units=metric",
            self.base_url,
            coords.lat,
            coords.lng,
            self.api_key
        );

        let body: WeatherResponse = self.get_json(&url).await?;
        let group = body.weather
            .into_iter()
            .next()
            .ok_or_else(|| AppError::External("OpenWeatherMap response had no weather group".to_string()))?;

        Ok(CurrentConditions {
            condition: group.main,
            description: group.description,
            temp_c: body.main.temp,
            humidity: body.main.humidity,
            wind_speed: body.wind.map(|w| w.speed).unwrap_or(0.0),
            rain_1h: body.rain.and_then(|r| r.one_hour),
        })
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("forecast request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("forecast for ({lat:.4}, {lon:.4}) has no usable samples")]
    EmptySeries { lat: f64, lon: f64 },
    #[error("forecast sample at {0} is missing cloud area fraction")]
    MissingCloudCover(chrono::DateTime<chrono::Utc>),
}

mod error;
mod metno;

use chrono::{DateTime, Utc};

pub use error::WeatherError;
pub use metno::MetnoClient;

use metno::ForecastSample;

/// Cloud-forecast collaborator of the sampling pipeline.
pub trait WeatherProvider {
    /// Instantaneous cloud-area fraction in percent at a point and time.
    fn cloud_area_fraction(
        &self,
        latitude_deg: f64,
        longitude_deg: f64,
        at: DateTime<Utc>,
    ) -> Result<f64, WeatherError>;
}

/// Provider returning a fixed value, used in debug mode instead of the
/// network-backed client.
pub struct FixedCloud(pub f64);

impl WeatherProvider for FixedCloud {
    fn cloud_area_fraction(&self, _: f64, _: f64, _: DateTime<Utc>) -> Result<f64, WeatherError> {
        Ok(self.0)
    }
}

/// Pick the series sample closest in absolute time to `at`.
///
/// Ties resolve to the first-encountered sample in series order.
fn closest_sample(series: &[ForecastSample], at: DateTime<Utc>) -> Option<&ForecastSample> {
    let mut best: Option<&ForecastSample> = None;
    let mut best_diff = None;

    for sample in series {
        let diff = (sample.time - at).abs();
        if best_diff.map_or(true, |d| diff < d) {
            best_diff = Some(diff);
            best = Some(sample);
        }
    }

    best
}

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::config::Location;
use crate::pipeline::types::{PassRecord, CLOUD_UNKNOWN_PERCENT};
use crate::predict::{sun_zenith_deg, PredictError, Propagator};
use crate::weather::WeatherProvider;

/// Above this sun zenith angle the pass is in twilight or darker; the
/// forecast is not queried at all and the cloud sentinel is recorded.
/// The acceptance filter applies its own, stricter gate later.
pub const SAMPLING_SUN_ZENITH_MAX_DEG: f64 = 70.0;

/// Spacing of the 3x3 cloud sampling grid around the location.
const GRID_STEP_DEG: f64 = 0.05;

/// Turn every pass of `satellite` over `location` within the look-ahead
/// window into an enriched record.
///
/// The propagator is called with `min_elevation_deg.floor()` as its
/// visibility floor, so hopeless low passes never reach the enrichment
/// stage. No passes in the window is a valid empty result.
pub fn sample_passes(
    satellite: &str,
    location: &Location,
    propagator: &dyn Propagator,
    weather: &dyn WeatherProvider,
    start: DateTime<Utc>,
    look_ahead_hours: u32,
    min_elevation_deg: f64,
) -> Result<Vec<PassRecord>, PredictError> {
    let observer = location.observer();
    let windows = propagator.passes(
        &observer,
        start,
        look_ahead_hours,
        min_elevation_deg.floor(),
    )?;

    let mut records = Vec::with_capacity(windows.len());
    for window in windows {
        let angles = propagator.look_angles(&observer, window.peak)?;
        let zenith = sun_zenith_deg(location.latitude_deg, location.longitude_deg, window.peak);

        let cloud = if zenith > SAMPLING_SUN_ZENITH_MAX_DEG {
            CLOUD_UNKNOWN_PERCENT
        } else {
            grid_cloud_cover(weather, location, window.peak)
        };

        records.push(PassRecord::new(
            satellite.to_string(),
            location.name.clone(),
            window.peak,
            round2(angles.azimuth_deg).rem_euclid(360.0),
            round2(angles.elevation_deg),
            zenith,
            cloud,
        ));
    }

    Ok(records)
}

/// Median cloud-area fraction over the 3x3 grid centered on the location.
///
/// A failed grid point is logged and excluded from the median; only if every
/// point fails does the record fall back to the unknown sentinel.
fn grid_cloud_cover(weather: &dyn WeatherProvider, location: &Location, at: DateTime<Utc>) -> f64 {
    let mut values = Vec::with_capacity(9);

    for dlat in [-1.0, 0.0, 1.0] {
        for dlon in [-1.0, 0.0, 1.0] {
            let lat = location.latitude_deg + dlat * GRID_STEP_DEG;
            let lon = location.longitude_deg + dlon * GRID_STEP_DEG;
            match weather.cloud_area_fraction(lat, lon, at) {
                Ok(value) => values.push(value),
                Err(e) => {
                    log::warn!("cloud sample ({lat:.4}, {lon:.4}) near {}: {e}", location.name)
                }
            }
        }
    }

    if values.is_empty() {
        log::warn!("no usable cloud samples around {}, recording unknown", location.name);
        return CLOUD_UNKNOWN_PERCENT;
    }
    median(values)
}

fn median(mut values: Vec<f64>) -> f64 {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

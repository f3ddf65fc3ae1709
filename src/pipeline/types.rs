use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

/// Cloud-cover sentinel: out of the [0, 100] range, so it fails every
/// cloud threshold at or below 100. Recorded when the sun is too low to
/// bother querying the forecast, or when no grid sample could be obtained.
pub const CLOUD_UNKNOWN_PERCENT: f64 = 101.0;

/// The enriched, filterable unit of the pipeline: one pass of one satellite
/// over one location, pinned to the peak-elevation instant. Constructed once
/// by the sampler and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PassRecord {
    pub satellite: String,
    pub location: String,
    /// Peak-elevation instant, UTC.
    pub timestamp: DateTime<Utc>,
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    pub sun_zenith_deg: f64,
    /// Percent in [0, 100], or `CLOUD_UNKNOWN_PERCENT`.
    pub cloud_cover_percent: f64,
}

impl PassRecord {
    /// Out-of-range geometry here is a programmer error upstream; fail loudly
    /// rather than clamp.
    pub fn new(
        satellite: String,
        location: String,
        timestamp: DateTime<Utc>,
        azimuth_deg: f64,
        elevation_deg: f64,
        sun_zenith_deg: f64,
        cloud_cover_percent: f64,
    ) -> Self {
        assert!(
            (0.0..360.0).contains(&azimuth_deg),
            "azimuth {azimuth_deg} out of [0, 360)"
        );
        assert!(
            (0.0..=90.0).contains(&elevation_deg),
            "elevation {elevation_deg} out of [0, 90]"
        );
        assert!(
            (0.0..=100.0).contains(&cloud_cover_percent)
                || cloud_cover_percent == CLOUD_UNKNOWN_PERCENT,
            "cloud cover {cloud_cover_percent} is neither a percentage nor the sentinel"
        );
        Self {
            satellite,
            location,
            timestamp,
            azimuth_deg,
            elevation_deg,
            sun_zenith_deg,
            cloud_cover_percent,
        }
    }
}

/// Actionable passes grouped by UTC calendar date; `BTreeMap` iteration gives
/// the ascending date order the report relies on.
pub type DateTable = BTreeMap<NaiveDate, Vec<PassRecord>>;

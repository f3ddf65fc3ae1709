mod error;
mod pass_finder;
mod propagation;
mod sun;
mod types;

use chrono::{DateTime, Duration, Utc};

pub use error::PredictError;
pub use propagation::Sgp4Propagator;
pub use sun::sun_zenith_deg;
pub use types::{LookAngles, Observer, PassWindow};

/// Orbital-geometry collaborator of the sampling pipeline.
///
/// `passes` applies `floor_elevation_deg` as a coarse visibility cut: windows
/// whose peak elevation never reaches the floor are excluded by the call
/// itself. The final acceptance threshold is applied later by the filter.
pub trait Propagator {
    fn passes(
        &self,
        observer: &Observer,
        start: DateTime<Utc>,
        look_ahead_hours: u32,
        floor_elevation_deg: f64,
    ) -> Result<Vec<PassWindow>, PredictError>;

    fn look_angles(&self, observer: &Observer, at: DateTime<Utc>)
        -> Result<LookAngles, PredictError>;
}

impl Propagator for Sgp4Propagator<'_> {
    fn passes(
        &self,
        observer: &Observer,
        start: DateTime<Utc>,
        look_ahead_hours: u32,
        floor_elevation_deg: f64,
    ) -> Result<Vec<PassWindow>, PredictError> {
        let end = start + Duration::hours(i64::from(look_ahead_hours));
        pass_finder::find_passes(self, observer, start, end, floor_elevation_deg)
    }

    fn look_angles(
        &self,
        observer: &Observer,
        at: DateTime<Utc>,
    ) -> Result<LookAngles, PredictError> {
        self.sample(observer, at)
    }
}

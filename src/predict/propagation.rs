use chrono::{DateTime, NaiveDate, Utc};
use sgp4::{Constants, Elements};

use crate::predict::error::PredictError;
use crate::predict::types::{LookAngles, Observer};

/// SGP4-backed look-angle computation for one satellite.
pub struct Sgp4Propagator<'a> {
    elements: &'a Elements,
    constants: Constants,
}

impl<'a> Sgp4Propagator<'a> {
    pub fn new(elements: &'a Elements) -> Result<Self, PredictError> {
        let constants = Constants::from_elements(elements)
            .map_err(|e| PredictError::InvalidElements(e.to_string()))?;
        Ok(Self {
            elements,
            constants,
        })
    }

    /// Topocentric azimuth/elevation of the satellite at `at`.
    pub fn sample(&self, observer: &Observer, at: DateTime<Utc>) -> Result<LookAngles, PredictError> {
        let minutes = self
            .elements
            .datetime_to_minutes_since_epoch(&at.naive_utc())
            .map_err(|e| PredictError::Propagation(e.to_string()))?;
        let prediction = self
            .constants
            .propagate(minutes)
            .map_err(|e| PredictError::Propagation(e.to_string()))?;

        Ok(look_angles(&prediction.position, gmst_rad(at), observer))
    }
}

/// Convert a TEME position to observer-relative azimuth/elevation.
fn look_angles(pos_teme_km: &[f64; 3], gmst: f64, observer: &Observer) -> LookAngles {
    let (sin_t, cos_t) = gmst.sin_cos();

    // TEME (~ECI) -> ECEF, rotation about Z by GMST
    let x_ecef = cos_t * pos_teme_km[0] + sin_t * pos_teme_km[1];
    let y_ecef = -sin_t * pos_teme_km[0] + cos_t * pos_teme_km[1];
    let z_ecef = pos_teme_km[2];

    let site = observer.position_ecef_km();
    let rx = x_ecef - site[0];
    let ry = y_ecef - site[1];
    let rz = z_ecef - site[2];

    let lat = observer.lat_rad();
    let lon = observer.lon_rad();
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();

    // ECEF relative vector -> local ENU
    let east = -sin_lon * rx + cos_lon * ry;
    let north = -sin_lat * cos_lon * rx - sin_lat * sin_lon * ry + cos_lat * rz;
    let up = cos_lat * cos_lon * rx + cos_lat * sin_lon * ry + sin_lat * rz;

    let range = (east * east + north * north + up * up).sqrt();
    let elevation = (up / range).asin().to_degrees();
    let azimuth = east.atan2(north).to_degrees().rem_euclid(360.0);

    LookAngles {
        azimuth_deg: azimuth,
        elevation_deg: elevation,
    }
}

/// Greenwich mean sidereal time, radians.
pub(crate) fn gmst_rad(at: DateTime<Utc>) -> f64 {
    gmst_deg(at).to_radians()
}

/// Greenwich mean sidereal time, degrees in [0, 360).
pub(crate) fn gmst_deg(at: DateTime<Utc>) -> f64 {
    let days = days_since_j2000(at);
    (280.46061837 + 360.98564736629 * days).rem_euclid(360.0)
}

/// Days (fractional) since the J2000 epoch, 2000-01-01 12:00:00 UTC.
pub(crate) fn days_since_j2000(at: DateTime<Utc>) -> f64 {
    let j2000 = NaiveDate::from_ymd_opt(2000, 1, 1)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap()
        .and_utc();
    let delta = at - j2000;
    delta.num_milliseconds() as f64 / 86_400_000.0
}

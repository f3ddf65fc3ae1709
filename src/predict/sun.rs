use chrono::{DateTime, Utc};

use crate::predict::propagation::{days_since_j2000, gmst_deg};

/// Sun zenith angle in degrees at a location and instant.
///
/// Low-precision solar ephemeris (good to ~0.01 deg over decades around
/// J2000), more than enough to gate imaging passes on daylight.
pub fn sun_zenith_deg(latitude_deg: f64, longitude_deg: f64, at: DateTime<Utc>) -> f64 {
    let d = days_since_j2000(at);

    // Mean longitude and mean anomaly of the sun, degrees
    let mean_longitude = (280.460 + 0.985_647_4 * d).rem_euclid(360.0);
    let mean_anomaly = (357.528 + 0.985_600_3 * d).rem_euclid(360.0).to_radians();

    // Ecliptic longitude and obliquity
    let ecliptic_longitude = (mean_longitude
        + 1.915 * mean_anomaly.sin()
        + 0.020 * (2.0 * mean_anomaly).sin())
    .to_radians();
    let obliquity = (23.439 - 0.000_000_4 * d).to_radians();

    // Equatorial coordinates
    let right_ascension = (obliquity.cos() * ecliptic_longitude.sin())
        .atan2(ecliptic_longitude.cos())
        .to_degrees();
    let declination = (obliquity.sin() * ecliptic_longitude.sin()).asin();

    // Local hour angle from sidereal time
    let local_sidereal = gmst_deg(at) + longitude_deg;
    let hour_angle = (local_sidereal - right_ascension).rem_euclid(360.0).to_radians();

    let lat = latitude_deg.to_radians();
    let sin_altitude =
        lat.sin() * declination.sin() + lat.cos() * declination.cos() * hour_angle.cos();
    90.0 - sin_altitude.asin().to_degrees()
}

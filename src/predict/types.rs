use chrono::{DateTime, Utc};

/// Observer site on the WGS-84 ellipsoid.
#[derive(Debug, Clone, Copy)]
pub struct Observer {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: f64,
}

impl Observer {
    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }

    pub fn position_ecef_km(&self) -> [f64; 3] {
        // WGS-84 constants
        let a = 6378.137;
        let e2 = 0.00669437999014;
        let lat = self.lat_rad();
        let lon = self.lon_rad();
        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let alt_km = self.altitude_m / 1000.0;
        let x = (n + alt_km) * cos_lat * lon.cos();
        let y = (n + alt_km) * cos_lat * lon.sin();
        let z = (n * (1.0 - e2) + alt_km) * sin_lat;
        [x, y, z]
    }
}

/// One visibility interval of a satellite over an observer.
#[derive(Debug, Clone, Copy)]
pub struct PassWindow {
    pub rise: DateTime<Utc>,
    pub peak: DateTime<Utc>,
    pub set: DateTime<Utc>,
}

/// Observer-relative pointing at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct LookAngles {
    /// Degrees clockwise from north, in [0, 360).
    pub azimuth_deg: f64,
    /// Degrees above the local horizon, in [-90, 90].
    pub elevation_deg: f64,
}

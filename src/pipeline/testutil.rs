use std::cell::{Cell, RefCell};

use chrono::{DateTime, Duration, Utc};

use crate::config::Location;
use crate::predict::{LookAngles, Observer, PassWindow, PredictError, Propagator};
use crate::weather::{WeatherError, WeatherProvider};

pub fn location_at(name: &str, latitude_deg: f64, longitude_deg: f64) -> Location {
    Location {
        name: name.to_string(),
        latitude_deg,
        longitude_deg,
        altitude_m: 0.0,
    }
}

pub fn window_peaking_at(peak: DateTime<Utc>) -> PassWindow {
    PassWindow {
        rise: peak - Duration::minutes(5),
        peak,
        set: peak + Duration::minutes(5),
    }
}

/// Propagator returning canned windows and fixed look angles.
pub struct MockPropagator {
    windows: Vec<PassWindow>,
    azimuth_deg: f64,
    elevation_deg: f64,
    last_floor: Cell<Option<f64>>,
}

impl MockPropagator {
    pub fn new(windows: Vec<PassWindow>, azimuth_deg: f64, elevation_deg: f64) -> Self {
        Self {
            windows,
            azimuth_deg,
            elevation_deg,
            last_floor: Cell::new(None),
        }
    }

    pub fn last_floor(&self) -> Option<f64> {
        self.last_floor.get()
    }
}

impl Propagator for MockPropagator {
    fn passes(
        &self,
        _observer: &Observer,
        _start: DateTime<Utc>,
        _look_ahead_hours: u32,
        floor_elevation_deg: f64,
    ) -> Result<Vec<PassWindow>, PredictError> {
        self.last_floor.set(Some(floor_elevation_deg));
        Ok(self.windows.clone())
    }

    fn look_angles(
        &self,
        _observer: &Observer,
        _at: DateTime<Utc>,
    ) -> Result<LookAngles, PredictError> {
        Ok(LookAngles {
            azimuth_deg: self.azimuth_deg,
            elevation_deg: self.elevation_deg,
        })
    }
}

/// Weather provider serving queued responses and counting calls.
///
/// An exhausted queue repeats the last configured response, so a constant
/// provider is just a one-element queue.
pub struct QueueWeather {
    responses: RefCell<Vec<Result<f64, ()>>>,
    calls: Cell<usize>,
}

impl QueueWeather {
    pub fn constant(value: f64) -> Self {
        Self::from_results(vec![Ok(value)])
    }

    pub fn from_results(responses: Vec<Result<f64, ()>>) -> Self {
        Self {
            responses: RefCell::new(responses),
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl WeatherProvider for QueueWeather {
    fn cloud_area_fraction(
        &self,
        latitude_deg: f64,
        longitude_deg: f64,
        _at: DateTime<Utc>,
    ) -> Result<f64, WeatherError> {
        self.calls.set(self.calls.get() + 1);
        let mut responses = self.responses.borrow_mut();
        let response = if responses.len() > 1 {
            responses.remove(0)
        } else {
            responses[0]
        };
        response.map_err(|()| WeatherError::EmptySeries {
            lat: latitude_deg,
            lon: longitude_deg,
        })
    }
}

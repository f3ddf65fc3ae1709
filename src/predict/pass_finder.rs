use chrono::{DateTime, Duration, Utc};

use crate::predict::error::PredictError;
use crate::predict::propagation::Sgp4Propagator;
use crate::predict::types::{Observer, PassWindow};

const COARSE_STEP_SECONDS: i64 = 60; // 1 minute for initial scan
const FINE_STEP_SECONDS: i64 = 1; // 1 second for refinement
const HORIZON_ELEVATION: f64 = 0.0;

/// Find all passes above the observer's horizon within `[start, end]` whose
/// peak elevation reaches `floor_elevation_deg`.
///
/// The floor is a coarse visibility cut, not the acceptance threshold: a pass
/// that never climbs above it is not worth enriching downstream.
pub fn find_passes(
    propagator: &Sgp4Propagator,
    observer: &Observer,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    floor_elevation_deg: f64,
) -> Result<Vec<PassWindow>, PredictError> {
    let mut passes = Vec::new();
    let mut cursor = start;
    let coarse_step = Duration::seconds(COARSE_STEP_SECONDS);

    let mut prev_visible = false;
    let mut rise: Option<DateTime<Utc>> = None;
    let mut max_el = 0.0;
    let mut max_el_time = cursor;

    while cursor <= end {
        let sample = propagator.sample(observer, cursor)?;
        let visible = sample.elevation_deg >= HORIZON_ELEVATION;

        if visible && !prev_visible {
            // Rise detected, refine to find the exact crossing
            let refined = refine_crossing(propagator, observer, cursor - coarse_step, cursor, true)?;
            rise = Some(refined);
            max_el = sample.elevation_deg;
            max_el_time = cursor;
        } else if visible && rise.is_some() {
            if sample.elevation_deg > max_el {
                max_el = sample.elevation_deg;
                max_el_time = cursor;
            }
        } else if !visible && prev_visible && rise.is_some() {
            // Set detected
            let set = refine_crossing(propagator, observer, cursor - coarse_step, cursor, false)?;
            if max_el >= floor_elevation_deg {
                passes.push(PassWindow {
                    rise: rise.unwrap(),
                    peak: max_el_time,
                    set,
                });
            }
            rise = None;
            max_el = 0.0;
        }

        prev_visible = visible;
        cursor += coarse_step;
    }

    // Pass still in progress at the end of the window
    if let Some(rise) = rise {
        if max_el >= floor_elevation_deg {
            passes.push(PassWindow {
                rise,
                peak: max_el_time,
                set: end,
            });
        }
    }

    Ok(passes)
}

/// Binary search for the exact horizon crossing between two samples.
fn refine_crossing(
    propagator: &Sgp4Propagator,
    observer: &Observer,
    before: DateTime<Utc>,
    after: DateTime<Utc>,
    is_rise: bool,
) -> Result<DateTime<Utc>, PredictError> {
    let mut low = before;
    let mut high = after;

    while (high - low).num_seconds() > FINE_STEP_SECONDS {
        let mid = low + (high - low) / 2;
        let sample = propagator.sample(observer, mid)?;
        let above = sample.elevation_deg >= HORIZON_ELEVATION;

        if above == is_rise {
            high = mid;
        } else {
            low = mid;
        }
    }

    Ok(high)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sgp4::Elements;

    // ISS, epoch 2020-07-12
    fn iss_elements() -> Elements {
        Elements::from_tle(
            Some("ISS (ZARYA)".to_string()),
            b"1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992",
            b"2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008",
        )
        .unwrap()
    }

    #[test]
    fn finds_iss_passes_over_mid_latitude() {
        let elements = iss_elements();
        let propagator = Sgp4Propagator::new(&elements).unwrap();
        let observer = Observer {
            latitude_deg: 45.0,
            longitude_deg: 9.0,
            altitude_m: 100.0,
        };
        let start = Utc.with_ymd_and_hms(2020, 7, 13, 0, 0, 0).unwrap();
        let end = start + Duration::hours(24);

        let passes = find_passes(&propagator, &observer, start, end, 10.0).unwrap();
        assert!(!passes.is_empty(), "expected at least one ISS pass in 24 h");

        for pass in &passes {
            assert!(pass.rise <= pass.peak && pass.peak <= pass.set);
            let peak = propagator.sample(&observer, pass.peak).unwrap();
            assert!(peak.elevation_deg >= 10.0);
            assert!(peak.elevation_deg <= 90.0);
        }
    }

    #[test]
    fn high_floor_excludes_low_passes() {
        let elements = iss_elements();
        let propagator = Sgp4Propagator::new(&elements).unwrap();
        let observer = Observer {
            latitude_deg: 45.0,
            longitude_deg: 9.0,
            altitude_m: 100.0,
        };
        let start = Utc.with_ymd_and_hms(2020, 7, 13, 0, 0, 0).unwrap();
        let end = start + Duration::hours(24);

        let all = find_passes(&propagator, &observer, start, end, 0.0).unwrap();
        let high = find_passes(&propagator, &observer, start, end, 60.0).unwrap();
        assert!(high.len() <= all.len());
        for pass in &high {
            let peak = propagator.sample(&observer, pass.peak).unwrap();
            assert!(peak.elevation_deg >= 60.0);
        }
    }
}

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::config::{Location, RunConfig, Satellite};
use crate::elements::{CelestrakSource, ElementStore, ElementsError};
use crate::pipeline::aggregate::aggregate_by_date;
use crate::pipeline::filter::is_actionable;
use crate::pipeline::sampler::sample_passes;
use crate::pipeline::types::DateTable;
use crate::predict::{PredictError, Sgp4Propagator};
use crate::weather::WeatherProvider;

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Elements(#[from] ElementsError),
    #[error(transparent)]
    Predict(#[from] PredictError),
    #[error("run deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),
}

/// One full run: FETCH_ELEMENTS, then SAMPLE_AND_FILTER over every
/// satellite x location pair, then AGGREGATE. A fatal element fetch aborts
/// before any sampling; no partial table is ever produced.
pub fn run(
    config: &RunConfig,
    satellites: &[Satellite],
    locations: &[Location],
    weather: &dyn WeatherProvider,
) -> Result<DateTable, RunError> {
    let store = fetch_elements(config, satellites)?;
    sample_and_aggregate(config, satellites, locations, &store, weather, Utc::now())
}

fn fetch_elements(config: &RunConfig, satellites: &[Satellite]) -> Result<ElementStore, RunError> {
    if config.debug_mode {
        log::info!(
            "debug mode: loading element snapshot {}",
            config.snapshot_path.display()
        );
        return Ok(ElementStore::load_snapshot(&config.snapshot_path)?);
    }

    let source = CelestrakSource::new()?;
    let (store, failures) = ElementStore::refresh(satellites, &source, config.refresh_policy)?;
    if !failures.is_empty() {
        log::warn!("{} satellite(s) degraded this run", failures.len());
    }
    if let Err(e) = store.save_snapshot(&config.snapshot_path) {
        log::warn!("could not save element snapshot: {e}");
    }
    Ok(store)
}

/// The sampling/filtering/aggregation stages, pure given fixed collaborators
/// and a fixed `start` instant.
pub fn sample_and_aggregate(
    config: &RunConfig,
    satellites: &[Satellite],
    locations: &[Location],
    store: &ElementStore,
    weather: &dyn WeatherProvider,
    start: DateTime<Utc>,
) -> Result<DateTable, RunError> {
    let budget = config.deadline_secs.map(Duration::from_secs);
    let started = Instant::now();
    let mut kept = Vec::new();

    for satellite in satellites {
        let Some(record) = store.get(satellite.catalog_id) else {
            // Degraded during refresh; already reported there.
            log::warn!("no elements for {}, skipping", satellite.name);
            continue;
        };
        let propagator = Sgp4Propagator::new(&record.elements)?;

        for location in locations {
            if let Some(budget) = budget {
                if started.elapsed() > budget {
                    return Err(RunError::DeadlineExceeded(budget));
                }
            }

            let sampled = sample_passes(
                &satellite.name,
                location,
                &propagator,
                weather,
                start,
                config.look_ahead_hours,
                config.min_elevation_deg,
            )?;
            log::debug!(
                "{} over {}: {} candidate pass(es)",
                satellite.name,
                location.name,
                sampled.len()
            );

            kept.extend(sampled.into_iter().filter(|r| {
                is_actionable(
                    r,
                    satellite.min_elevation_deg,
                    config.min_elevation_deg,
                    config.max_cloud_cover_percent,
                )
            }));
        }
    }

    log::info!("{} actionable pass(es) after filtering", kept.len());
    Ok(aggregate_by_date(kept))
}

mod error;

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use sgp4::Elements;

use crate::config::{RefreshPolicy, Satellite};
pub use error::ElementsError;

const CELESTRAK_ENDPOINT: &str = "https://celestrak.org/NORAD/elements/gp.php";
const AGENT: &str = concat!("passcast/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One satellite's current two-line element set, raw lines kept for the
/// snapshot file.
pub struct TleRecord {
    pub name: String,
    pub catalog: u32,
    pub line1: String,
    pub line2: String,
    pub elements: Elements,
}

/// Source of raw TLE text, one record per catalog id.
pub trait ElementSource {
    fn fetch(&self, catalog: u32) -> Result<String, ElementsError>;
}

/// Celestrak GP query by catalog number.
pub struct CelestrakSource {
    client: Client,
}

impl CelestrakSource {
    pub fn new() -> Result<Self, ElementsError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client })
    }
}

impl ElementSource for CelestrakSource {
    fn fetch(&self, catalog: u32) -> Result<String, ElementsError> {
        let url = format!("{CELESTRAK_ENDPOINT}?CATNR={catalog}&FORMAT=TLE");
        log::debug!("fetching elements: {url}");
        let text = self
            .client
            .get(&url)
            .header(USER_AGENT, AGENT)
            .send()?
            .error_for_status()?
            .text()?;
        Ok(text)
    }
}

/// A satellite whose refresh failed, kept alongside the store under the
/// degrade policy.
pub struct RefreshFailure {
    pub satellite: String,
    pub error: ElementsError,
}

/// Refreshed element sets for the run, keyed by catalog number.
#[derive(Default)]
pub struct ElementStore {
    by_catalog: HashMap<u32, TleRecord>,
}

impl ElementStore {
    pub fn get(&self, catalog: u32) -> Option<&TleRecord> {
        self.by_catalog.get(&catalog)
    }

    /// Fetch fresh elements for every configured satellite.
    ///
    /// Under `RefreshPolicy::Abort` (the default) any single failure fails
    /// the whole refresh; under `RefreshPolicy::Degrade` the failing
    /// satellite is reported and left out of the store.
    pub fn refresh<S: ElementSource>(
        satellites: &[Satellite],
        source: &S,
        policy: RefreshPolicy,
    ) -> Result<(Self, Vec<RefreshFailure>), ElementsError> {
        let mut store = Self::default();
        let mut failures = Vec::new();

        for satellite in satellites {
            let outcome = source
                .fetch(satellite.catalog_id)
                .and_then(|text| parse_record(satellite.catalog_id, &text));

            match outcome {
                Ok(mut record) => {
                    // Prefer the configured name over whatever the source sent.
                    record.name = satellite.name.clone();
                    store.by_catalog.insert(satellite.catalog_id, record);
                }
                Err(error) => match policy {
                    RefreshPolicy::Abort => {
                        return Err(ElementsError::RefreshFailed {
                            satellite: satellite.name.clone(),
                            source: Box::new(error),
                        });
                    }
                    RefreshPolicy::Degrade => {
                        log::warn!("element refresh failed for {}: {error}", satellite.name);
                        failures.push(RefreshFailure {
                            satellite: satellite.name.clone(),
                            error,
                        });
                    }
                },
            }
        }

        Ok((store, failures))
    }

    /// Load a previously saved snapshot (debug mode).
    pub fn load_snapshot(path: &Path) -> Result<Self, ElementsError> {
        let content = fs::read_to_string(path)?;
        let mut store = Self::default();

        for (name, line1, line2) in parse_multi_tle(&content) {
            let record = build_record(name, &line1, &line2, 0)?;
            store.by_catalog.insert(record.catalog, record);
        }

        Ok(store)
    }

    /// Write the store back out in multi-TLE text form, sorted by catalog
    /// number so snapshots diff cleanly.
    pub fn save_snapshot(&self, path: &Path) -> Result<(), ElementsError> {
        let mut records: Vec<&TleRecord> = self.by_catalog.values().collect();
        records.sort_by_key(|r| r.catalog);

        let mut out = String::new();
        for record in records {
            out.push_str(&record.name);
            out.push('\n');
            out.push_str(&record.line1);
            out.push('\n');
            out.push_str(&record.line2);
            out.push('\n');
        }

        fs::write(path, out)?;
        Ok(())
    }
}

/// Parse the single 3-line record a CATNR query returns.
fn parse_record(catalog: u32, text: &str) -> Result<TleRecord, ElementsError> {
    let mut records = parse_multi_tle(text);
    if records.is_empty() {
        return Err(ElementsError::EmptyResponse(catalog));
    }
    let (name, line1, line2) = records.remove(0);
    build_record(name, &line1, &line2, catalog)
}

fn build_record(
    name: Option<String>,
    line1: &str,
    line2: &str,
    catalog_hint: u32,
) -> Result<TleRecord, ElementsError> {
    let elements = Elements::from_tle(name.clone(), line1.as_bytes(), line2.as_bytes()).map_err(
        |e| ElementsError::InvalidTle {
            catalog: catalog_hint,
            message: e.to_string(),
        },
    )?;
    let catalog = elements.norad_id as u32;
    Ok(TleRecord {
        name: name.unwrap_or_else(|| format!("NORAD {catalog}")),
        catalog,
        line1: line1.to_string(),
        line2: line2.to_string(),
        elements,
    })
}

/// Parse multi-satellite TLE content, with or without name lines.
fn parse_multi_tle(content: &str) -> Vec<(Option<String>, String, String)> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim_end())
        .filter(|l| !l.trim().is_empty())
        .collect();

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
            // 2-line record, no name
            result.push((None, lines[i].to_string(), lines[i + 1].to_string()));
            i += 2;
        } else if i + 2 < lines.len()
            && lines[i + 1].starts_with("1 ")
            && lines[i + 2].starts_with("2 ")
        {
            // 3-line record with name
            result.push((
                Some(lines[i].trim().to_string()),
                lines[i + 1].to_string(),
                lines[i + 2].to_string(),
            ));
            i += 3;
        } else {
            i += 1; // skip unknown line
        }
    }

    result
}

use crate::pipeline::types::PassRecord;

/// Acceptance gate on sun zenith: stricter than the 70-degree sampling gate.
/// Passes between the two gates carry cloud data but are rejected here
/// because the light is too poor for imaging.
pub const ACTIONABLE_SUN_ZENITH_MAX_DEG: f64 = 55.0;

/// Decide whether a sampled pass is a useful observation opportunity.
///
/// Pure predicate: sun high enough, elevation at or above the per-satellite
/// override (falling back to the global default), cloud cover at or below
/// the threshold. The 101 sentinel fails every threshold <= 100.
pub fn is_actionable(
    record: &PassRecord,
    min_elevation_override: Option<f64>,
    default_min_elevation_deg: f64,
    max_cloud_cover_percent: f64,
) -> bool {
    if record.sun_zenith_deg > ACTIONABLE_SUN_ZENITH_MAX_DEG {
        return false;
    }
    let min_elevation = min_elevation_override.unwrap_or(default_min_elevation_deg);
    record.elevation_deg >= min_elevation && record.cloud_cover_percent <= max_cloud_cover_percent
}

mod aggregate;
mod filter;
mod run;
mod sampler;
#[cfg(test)]
mod testutil;
mod types;

pub use aggregate::aggregate_by_date;
pub use filter::{is_actionable, ACTIONABLE_SUN_ZENITH_MAX_DEG};
pub use run::{run, sample_and_aggregate, RunError};
pub use sampler::{sample_passes, SAMPLING_SUN_ZENITH_MAX_DEG};
pub use types::{DateTable, PassRecord, CLOUD_UNKNOWN_PERCENT};

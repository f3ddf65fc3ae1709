use crate::pipeline::types::{DateTable, PassRecord};

/// Group actionable records by UTC calendar date.
///
/// Within a date, records sort ascending by timestamp; identical timestamps
/// break ties by satellite name, then location name, so the table is fully
/// deterministic. Every input record lands under exactly one date.
pub fn aggregate_by_date(records: Vec<PassRecord>) -> DateTable {
    let mut table = DateTable::new();

    for record in records {
        table
            .entry(record.timestamp.date_naive())
            .or_default()
            .push(record);
    }

    for day in table.values_mut() {
        day.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.satellite.cmp(&b.satellite))
                .then_with(|| a.location.cmp(&b.location))
        });
    }

    table
}

use chrono::{DateTime, Utc};

use crate::config::{Location, Satellite};
use crate::pipeline::DateTable;

/// Render the date table as a markdown report: one section per date in
/// ascending order, plus reference tables of the configured locations and
/// satellites.
pub fn render_markdown(
    table: &DateTable,
    satellites: &[Satellite],
    locations: &[Location],
    generated_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();

    out.push_str("# Satellite pass forecast\n\n");
    out.push_str(&format!(
        "Generated {} UTC.\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));

    if table.is_empty() {
        out.push_str("No actionable passes in the look-ahead window.\n\n");
    }

    for (date, passes) in table {
        out.push_str(&format!("## {date}\n\n"));
        out.push_str("| Time (UTC) | Satellite | Location | Elevation | Cloud cover |\n");
        out.push_str("|---|---|---|---|---|\n");
        for pass in passes {
            let coordinates = locations
                .iter()
                .find(|l| l.name == pass.location)
                .map(|l| format!(" ({:.2}, {:.2})", l.latitude_deg, l.longitude_deg))
                .unwrap_or_default();
            out.push_str(&format!(
                "| {} | {} | {}{} | {:.2} deg | {} |\n",
                pass.timestamp.format("%H:%M:%S"),
                pass.satellite,
                pass.location,
                coordinates,
                pass.elevation_deg,
                cloud_cell(pass.cloud_cover_percent),
            ));
        }
        out.push('\n');
    }

    out.push_str("## Locations\n\n");
    out.push_str("| Name | Latitude | Longitude | Altitude |\n");
    out.push_str("|---|---|---|---|\n");
    for location in locations {
        out.push_str(&format!(
            "| {} | {:.4} | {:.4} | {:.0} m |\n",
            location.name, location.latitude_deg, location.longitude_deg, location.altitude_m
        ));
    }
    out.push('\n');

    out.push_str("## Satellites\n\n");
    out.push_str("| Name | Catalog | Min elevation |\n");
    out.push_str("|---|---|---|\n");
    for satellite in satellites {
        let min_elevation = satellite
            .min_elevation_deg
            .map(|v| format!("{v:.1} deg"))
            .unwrap_or_else(|| "default".to_string());
        out.push_str(&format!(
            "| {} | {} | {} |\n",
            satellite.name, satellite.catalog_id, min_elevation
        ));
    }

    out
}

fn cloud_cell(percent: f64) -> String {
    if percent > 100.0 {
        "n/a".to_string()
    } else {
        format!("{percent:.0}%")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{PassRecord, CLOUD_UNKNOWN_PERCENT};
    use chrono::TimeZone;

    fn fixture() -> (DateTable, Vec<Satellite>, Vec<Location>) {
        let satellites = vec![Satellite {
            name: "Sat-X".to_string(),
            catalog_id: 99999,
            min_elevation_deg: Some(35.0),
        }];
        let locations = vec![Location {
            name: "Loc-Y".to_string(),
            latitude_deg: 60.8,
            longitude_deg: 10.8,
            altitude_m: 123.0,
        }];
        let record = PassRecord::new(
            "Sat-X".to_string(),
            "Loc-Y".to_string(),
            Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
            180.0,
            55.0,
            40.0,
            30.0,
        );
        let table = crate::pipeline::aggregate_by_date(vec![record]);
        (table, satellites, locations)
    }

    #[test]
    fn renders_date_section_with_all_fields() {
        let (table, satellites, locations) = fixture();
        let generated = Utc.with_ymd_and_hms(2024, 2, 28, 8, 0, 0).unwrap();
        let report = render_markdown(&table, &satellites, &locations, generated);

        assert!(report.contains("## 2024-03-01"));
        assert!(report.contains("| 10:00:00 | Sat-X | Loc-Y (60.80, 10.80) | 55.00 deg | 30% |"));
        assert!(report.contains("## Locations"));
        assert!(report.contains("| Loc-Y | 60.8000 | 10.8000 | 123 m |"));
        assert!(report.contains("## Satellites"));
        assert!(report.contains("| Sat-X | 99999 | 35.0 deg |"));
    }

    #[test]
    fn sentinel_cloud_renders_as_not_available() {
        assert_eq!(cloud_cell(CLOUD_UNKNOWN_PERCENT), "n/a");
        assert_eq!(cloud_cell(42.0), "42%");
    }

    #[test]
    fn empty_table_says_so() {
        let (_, satellites, locations) = fixture();
        let generated = Utc.with_ymd_and_hms(2024, 2, 28, 8, 0, 0).unwrap();
        let report = render_markdown(&DateTable::new(), &satellites, &locations, generated);
        assert!(report.contains("No actionable passes"));
    }
}

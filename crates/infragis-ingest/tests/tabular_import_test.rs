//! Integration tests for the tabular import pipeline
//!
//! CSV text is read into rows, auto-mapped, converted to features and
//! exported again.

use infragis_core::formats::csv::read_table_from;
use infragis_core::models::{Cell, Geometry, Row};
use infragis_ingest::{
    auto_map_columns, coerce_number, features_to_collection, features_to_csv, ingest_rows,
    SemanticField,
};
use proptest::prelude::*;

const PROJECTS_CSV: &str = "\
Project,Latitude,Longitude,Category,Cost,Phase,Start,Finish,Vendor,Scope
Main St Bridge,41.59,-93.62,Bridge,\"$1,200,000\",Construction,2024-03-15,12/31/2025,ACME,Deck replacement
Water Main,,-93.60,Utility,50000,Design,,,,
Transit Hub,41.61,-93.58,Transit,€3 500 000,Planning,March 1 2025,,Metro Build,
";

#[test]
fn test_csv_to_features() {
    let table = read_table_from(PROJECTS_CSV.as_bytes(), ',').unwrap();
    let mapping = auto_map_columns(&table.rows);

    assert_eq!(mapping.get(SemanticField::Name), Some("Project"));
    assert_eq!(mapping.get(SemanticField::Status), Some("Phase"));
    assert_eq!(mapping.get(SemanticField::Contractor), Some("Vendor"));
    assert_eq!(mapping.get(SemanticField::Location), None);

    let report = ingest_rows(&table.rows, &mapping);
    assert_eq!(report.features.len(), 2);
    assert_eq!(report.dropped_rows, vec![2]);

    let bridge = &report.features[0];
    assert_eq!(bridge.known_geometry(), Some(&Geometry::point(-93.62, 41.59)));
    assert_eq!(bridge.property("cost"), Some(&serde_json::json!(1_200_000.0)));
    assert_eq!(bridge.property("endDate"), Some(&serde_json::json!("2025-12-31")));

    let hub = &report.features[1];
    assert_eq!(hub.property("cost"), Some(&serde_json::json!(3_500_000.0)));
    assert_eq!(hub.property("startDate"), Some(&serde_json::json!("2025-03-01")));
    assert_eq!(hub.property("description"), Some(&serde_json::Value::Null));
}

#[test]
fn test_overridden_mapping_and_export() {
    let table = read_table_from(PROJECTS_CSV.as_bytes(), ',').unwrap();
    let mut mapping = auto_map_columns(&table.rows);
    mapping.apply_overrides(&["location=Category", "type="]).unwrap();

    let report = ingest_rows(&table.rows, &mapping);
    let mut buffer = Vec::new();
    features_to_csv(&report.features, &mut buffer).unwrap();

    let exported = read_table_from(buffer.as_slice(), ',').unwrap();
    assert_eq!(exported.rows.len(), 2);
    assert_eq!(exported.rows[0].get("location"), Some(&Cell::text("Bridge")));
    assert_eq!(exported.rows[0].get("type"), Some(&Cell::Empty));
    assert_eq!(exported.rows[1].get("lat"), Some(&Cell::text("41.61")));

    let document = features_to_collection(report.features);
    assert_eq!(document.features().len(), 2);
}

#[test]
fn test_all_rows_invalid() {
    let rows = vec![
        Row::from_pairs([("lat", "north"), ("lon", "east")]),
        Row::from_pairs([("lat", ""), ("lon", "")]),
    ];
    let report = ingest_rows(&rows, &auto_map_columns(&rows));
    assert!(report.features.is_empty());
    assert_eq!(report.dropped_rows, vec![1, 2]);
}

proptest! {
    #[test]
    fn prop_thousands_separated_numbers_coerce(whole in 0u64..10_000_000_000, cents in 0u32..100) {
        let digits = whole.to_string();
        let mut grouped = String::new();
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        let text = format!("${}.{:02}", grouped, cents);
        let expected: f64 = format!("{}.{:02}", whole, cents).parse().unwrap();

        prop_assert_eq!(coerce_number(&Cell::text(text)), Some(expected));
    }

    #[test]
    fn prop_rows_with_finite_coordinates_are_kept(lat in -90.0..90.0f64, lon in -180.0..180.0f64) {
        let rows = vec![Row::from_pairs([("Y", Cell::Number(lat)), ("X", Cell::Number(lon))])];
        let report = ingest_rows(&rows, &auto_map_columns(&rows));
        prop_assert_eq!(report.features.len(), 1);
        prop_assert_eq!(report.features[0].known_geometry(), Some(&Geometry::point(lon, lat)));
    }
}

//! Integration tests for reading spatial and tabular files

use infragis_core::formats::csv::read_table;
use infragis_core::formats::{read_tabular, FormatRegistry};
use infragis_core::models::{Cell, FeatureGeometry, FeatureTag, Geometry};
use infragis_core::InfragisError;
use std::fs;

#[test]
fn test_registry_reads_geojson_by_extension() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("assets.GeoJSON");
    fs::write(
        &path,
        r#"{
            "type": "FeatureCollection",
            "name": "assets",
            "features": [
                {"type": "Feature", "id": 7, "properties": {"name": "Tank"},
                 "geometry": {"type": "Point", "coordinates": [-93.6, 41.6, 280.0]}},
                {"type": "Feature", "properties": null,
                 "geometry": {"type": "MultiLineString", "coordinates": [[[0, 0], [1, 1]], [[2, 2], [3, 3]]]}},
                {"type": "Feature", "properties": {},
                 "geometry": {"type": "GeometryCollection", "geometries": []}},
                {"type": "NotAFeature"}
            ]
        }"#,
    )
    .unwrap();

    let registry = FormatRegistry::with_builtin_readers();
    let document = registry.read(&path).unwrap();

    // The mistyped member is kept, without a geometry to traverse
    assert_eq!(document.features().len(), 4);
    assert_eq!(document.features()[3].tag, FeatureTag::Other("NotAFeature".into()));
    let geometries: Vec<&Geometry> = document.geometries().collect();
    assert_eq!(geometries.len(), 2);
    assert!(matches!(geometries[1], Geometry::MultiLineString { .. }));
    assert!(matches!(document.features()[2].geometry, Some(FeatureGeometry::Unrecognized(_))));

    // Foreign members and elevation survive a round-trip
    let json = document.to_value();
    assert_eq!(json["name"], "assets");
    assert_eq!(json["features"][0]["geometry"]["coordinates"][2], 280.0);
    assert_eq!(json["features"][2]["geometry"]["type"], "GeometryCollection");
    assert_eq!(json["features"][3]["type"], "NotAFeature");
}

#[test]
fn test_registry_rejects_non_feature_documents() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("geometry.json");
    fs::write(&path, r#"{"type": "Point", "coordinates": [0, 0]}"#).unwrap();

    let result = FormatRegistry::with_builtin_readers().read(&path);
    assert!(matches!(result, Err(InfragisError::InvalidDocument { .. })));
}

#[test]
fn test_registry_rejects_unknown_extension() {
    let result = FormatRegistry::with_builtin_readers().read(std::path::Path::new("projects.xlsx"));
    match result {
        Err(InfragisError::UnsupportedFormat { extension, supported }) => {
            assert_eq!(extension, "xlsx");
            assert!(supported.contains(&"shp".to_string()));
        }
        other => panic!("Expected UnsupportedFormat, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_read_csv_file_with_tab_delimiter() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("projects.tsv");
    fs::write(&path, "Name\tLat\tLng\nPump\t41.6\t-93.6\n").unwrap();

    let table = read_table(&path, '\t').unwrap();
    assert_eq!(table.columns, vec!["Name", "Lat", "Lng"]);
    assert_eq!(table.rows[0].get("Lng"), Some(&Cell::text("-93.6")));
}

#[test]
fn test_read_tabular_uses_tabs_for_tsv() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("projects.TSV");
    fs::write(&path, "Name\tLat\tLng\nPump\t41.6\t-93.6\n").unwrap();

    // The configured delimiter only applies to other delimited text
    let table = read_tabular(&path, ',').unwrap();
    assert_eq!(table.columns, vec!["Name", "Lat", "Lng"]);
    assert_eq!(table.rows[0].get("Lat"), Some(&Cell::text("41.6")));
}

#[test]
fn test_read_tabular_sends_workbooks_to_the_spreadsheet_reader() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("projects.xlsx");
    fs::write(&path, "Name,Lat,Lng\n").unwrap();

    let result = read_tabular(&path, ',');
    match result {
        Err(InfragisError::FormatError { format, .. }) => assert_eq!(format, "Spreadsheet"),
        other => panic!("Expected a spreadsheet error, got {:?}", other.map(|t| t.columns)),
    }
}

//! Analyze command implementation

use crate::cli::AnalyzeArgs;
use crate::commands::read_document;
use crate::output::OutputWriter;
use crate::output_types::AnalyzeOutput;
use anyhow::Result;
use infragis_core::config::LayeredConfig;
use infragis_geo::analyze_coordinates;
use serde::Serialize;
use tabled::Tabled;

#[derive(Serialize, Tabled)]
struct CountRow {
    #[tabled(rename = "Check")]
    check: &'static str,
    #[tabled(rename = "Count")]
    count: usize,
}

pub fn execute(args: AnalyzeArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let document = read_document(&args.file, output)?;
    let diagnosis = analyze_coordinates(&document);
    let far_from_view =
        diagnosis.is_far_from(config.view_center.value, config.far_threshold_meters());

    if output.is_json() {
        return output.result(AnalyzeOutput {
            file: args.file.display().to_string(),
            suggested_correction: diagnosis.suggested_correction(),
            warnings: diagnosis.warnings(),
            far_from_view,
            diagnosis,
        });
    }

    output.section(format!("Coordinates of {}", args.file.display()));
    output.kv("Features", document.features().len());
    output.kv("Sampled features", diagnosis.feature_count);
    output.kv("Coordinate system", diagnosis.coordinate_system);
    output.kv("Max coordinate value", diagnosis.max_abs_value);
    if let Some(bounds) = diagnosis.bounds {
        output.kv(
            "Bounds",
            format!(
                "[{}, {}] to [{}, {}]",
                bounds.min_lng, bounds.min_lat, bounds.max_lng, bounds.max_lat
            ),
        );
    }

    output.table(vec![
        CountRow { check: "Samples collected", count: diagnosis.sample_count },
        CountRow { check: "Samples analyzed", count: diagnosis.analyzed_count },
        CountRow { check: "Longitude out of range", count: diagnosis.lng_out_of_range },
        CountRow { check: "Latitude out of range", count: diagnosis.lat_out_of_range },
        CountRow { check: "Possibly swapped", count: diagnosis.possible_swapped },
        CountRow { check: "Values above 1 000", count: diagnosis.large_values },
        CountRow { check: "Values above 100 000", count: diagnosis.very_large_values },
    ])?;

    for warning in diagnosis.warnings() {
        output.warning(warning);
    }
    if far_from_view {
        output.warning(format!(
            "Data is more than {} km from the configured view center",
            config.far_threshold_km.value
        ));
    }

    match diagnosis.suggested_correction() {
        Some(correction) => output.info(format!(
            "Suggested: {} (infragis normalize {} -o <out.geojson>)",
            correction,
            args.file.display()
        )),
        None => output.success("Coordinates look like longitude/latitude degrees"),
    }

    Ok(())
}

//! Normalize command implementation

use crate::cli::NormalizeArgs;
use crate::commands::{read_document, write_document};
use crate::interactive;
use crate::output::OutputWriter;
use crate::output_types::NormalizeOutput;
use anyhow::{bail, Result};
use infragis_core::config::{CorrectionPolicy, LayeredConfig};
use infragis_geo::{analyze_coordinates, apply_correction, manual_scale_hint, CoordinateDiagnosis, Correction};

pub fn execute(args: NormalizeArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let mut document = read_document(&args.file, output)?;
    let diagnosis = analyze_coordinates(&document);

    let corrections = choose_corrections(&args, &diagnosis, config.correction_policy.value, output)?;
    for correction in &corrections {
        apply_correction(&mut document, *correction);
    }

    write_document(&args.output, &document)?;

    let after = analyze_coordinates(&document);
    let far_from_view = after.is_far_from(config.view_center.value, config.far_threshold_meters());

    if output.is_json() {
        return output.result(NormalizeOutput {
            input: args.file.display().to_string(),
            output: args.output.display().to_string(),
            applied: corrections,
            suggested_correction: diagnosis.suggested_correction(),
            feature_count: document.features().len(),
        });
    }

    if corrections.is_empty() {
        output.info("No correction applied");
    }
    for correction in &corrections {
        output.info(format!("Applied: {}", correction));
    }
    for warning in after.warnings() {
        output.warning(warning);
    }
    if far_from_view {
        output.warning(format!(
            "Data is more than {} km from the configured view center",
            config.far_threshold_km.value
        ));
    }
    output.success(format!(
        "Wrote {} features to {}",
        document.features().len(),
        args.output.display()
    ));

    Ok(())
}

/// Explicit flags win; otherwise the suggested correction is subject to the
/// correction policy. Scaling is applied before swapping.
fn choose_corrections(
    args: &NormalizeArgs,
    diagnosis: &CoordinateDiagnosis,
    policy: CorrectionPolicy,
    output: &OutputWriter,
) -> Result<Vec<Correction>> {
    let mut corrections = Vec::new();

    if let Some(factor) = args.scale {
        if !factor.is_finite() || factor == 0.0 {
            bail!("Scale factor must be a finite, non-zero number, got {}", factor);
        }
        corrections.push(Correction::Scale { factor });
    } else if args.rescale {
        let suggested = manual_scale_hint(diagnosis.max_abs_value);
        let factor = if args.yes || output.is_json() || !interactive::can_prompt() {
            suggested
        } else {
            interactive::input_scale_factor(diagnosis.max_abs_value, suggested)?
        };
        corrections.push(Correction::Scale { factor });
    }
    if args.swap {
        corrections.push(Correction::Swap);
    }
    if !corrections.is_empty() {
        return Ok(corrections);
    }

    let Some(suggested) = diagnosis.suggested_correction() else {
        return Ok(corrections);
    };

    let apply = match policy {
        CorrectionPolicy::Never => false,
        CorrectionPolicy::Always => true,
        CorrectionPolicy::Prompt if args.yes => true,
        CorrectionPolicy::Prompt => {
            if output.is_json() || !interactive::can_prompt() {
                output.warning(format!(
                    "Suggested correction not applied: {}. Pass --yes to apply it",
                    suggested
                ));
                false
            } else {
                interactive::confirm_correction(diagnosis, suggested)?
            }
        }
    };

    if apply {
        corrections.push(suggested);
    } else {
        tracing::info!(correction = %suggested, ?policy, "Suggested correction skipped");
    }
    Ok(corrections)
}

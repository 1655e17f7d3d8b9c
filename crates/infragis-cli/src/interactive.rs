use anyhow::Result;
use console::style;
use dialoguer::{Confirm, Input};
use infragis_geo::{CoordinateDiagnosis, Correction};

/// Whether prompts can be shown at all
pub fn can_prompt() -> bool {
    console::user_attended()
}

/// Show the diagnosis findings and ask before applying a correction
pub fn confirm_correction(diagnosis: &CoordinateDiagnosis, correction: Correction) -> Result<bool> {
    println!("\n{}", style("Coordinate check").bold().underlined());
    for warning in diagnosis.warnings() {
        println!("  {} {}", style("⚠").yellow(), warning);
    }

    let confirmed = Confirm::new()
        .with_prompt(format!("Would you like to {}?", correction))
        .default(true)
        .interact()?;
    Ok(confirmed)
}

/// Ask for a scale factor, offering the suggested one
pub fn input_scale_factor(max_abs_value: f64, suggested: f64) -> Result<f64> {
    println!(
        "\nLargest coordinate value is {}. Coordinates are multiplied by the factor you enter.",
        style(max_abs_value).bold()
    );

    let factor: f64 = Input::new()
        .with_prompt("Scale factor")
        .default(suggested)
        .validate_with(|input: &f64| -> std::result::Result<(), &str> {
            if input.is_finite() && *input != 0.0 {
                Ok(())
            } else {
                Err("Enter a finite, non-zero number")
            }
        })
        .interact_text()?;
    Ok(factor)
}

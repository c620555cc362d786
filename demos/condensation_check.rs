// Minimum thickness that keeps a chilled-water line dry, across humidity levels

use colored::Colorize;
use std::error::Error;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use thermal_insulation::calculator::{CalculationOutcome, CalculationRequest, Calculator};
use thermal_insulation::config::CalculatorConfig;
use thermal_insulation::geometry::Geometry;
use thermal_insulation::material::MaterialCatalog;

const PROCESS_C: f64 = 5.0;
const AMBIENT_C: f64 = 25.0;
const MATERIAL: &str = "Elastomeric foam";

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // optional config path as first argument
    let config = match std::env::args().nth(1) {
        Some(path) => CalculatorConfig::from_file(path)?,
        None => CalculatorConfig::default(),
    };
    let calculator = Calculator::new(MaterialCatalog::builtin()?, config);

    println!(
        "{}",
        format!("❄️ {MATERIAL}: process {PROCESS_C} °C, ambient {AMBIENT_C} °C").bold()
    );

    for geometry in [Geometry::Planar, Geometry::pipe(0.0603), Geometry::pipe(0.1683)] {
        println!("\n{}", format!("{:?}", geometry).cyan());

        for relative_humidity in [50.0, 70.0, 85.0, 95.0] {
            let request =
                CalculationRequest::condensation(MATERIAL, PROCESS_C, AMBIENT_C, relative_humidity)
                    .with_geometry(geometry);

            let report = calculator
                .run_in_background(request)
                .wait_timeout(Duration::from_secs(30))?;

            if let CalculationOutcome::Condensation(cold) = report.outcome {
                let line = match cold.minimum {
                    Some(found) => format!(
                        "{} mm (surface {:.1} °C)",
                        found.thickness_mm(),
                        found.surface_temperature
                    )
                    .green(),
                    None => "cannot prevent condensation up to 500 mm".red(),
                };
                println!(
                    "   RH {relative_humidity:>4.0} %  dew point {:>5.1} °C  →  {}",
                    cold.dew_point, line
                );
            }
        }
    }

    Ok(())
}

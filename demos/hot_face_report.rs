// Cold-face temperature of a 250 °C steam line for every suitable catalog material

use colored::Colorize;
use std::error::Error;
use tracing_subscriber::EnvFilter;

use thermal_insulation::calculator::{CalculationOutcome, CalculationRequest, Calculator};
use thermal_insulation::config::CalculatorConfig;
use thermal_insulation::geometry::Geometry;
use thermal_insulation::material::MaterialCatalog;

const HOT_FACE_C: f64 = 250.0;
const AMBIENT_C: f64 = 30.0;
const LAYERS_M: [f64; 2] = [0.025, 0.026];
const PIPE_DIAMETER_M: f64 = 0.0889;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let catalog = MaterialCatalog::builtin()?;
    let calculator = Calculator::new(catalog, CalculatorConfig::default());

    println!(
        "{}",
        format!(
            "🔥 Hot face {HOT_FACE_C} °C, ambient {AMBIENT_C} °C, layers {:?} m",
            LAYERS_M
        )
        .bold()
    );

    for material in calculator.catalog().iter() {
        println!("\n{}", material.name.cyan().bold());

        for (label, geometry) in [
            ("flat wall", Geometry::Planar),
            ("88.9 mm pipe", Geometry::pipe(PIPE_DIAMETER_M)),
        ] {
            let request =
                CalculationRequest::hot_face(&material.name, HOT_FACE_C, AMBIENT_C, LAYERS_M.to_vec())
                    .with_geometry(geometry);

            let report = match calculator.calculate(&request) {
                Ok(report) => report,
                Err(err) => {
                    println!("   {label:<13} {}", err.to_string().yellow());
                    continue;
                }
            };

            let CalculationOutcome::HotFace(hot) = report.outcome else {
                continue;
            };
            match (hot.solve.cold_face_temperature, hot.solve.flux) {
                (Some(cold_face), Some(flux)) if hot.solve.converged => {
                    println!(
                        "   {label:<13} surface {} °C, loss {:.1} W/m², mean k {:.4} W/m·K",
                        format!("{cold_face:.1}").green(),
                        flux,
                        hot.mean_conductivity.unwrap_or(f64::NAN)
                    );
                    for interface in &hot.interfaces {
                        println!(
                            "   {:<13} between layers {} and {}: {:.1} °C",
                            "",
                            interface.after_layer + 1,
                            interface.after_layer + 2,
                            interface.temperature
                        );
                    }
                }
                _ => {
                    let reason = hot
                        .solve
                        .failure()
                        .map(|err| err.to_string())
                        .unwrap_or_else(|| "did not converge".into());
                    println!("   {label:<13} {}", reason.red());
                }
            }
        }
    }

    Ok(())
}

// Monthly savings of insulating a 250 °C surface, per fuel and thickness

use colored::Colorize;
use std::error::Error;
use tracing_subscriber::EnvFilter;

use thermal_insulation::calculator::Calculator;
use thermal_insulation::config::CalculatorConfig;
use thermal_insulation::material::MaterialCatalog;
use thermal_insulation::savings::{Fuel, OperatingSchedule};
use thermal_insulation::solver::SolveInputs;

const MATERIAL: &str = "Rock wool 100 kg/m3";

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let calculator = Calculator::new(MaterialCatalog::builtin()?, CalculatorConfig::default());
    let schedule = OperatingSchedule {
        area_m2: 10.0,
        hours_per_day: 8.0,
        days_per_week: 5.0,
    };

    println!(
        "{}",
        format!(
            "💰 {MATERIAL}, {} m², {} h/day, {} days/week",
            schedule.area_m2, schedule.hours_per_day, schedule.days_per_week
        )
        .bold()
    );

    for fuel in Fuel::presets() {
        println!(
            "\n{} ({:.3} per useful kWh)",
            fuel.name.cyan().bold(),
            fuel.cost_per_useful_kwh()
        );

        for thickness_mm in [25.0, 51.0, 76.0, 102.0] {
            let inputs = SolveInputs::hot_face(250.0, 30.0, thickness_mm / 1000.0);
            match calculator.estimate_savings(MATERIAL, &inputs, &fuel, &schedule) {
                Ok(estimate) => println!(
                    "   {thickness_mm:>5.0} mm  bare {:.2} kW/m² → {:.3} kW/m²  ({:.1} %)  surface {:.1} °C  saves {}",
                    estimate.bare_loss_kw_m2,
                    estimate.insulated_loss_kw_m2,
                    estimate.reduction_percent,
                    estimate.surface_temperature,
                    format!("{:.2}/month", estimate.monthly_savings).green()
                ),
                Err(err) => println!("   {thickness_mm:>5.0} mm  {}", err.to_string().red()),
            }
        }
    }

    Ok(())
}

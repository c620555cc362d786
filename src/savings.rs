//! Energy and cost saved by insulating a hot surface.

use serde::{Deserialize, Serialize};

use crate::constants::{W_TO_KW, WEEKS_PER_MONTH};
use crate::error::SolveError;
use crate::formula::ConductivityFormula;
use crate::solver::{ColdFaceSolver, SolveInputs};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fuel {
    pub name: String,
    /// Price per purchase unit (kg, m³ or kWh)
    pub unit_price: f64,
    /// kWh released per purchase unit
    pub calorific_value_kwh: f64,
    /// Fraction of the released heat that reaches the process
    pub efficiency: f64,
}

impl Fuel {
    pub fn fuel_oil() -> Self {
        Self {
            name: "Fuel oil (kg)".into(),
            unit_price: 3.50,
            calorific_value_kwh: 11.34,
            efficiency: 0.80,
        }
    }

    pub fn natural_gas() -> Self {
        Self {
            name: "Natural gas (m³)".into(),
            unit_price: 3.60,
            calorific_value_kwh: 9.65,
            efficiency: 0.75,
        }
    }

    pub fn electricity() -> Self {
        Self {
            name: "Electricity (kWh)".into(),
            unit_price: 0.75,
            calorific_value_kwh: 1.00,
            efficiency: 1.00,
        }
    }

    pub fn presets() -> [Fuel; 3] {
        [Self::fuel_oil(), Self::natural_gas(), Self::electricity()]
    }

    pub fn with_unit_price(mut self, unit_price: f64) -> Self {
        self.unit_price = unit_price;
        self
    }

    /// Cost of one kWh delivered to the process.
    pub fn cost_per_useful_kwh(&self) -> f64 {
        self.unit_price / (self.calorific_value_kwh * self.efficiency)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatingSchedule {
    pub area_m2: f64,
    pub hours_per_day: f64,
    pub days_per_week: f64,
}

impl Default for OperatingSchedule {
    fn default() -> Self {
        Self {
            area_m2: 10.0,
            hours_per_day: 8.0,
            days_per_week: 5.0,
        }
    }
}

impl OperatingSchedule {
    pub fn hours_per_month(&self) -> f64 {
        self.hours_per_day * self.days_per_week * WEEKS_PER_MONTH
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SavingsEstimate {
    pub insulated_loss_kw_m2: f64,
    pub bare_loss_kw_m2: f64,
    pub saving_kw_m2: f64,
    pub reduction_percent: f64,
    pub cost_per_kwh: f64,
    pub monthly_savings: f64,
    /// Insulated outer-surface temperature (°C)
    pub surface_temperature: f64,
}

/// Compares the insulated surface against the same surface left bare.
///
/// The bare surface sits at `inputs.inner_face_temperature`; flat walls use
/// the forced-convection plate length as their characteristic length and
/// pipes their bare diameter.
pub fn estimate_savings(
    solver: &ColdFaceSolver,
    inputs: &SolveInputs,
    formula: &ConductivityFormula,
    fuel: &Fuel,
    schedule: &OperatingSchedule,
) -> Result<SavingsEstimate, SolveError> {
    let (surface_temperature, insulated_flux) = solver.solve_with(inputs, formula).into_result()?;

    let bare_length = inputs
        .geometry
        .bare_characteristic_length(solver.convection.params.planar_forced_length);
    let bare_flux = solver.surface_loss(
        inputs.inner_face_temperature,
        inputs.ambient_temperature,
        &inputs.geometry,
        bare_length,
        inputs.wind_speed,
    );

    let insulated_loss_kw_m2 = insulated_flux * W_TO_KW;
    let bare_loss_kw_m2 = bare_flux * W_TO_KW;
    let saving_kw_m2 = bare_loss_kw_m2 - insulated_loss_kw_m2;
    let cost_per_kwh = fuel.cost_per_useful_kwh();

    Ok(SavingsEstimate {
        insulated_loss_kw_m2,
        bare_loss_kw_m2,
        saving_kw_m2,
        reduction_percent: saving_kw_m2 / bare_loss_kw_m2 * 100.0,
        cost_per_kwh,
        monthly_savings: saving_kw_m2 * cost_per_kwh * schedule.area_m2 * schedule.hours_per_month(),
        surface_temperature,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_deviation;
    use approx::assert_relative_eq;
    use more_asserts::{assert_gt, assert_lt};

    #[test]
    fn test_fuel_costs() {
        assert_relative_eq!(Fuel::electricity().cost_per_useful_kwh(), 0.75);
        assert_relative_eq!(
            Fuel::fuel_oil().cost_per_useful_kwh(),
            3.50 / (11.34 * 0.80),
            epsilon = 1e-12
        );
        assert_eq!(Fuel::presets().len(), 3);
        assert_relative_eq!(
            Fuel::natural_gas().with_unit_price(7.2).cost_per_useful_kwh(),
            7.2 / 7.2375,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_insulating_a_steam_wall() {
        let solver = ColdFaceSolver::default();
        let inputs = SolveInputs::hot_face(250.0, 30.0, 0.051);
        let formula = ConductivityFormula::parse("0.035").unwrap();
        let schedule = OperatingSchedule::default();

        let estimate =
            estimate_savings(&solver, &inputs, &formula, &Fuel::electricity(), &schedule).unwrap();

        assert_gt!(estimate.bare_loss_kw_m2, 3.0);
        assert_lt!(estimate.insulated_loss_kw_m2, 0.2);
        assert_gt!(estimate.reduction_percent, 90.0);
        assert_lt!(estimate.reduction_percent, 100.0);
        assert_lt!(estimate.surface_temperature, 250.0);

        let expected = estimate.saving_kw_m2 * 0.75 * 10.0 * 8.0 * 5.0 * 4.33;
        assert_deviation!(estimate.monthly_savings, expected, 1e-9);
    }

    #[test]
    fn test_failed_solve_has_no_estimate() {
        let solver = ColdFaceSolver::default();
        let inputs = SolveInputs::hot_face(250.0, 30.0, 0.051);
        let formula = ConductivityFormula::parse("0.035 - 0.001 * T").unwrap();
        let result = estimate_savings(
            &solver,
            &inputs,
            &formula,
            &Fuel::fuel_oil(),
            &OperatingSchedule::default(),
        );
        assert!(matches!(result, Err(SolveError::NonPhysicalConductivity { .. })));
    }
}

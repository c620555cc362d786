//! Cold-face heat-balance solver.
//!
//! For a given insulation build-up the outer surface settles where heat
//! conducted through the insulation equals heat leaving the surface by
//! convection and radiation. The solver finds the root of
//!
//! ```text
//! residual(T_cold) = q_conduction(T_cold) − (h·(T_cold − T_amb) + ε·σ·(T_cold⁴ − T_amb⁴))
//! ```
//!
//! by walking `T_cold` in fixed steps toward the sign of the residual and
//! halving the step (down to a floor) every time the residual changes sign.
//! The walk needs no derivatives, so any user-authored k(T) works.
//!
//! The same solver serves cold service (process below ambient): the inner
//! face is then the colder side and the residual drives the outer surface
//! down toward the process temperature instead of up.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::conduction::conduction_flux;
use crate::constants::{
    DEFAULT_EMISSIVITY, SOLVER_INITIAL_OFFSET_C, SOLVER_INITIAL_STEP_C, SOLVER_MAX_ITERATIONS,
    SOLVER_MIN_STEP_C, SOLVER_STEP_REDUCTION, SOLVER_TOLERANCE_W_M2, STEFAN_BOLTZMANN_W_M2_K4,
};
use crate::convection::ConvectionCoefficient;
use crate::error::SolveError;
use crate::formula::ConductivityFormula;
use crate::geometry::Geometry;
use crate::math_utils::{reduce_step, sign_changed};
use crate::temp_utils::{celsius_to_kelvin, mean_temperature_c};

/// Iteration controls and surface constants for the solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverParams {
    /// First guess for the cold face, above ambient (°C)
    pub initial_offset: f64,
    pub initial_step: f64,
    pub min_step: f64,
    /// Factor applied to the step on each overshoot
    pub step_reduction: f64,
    /// Accepted |residual| (W/m²)
    pub tolerance: f64,
    pub max_iterations: usize,
    pub emissivity: f64,
    pub stefan_boltzmann: f64,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            initial_offset: SOLVER_INITIAL_OFFSET_C,
            initial_step: SOLVER_INITIAL_STEP_C,
            min_step: SOLVER_MIN_STEP_C,
            step_reduction: SOLVER_STEP_REDUCTION,
            tolerance: SOLVER_TOLERANCE_W_M2,
            max_iterations: SOLVER_MAX_ITERATIONS,
            emissivity: DEFAULT_EMISSIVITY,
            stefan_boltzmann: STEFAN_BOLTZMANN_W_M2_K4,
        }
    }
}

/// Named inputs for one solve.
///
/// `inner_face_temperature` is whatever sits against the insulation: the hot
/// face in hot service, the chilled process in cold service. Use
/// [`SolveInputs::hot_face`] or [`SolveInputs::cold_process`] to make the role
/// explicit at the call site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolveInputs {
    pub inner_face_temperature: f64,
    pub ambient_temperature: f64,
    /// Total insulation thickness (m)
    pub thickness: f64,
    #[serde(default)]
    pub geometry: Geometry,
    /// m/s; below the forced-convection threshold counts as still air
    #[serde(default)]
    pub wind_speed: f64,
}

impl SolveInputs {
    pub fn hot_face(hot_face_temperature: f64, ambient_temperature: f64, thickness: f64) -> Self {
        Self {
            inner_face_temperature: hot_face_temperature,
            ambient_temperature,
            thickness,
            geometry: Geometry::Planar,
            wind_speed: 0.0,
        }
    }

    pub fn cold_process(process_temperature: f64, ambient_temperature: f64, thickness: f64) -> Self {
        Self {
            inner_face_temperature: process_temperature,
            ambient_temperature,
            thickness,
            geometry: Geometry::Planar,
            wind_speed: 0.0,
        }
    }

    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_wind_speed(mut self, wind_speed: f64) -> Self {
        self.wind_speed = wind_speed;
        self
    }

    pub fn with_thickness(mut self, thickness: f64) -> Self {
        self.thickness = thickness;
        self
    }
}

/// Terms of the surface heat balance at one cold-face temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatBalance {
    pub mean_temperature: f64,
    /// k at the mean temperature (W/m·K)
    pub conductivity: f64,
    pub conduction: f64,
    pub convection_coefficient: f64,
    pub convection: f64,
    pub radiation: f64,
    /// convection + radiation (W/m²)
    pub transfer: f64,
    /// conduction − transfer (W/m²)
    pub residual: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SolveState {
    Iterating,
    Converged,
    Failed(SolveError),
}

/// Temperatures and flux of a converged solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalState {
    pub hot_face_temperature: f64,
    pub cold_face_temperature: f64,
    pub ambient_temperature: f64,
    pub flux: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolveResult {
    /// Present on convergence, and after running out of iterations (last value reached)
    pub cold_face_temperature: Option<f64>,
    /// W/m² leaving the outer surface; present only on convergence
    pub flux: Option<f64>,
    pub converged: bool,
    pub iterations: usize,
    pub state: SolveState,
}

impl SolveResult {
    fn converged(cold_face_temperature: f64, flux: f64, iterations: usize) -> Self {
        Self {
            cold_face_temperature: Some(cold_face_temperature),
            flux: Some(flux),
            converged: true,
            iterations,
            state: SolveState::Converged,
        }
    }

    fn failed(error: SolveError, iterations: usize) -> Self {
        let cold_face_temperature = match &error {
            SolveError::MaxIterationsExceeded { last_cold_face_temperature, .. } => {
                Some(*last_cold_face_temperature)
            }
            _ => None,
        };
        Self {
            cold_face_temperature,
            flux: None,
            converged: false,
            iterations,
            state: SolveState::Failed(error),
        }
    }

    pub fn failure(&self) -> Option<&SolveError> {
        match &self.state {
            SolveState::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn thermal_state(&self, inputs: &SolveInputs) -> Option<ThermalState> {
        match (self.converged, self.cold_face_temperature, self.flux) {
            (true, Some(cold_face_temperature), Some(flux)) => Some(ThermalState {
                hot_face_temperature: inputs.inner_face_temperature,
                cold_face_temperature,
                ambient_temperature: inputs.ambient_temperature,
                flux,
            }),
            _ => None,
        }
    }

    /// Converts to a `Result`, for callers that treat non-convergence as an error.
    pub fn into_result(self) -> Result<(f64, f64), SolveError> {
        match self.state {
            SolveState::Failed(error) => Err(error),
            _ => match (self.cold_face_temperature, self.flux) {
                (Some(cold_face_temperature), Some(flux)) => Ok((cold_face_temperature, flux)),
                _ => Err(SolveError::MaxIterationsExceeded {
                    iterations: self.iterations,
                    last_cold_face_temperature: self.cold_face_temperature.unwrap_or(f64::NAN),
                }),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColdFaceSolver {
    pub params: SolverParams,
    pub convection: ConvectionCoefficient,
}

impl ColdFaceSolver {
    pub fn new(params: SolverParams, convection: ConvectionCoefficient) -> Self {
        Self { params, convection }
    }

    /// ε·σ·(T_s⁴ − T_amb⁴) in W/m², temperatures in °C.
    pub fn radiative_flux(&self, surface_temperature: f64, ambient_temperature: f64) -> f64 {
        self.params.emissivity
            * self.params.stefan_boltzmann
            * (celsius_to_kelvin(surface_temperature).powi(4)
                - celsius_to_kelvin(ambient_temperature).powi(4))
    }

    /// Convection plus radiation leaving a surface (W/m²).
    pub fn surface_loss(
        &self,
        surface_temperature: f64,
        ambient_temperature: f64,
        geometry: &Geometry,
        outer_characteristic_length: f64,
        wind_speed: f64,
    ) -> f64 {
        let h = self.convection.compute(
            surface_temperature,
            ambient_temperature,
            geometry,
            outer_characteristic_length,
            wind_speed,
        );
        h * (surface_temperature - ambient_temperature)
            + self.radiative_flux(surface_temperature, ambient_temperature)
    }

    /// Evaluates every term of the balance at a trial cold-face temperature.
    pub fn heat_balance(
        &self,
        inputs: &SolveInputs,
        formula: &ConductivityFormula,
        cold_face_temperature: f64,
    ) -> Result<HeatBalance, SolveError> {
        let mean_temperature =
            mean_temperature_c(inputs.inner_face_temperature, cold_face_temperature);
        let conductivity = formula.conductivity_at(mean_temperature)?;
        if !(conductivity > 0.0) {
            return Err(SolveError::NonPhysicalConductivity {
                conductivity,
                mean_temperature,
            });
        }

        let conduction = conduction_flux(
            conductivity,
            inputs.inner_face_temperature,
            cold_face_temperature,
            inputs.thickness,
            &inputs.geometry,
        )?;

        let convection_coefficient = self.convection.compute(
            cold_face_temperature,
            inputs.ambient_temperature,
            &inputs.geometry,
            conduction.outer_characteristic_length,
            inputs.wind_speed,
        );
        let convection = convection_coefficient * (cold_face_temperature - inputs.ambient_temperature);
        let radiation = self.radiative_flux(cold_face_temperature, inputs.ambient_temperature);
        let transfer = convection + radiation;

        Ok(HeatBalance {
            mean_temperature,
            conductivity,
            conduction: conduction.flux,
            convection_coefficient,
            convection,
            radiation,
            transfer,
            residual: conduction.flux - transfer,
        })
    }

    /// Parses `conductivity_formula` and solves; a bad formula is a failed solve.
    pub fn solve(&self, inputs: &SolveInputs, conductivity_formula: &str) -> SolveResult {
        match ConductivityFormula::parse(conductivity_formula) {
            Ok(formula) => self.solve_with(inputs, &formula),
            Err(error) => {
                debug!(formula = conductivity_formula, %error, "conductivity formula rejected");
                SolveResult::failed(error.into(), 0)
            }
        }
    }

    pub fn solve_with(&self, inputs: &SolveInputs, formula: &ConductivityFormula) -> SolveResult {
        let params = &self.params;
        let mut cold_face = inputs.ambient_temperature + params.initial_offset;
        let mut step = params.initial_step;
        let mut previous_residual: Option<f64> = None;

        for iteration in 1..=params.max_iterations {
            let balance = match self.heat_balance(inputs, formula, cold_face) {
                Ok(balance) => balance,
                Err(error) => {
                    debug!(iteration, cold_face, %error, "cold-face solve failed");
                    return SolveResult::failed(error, iteration);
                }
            };

            trace!(
                iteration,
                cold_face,
                step,
                conductivity = balance.conductivity,
                residual = balance.residual,
                "heat balance"
            );

            if balance.residual.abs() < params.tolerance {
                debug!(
                    iteration,
                    cold_face,
                    flux = balance.transfer,
                    "cold-face solve converged"
                );
                return SolveResult::converged(cold_face, balance.transfer, iteration);
            }

            if sign_changed(previous_residual, balance.residual) {
                step = reduce_step(step, params.step_reduction, params.min_step);
            }
            cold_face += if balance.residual > 0.0 { step } else { -step };
            previous_residual = Some(balance.residual);
        }

        debug!(
            iterations = params.max_iterations,
            cold_face, "cold-face solve ran out of iterations"
        );
        SolveResult::failed(
            SolveError::MaxIterationsExceeded {
                iterations: params.max_iterations,
                last_cold_face_temperature: cold_face,
            },
            params.max_iterations,
        )
    }
}

//! Minimum insulation thickness that keeps a chilled surface above the dew point.
//!
//! Candidates are swept in ascending order, so the first one that passes is
//! the minimum at the sweep resolution.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{MM_PER_M, SEARCH_MAX_THICKNESS_M, SEARCH_STEP_M};
use crate::error::SearchError;
use crate::formula::ConductivityFormula;
use crate::solver::{ColdFaceSolver, SolveInputs};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Sweep resolution and smallest candidate (m)
    pub step: f64,
    /// Largest candidate (m)
    pub max_thickness: f64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            step: SEARCH_STEP_M,
            max_thickness: SEARCH_MAX_THICKNESS_M,
        }
    }
}

impl SearchParams {
    pub fn candidate_count(&self) -> usize {
        if !(self.step > 0.0) || !(self.max_thickness > 0.0) {
            return 0;
        }
        (self.max_thickness / self.step).round() as usize
    }

    /// The `index`-th candidate, counting from 1.
    pub fn candidate(&self, index: usize) -> f64 {
        index as f64 * self.step
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThicknessFound {
    pub thickness: f64,
    pub surface_temperature: f64,
    pub flux: f64,
    pub candidates_evaluated: usize,
}

impl ThicknessFound {
    pub fn thickness_mm(&self) -> f64 {
        (self.thickness * MM_PER_M).round()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThicknessSearch {
    pub params: SearchParams,
    pub solver: ColdFaceSolver,
}

impl ThicknessSearch {
    pub fn new(params: SearchParams, solver: ColdFaceSolver) -> Self {
        Self { params, solver }
    }

    /// Sweeps thickness for a cold-service surface.
    ///
    /// `inputs.inner_face_temperature` is the process temperature and
    /// `inputs.thickness` is ignored. A candidate passes when its solve
    /// converges with the surface at or above `dew_point`; failed solves
    /// count as not passing.
    pub fn minimum_thickness(
        &self,
        inputs: &SolveInputs,
        dew_point: f64,
        conductivity_formula: &str,
    ) -> Result<ThicknessFound, SearchError> {
        let formula = ConductivityFormula::parse(conductivity_formula)?;
        self.minimum_thickness_with(inputs, dew_point, &formula)
    }

    pub fn minimum_thickness_with(
        &self,
        inputs: &SolveInputs,
        dew_point: f64,
        formula: &ConductivityFormula,
    ) -> Result<ThicknessFound, SearchError> {
        for index in 1..=self.params.candidate_count() {
            let thickness = self.params.candidate(index);
            let result = self
                .solver
                .solve_with(&inputs.with_thickness(thickness), formula);

            match (result.converged, result.cold_face_temperature, result.flux) {
                (true, Some(surface), Some(flux)) if surface >= dew_point => {
                    debug!(thickness, surface, dew_point, "thickness accepted");
                    return Ok(ThicknessFound {
                        thickness,
                        surface_temperature: surface,
                        flux,
                        candidates_evaluated: index,
                    });
                }
                _ => {
                    debug!(
                        thickness,
                        surface = ?result.cold_face_temperature,
                        converged = result.converged,
                        dew_point,
                        "thickness rejected"
                    );
                }
            }
        }

        Err(SearchError::NotFoundInRange {
            max_thickness: self.params.max_thickness,
        })
    }
}

//! Request/response surface over the solver and the thickness search.
//!
//! A [`CalculationRequest`] names a catalog material and one of two modes:
//! sizing check of a hot surface, or the minimum thickness that keeps a cold
//! surface dry. Requests are validated against the material and the physics
//! preconditions before any numerical work starts.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::CalculatorConfig;
use crate::error::{CalculationError, SearchError};
use crate::geometry::Geometry;
use crate::layers::{InterfaceTemperature, interface_temperatures};
use crate::material::{Material, MaterialCatalog};
use crate::savings::{self, Fuel, OperatingSchedule, SavingsEstimate};
use crate::solver::{SolveInputs, SolveResult};
use crate::temp_utils::{dew_point_c, mean_temperature_c};
use crate::thickness_search::ThicknessFound;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CalculationMode {
    /// Outer-surface temperature of a hot surface insulated with one or more
    /// layers of the same material (thicknesses in m, hot side first).
    HotFace {
        hot_face_temperature: f64,
        layer_thicknesses: Vec<f64>,
    },
    /// Minimum thickness keeping a chilled surface above the dew point.
    Condensation {
        process_temperature: f64,
        relative_humidity: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub material: String,
    #[serde(default)]
    pub geometry: Geometry,
    pub ambient_temperature: f64,
    #[serde(default)]
    pub wind_speed: f64,
    #[serde(flatten)]
    pub mode: CalculationMode,
}

impl CalculationRequest {
    pub fn hot_face(
        material: impl Into<String>,
        hot_face_temperature: f64,
        ambient_temperature: f64,
        layer_thicknesses: Vec<f64>,
    ) -> Self {
        Self {
            material: material.into(),
            geometry: Geometry::Planar,
            ambient_temperature,
            wind_speed: 0.0,
            mode: CalculationMode::HotFace {
                hot_face_temperature,
                layer_thicknesses,
            },
        }
    }

    pub fn condensation(
        material: impl Into<String>,
        process_temperature: f64,
        ambient_temperature: f64,
        relative_humidity: f64,
    ) -> Self {
        Self {
            material: material.into(),
            geometry: Geometry::Planar,
            ambient_temperature,
            wind_speed: 0.0,
            mode: CalculationMode::Condensation {
                process_temperature,
                relative_humidity,
            },
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

    /// Temperature the material must be rated for.
    pub fn operating_temperature(&self) -> f64 {
        match &self.mode {
            CalculationMode::HotFace {
                hot_face_temperature,
                ..
            } => *hot_face_temperature,
            CalculationMode::Condensation {
                process_temperature,
                ..
            } => *process_temperature,
        }
    }

    /// Preconditions that must hold before solving.
    ///
    /// The warm side must be strictly warmer than the cold side: the hot
    /// face in hot mode, ambient air in condensation mode.
    pub fn validate(&self, material: &Material) -> Result<(), CalculationError> {
        if !(self.wind_speed >= 0.0) || !self.wind_speed.is_finite() {
            return Err(CalculationError::InvalidWindSpeed {
                wind_speed: self.wind_speed,
            });
        }

        match &self.mode {
            CalculationMode::HotFace {
                hot_face_temperature,
                layer_thicknesses,
            } => {
                if !(*hot_face_temperature > self.ambient_temperature) {
                    return Err(CalculationError::InvalidTemperatures {
                        hot: *hot_face_temperature,
                        cold: self.ambient_temperature,
                    });
                }
                if layer_thicknesses.is_empty() || layer_thicknesses.iter().any(|l| !(*l > 0.0)) {
                    return Err(CalculationError::InvalidThickness {
                        thicknesses: layer_thicknesses.clone(),
                    });
                }
                self.geometry.validate(layer_thicknesses.iter().sum())?;
            }
            CalculationMode::Condensation {
                process_temperature,
                relative_humidity,
            } => {
                if !(self.ambient_temperature > *process_temperature) {
                    return Err(CalculationError::InvalidTemperatures {
                        hot: self.ambient_temperature,
                        cold: *process_temperature,
                    });
                }
                if !(*relative_humidity > 0.0 && *relative_humidity <= 100.0) {
                    return Err(CalculationError::InvalidHumidity {
                        relative_humidity: *relative_humidity,
                    });
                }
                self.geometry.validate_shape()?;
            }
        }

        material.check_operating_range(self.operating_temperature())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HotFaceReport {
    pub total_thickness: f64,
    pub solve: SolveResult,
    /// k at the converged mean temperature
    pub mean_conductivity: Option<f64>,
    /// Boundaries between layers, empty for a single layer or a failed solve
    pub interfaces: Vec<InterfaceTemperature>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CondensationReport {
    pub dew_point: f64,
    /// `None` when no thickness in the search range keeps the surface dry
    pub minimum: Option<ThicknessFound>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CalculationOutcome {
    HotFace(HotFaceReport),
    Condensation(CondensationReport),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalculationReport {
    pub material: Material,
    pub outcome: CalculationOutcome,
}

/// Runs requests against a catalog snapshot.
#[derive(Debug, Clone)]
pub struct Calculator {
    config: CalculatorConfig,
    catalog: Arc<MaterialCatalog>,
}

impl Calculator {
    pub fn new(catalog: MaterialCatalog, config: CalculatorConfig) -> Self {
        Self {
            config,
            catalog: Arc::new(catalog),
        }
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    pub fn catalog(&self) -> &MaterialCatalog {
        &self.catalog
    }

    /// Swaps in a refreshed catalog; work already running keeps its snapshot.
    pub fn replace_catalog(&mut self, catalog: MaterialCatalog) {
        self.catalog = Arc::new(catalog);
    }

    /// Re-reads the catalog file behind the current snapshot.
    ///
    /// On failure the previous snapshot stays in place.
    pub fn reload_catalog(&mut self) -> Result<(), CalculationError> {
        let mut catalog = MaterialCatalog::clone(&self.catalog);
        catalog.reload()?;
        info!(materials = catalog.len(), "catalog reloaded");
        self.catalog = Arc::new(catalog);
        Ok(())
    }

    pub fn calculate(
        &self,
        request: &CalculationRequest,
    ) -> Result<CalculationReport, CalculationError> {
        let material = self.catalog.require(&request.material)?;
        request.validate(material)?;
        let formula = material.parsed_formula()?;

        let outcome = match &request.mode {
            CalculationMode::HotFace {
                hot_face_temperature,
                layer_thicknesses,
            } => {
                let total_thickness: f64 = layer_thicknesses.iter().sum();
                let inputs = SolveInputs::hot_face(
                    *hot_face_temperature,
                    request.ambient_temperature,
                    total_thickness,
                )
                .with_geometry(request.geometry)
                .with_wind_speed(request.wind_speed);

                let solve = self.config.solver().solve_with(&inputs, &formula);
                let (mean_conductivity, interfaces) = match solve.thermal_state(&inputs) {
                    Some(state) => {
                        let k = formula.conductivity_at(mean_temperature_c(
                            state.hot_face_temperature,
                            state.cold_face_temperature,
                        ))?;
                        let interfaces = interface_temperatures(
                            state.hot_face_temperature,
                            state.flux,
                            k,
                            layer_thicknesses,
                        );
                        (Some(k), interfaces)
                    }
                    None => (None, Vec::new()),
                };

                info!(
                    material = %material.name,
                    converged = solve.converged,
                    cold_face = ?solve.cold_face_temperature,
                    flux = ?solve.flux,
                    "hot-face calculation finished"
                );
                CalculationOutcome::HotFace(HotFaceReport {
                    total_thickness,
                    solve,
                    mean_conductivity,
                    interfaces,
                })
            }
            CalculationMode::Condensation {
                process_temperature,
                relative_humidity,
            } => {
                let dew_point = dew_point_c(request.ambient_temperature, *relative_humidity);
                debug!(dew_point, "dew point");

                let inputs =
                    SolveInputs::cold_process(*process_temperature, request.ambient_temperature, 0.0)
                        .with_geometry(request.geometry)
                        .with_wind_speed(request.wind_speed);

                let minimum = match self
                    .config
                    .thickness_search()
                    .minimum_thickness_with(&inputs, dew_point, &formula)
                {
                    Ok(found) => Some(found),
                    Err(SearchError::NotFoundInRange { .. }) => None,
                    Err(err) => return Err(err.into()),
                };

                info!(
                    material = %material.name,
                    dew_point,
                    thickness = ?minimum.map(|found| found.thickness),
                    "condensation calculation finished"
                );
                CalculationOutcome::Condensation(CondensationReport { dew_point, minimum })
            }
        };

        Ok(CalculationReport {
            material: material.clone(),
            outcome,
        })
    }

    /// Monthly savings of insulating a hot surface with a catalog material.
    pub fn estimate_savings(
        &self,
        material: &str,
        inputs: &SolveInputs,
        fuel: &Fuel,
        schedule: &OperatingSchedule,
    ) -> Result<SavingsEstimate, CalculationError> {
        let material = self.catalog.require(material)?;
        if !(inputs.inner_face_temperature > inputs.ambient_temperature) {
            return Err(CalculationError::InvalidTemperatures {
                hot: inputs.inner_face_temperature,
                cold: inputs.ambient_temperature,
            });
        }
        material.check_operating_range(inputs.inner_face_temperature)?;
        let formula = material.parsed_formula()?;

        let estimate =
            savings::estimate_savings(&self.config.solver(), inputs, &formula, fuel, schedule)?;
        info!(
            material = %material.name,
            fuel = %fuel.name,
            monthly_savings = estimate.monthly_savings,
            "savings estimate finished"
        );
        Ok(estimate)
    }

    /// Runs the request on a worker thread.
    ///
    /// The worker owns a clone of the calculator, so the caller is free to
    /// drop or reconfigure its own copy in the meantime.
    pub fn run_in_background(&self, request: CalculationRequest) -> CalculationHandle {
        let (sender, receiver) = mpsc::channel();
        let calculator = self.clone();
        thread::spawn(move || {
            let result = calculator.calculate(&request);
            // the caller may have stopped waiting
            let _ = sender.send(result);
        });
        CalculationHandle { receiver }
    }
}

/// Single-result channel from a background calculation.
pub struct CalculationHandle {
    receiver: Receiver<Result<CalculationReport, CalculationError>>,
}

impl CalculationHandle {
    pub fn wait(self) -> Result<CalculationReport, CalculationError> {
        self.receiver
            .recv()
            .map_err(|_| CalculationError::WorkerDisconnected)?
    }

    /// Waits at most `timeout`; the worker keeps running to completion
    /// even when the caller gives up.
    pub fn wait_timeout(self, timeout: Duration) -> Result<CalculationReport, CalculationError> {
        match self.receiver.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(CalculationError::TimedOut {
                seconds: timeout.as_secs_f64(),
            }),
            Err(RecvTimeoutError::Disconnected) => Err(CalculationError::WorkerDisconnected),
        }
    }
}

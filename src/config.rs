use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::convection::{ConvectionCoefficient, ConvectionParams};
use crate::error::ConfigError;
use crate::solver::{ColdFaceSolver, SolverParams};
use crate::thickness_search::{SearchParams, ThicknessSearch};

/// Every numerical tunable of a calculation, in one serde document.
///
/// Missing sections and fields fall back to their defaults, so
/// `{"solver": {"tolerance": 0.1}}` is a complete config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    pub solver: SolverParams,
    pub convection: ConvectionParams,
    pub search: SearchParams,
}

impl CalculatorConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn solver(&self) -> ColdFaceSolver {
        ColdFaceSolver::new(self.solver, ConvectionCoefficient::new(self.convection))
    }

    pub fn thickness_search(&self) -> ThicknessSearch {
        ThicknessSearch::new(self.search, self.solver())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config = CalculatorConfig::from_json_str(
            r#"{"solver": {"tolerance": 0.1}, "search": {"max_thickness": 0.2}}"#,
        )
        .unwrap();

        assert_eq!(config.solver.tolerance, 0.1);
        assert_eq!(config.solver.max_iterations, 1000);
        assert_eq!(config.search.max_thickness, 0.2);
        assert_eq!(config.search.step, 0.001);
        assert_eq!(config.convection, ConvectionParams::default());
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(
            CalculatorConfig::from_json_str("{}").unwrap(),
            CalculatorConfig::default()
        );
    }

    #[test]
    fn test_components_carry_config() {
        let mut config = CalculatorConfig::default();
        config.solver.emissivity = 0.3;
        config.convection.forced_min_wind_speed = 2.0;

        let search = config.thickness_search();
        assert_eq!(search.solver.params.emissivity, 0.3);
        assert_eq!(search.solver.convection.params.forced_min_wind_speed, 2.0);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            CalculatorConfig::from_file("/no/such/config.json"),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_round_trip_through_json() {
        let json = serde_json::to_string(&CalculatorConfig::default()).unwrap();
        assert!(json.contains("\"max_iterations\":1000"));
    }
}

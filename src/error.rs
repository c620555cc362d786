use thiserror::Error;

/// Failures while parsing or evaluating a conductivity formula.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    #[error("formula is empty")]
    Empty,

    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedChar { ch: char, position: usize },

    #[error("unexpected token '{token}' at position {position}")]
    UnexpectedToken { token: String, position: usize },

    #[error("formula ended unexpectedly")]
    UnexpectedEnd,

    #[error("invalid number literal '{text}'")]
    InvalidNumber { text: String },

    #[error("unknown name '{name}' (only T, pi and e are defined)")]
    UnknownName { name: String },

    #[error("unknown function '{name}'")]
    UnknownFunction { name: String },

    #[error("formula nests deeper than {limit} levels")]
    TooDeep { limit: usize },

    /// Division by zero, log of a negative number, overflow and the like.
    #[error("formula evaluates to {value} at T = {temperature} °C")]
    NonFinite { value: f64, temperature: f64 },
}

/// Invalid insulation geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("inner radius must be positive, got {inner_radius} m")]
    NonPositiveInnerRadius { inner_radius: f64 },

    #[error("insulation thickness must be positive, got {thickness} m")]
    NonPositiveThickness { thickness: f64 },
}

/// Why a cold-face solve stopped without converging.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error("conductivity unavailable: {0}")]
    Formula(#[from] FormulaError),

    #[error("non-physical conductivity {conductivity} W/m·K at mean temperature {mean_temperature} °C")]
    NonPhysicalConductivity {
        conductivity: f64,
        mean_temperature: f64,
    },

    #[error("invalid geometry: {0}")]
    Geometry(#[from] GeometryError),

    #[error("no convergence after {iterations} iterations (last cold face {last_cold_face_temperature:.2} °C)")]
    MaxIterationsExceeded {
        iterations: usize,
        last_cold_face_temperature: f64,
    },
}

/// Outcome of a thickness sweep that found nothing usable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    #[error("conductivity unavailable: {0}")]
    Formula(#[from] FormulaError),

    #[error("cannot prevent condensation with up to {max_thickness} m of insulation")]
    NotFoundInRange { max_thickness: f64 },
}

/// Errors reading or assembling the material catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("material '{name}' already exists")]
    DuplicateMaterial { name: String },

    #[error("material name and conductivity formula are required")]
    MissingField,
}

/// Errors reading a calculator configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Request-level failures reported by the calculator.
#[derive(Debug, Error)]
pub enum CalculationError {
    #[error("unknown material '{name}'")]
    UnknownMaterial { name: String },

    #[error("hot side {hot} °C must be above cold side {cold} °C")]
    InvalidTemperatures { hot: f64, cold: f64 },

    #[error("{temperature} °C is outside the operating range of '{material}' ({min} to {max} °C)")]
    OutOfOperatingRange {
        material: String,
        temperature: f64,
        min: f64,
        max: f64,
    },

    #[error("relative humidity must be within (0, 100] %, got {relative_humidity}")]
    InvalidHumidity { relative_humidity: f64 },

    #[error("layer thicknesses must be positive and at least one layer given, got {thicknesses:?}")]
    InvalidThickness { thicknesses: Vec<f64> },

    #[error("wind speed must be non-negative, got {wind_speed} m/s")]
    InvalidWindSpeed { wind_speed: f64 },

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Formula(#[from] FormulaError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Solve(#[from] SolveError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("calculation worker stopped before reporting a result")]
    WorkerDisconnected,

    #[error("calculation did not finish within {seconds:.1} s")]
    TimedOut { seconds: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_values() {
        let err = SolveError::NonPhysicalConductivity {
            conductivity: -0.01,
            mean_temperature: 140.0,
        };
        let message = err.to_string();
        assert!(message.contains("-0.01"));
        assert!(message.contains("140"));

        let err = SearchError::NotFoundInRange { max_thickness: 0.5 };
        assert!(err.to_string().contains("0.5 m"));
    }

    #[test]
    fn test_formula_error_converts_into_solve_error() {
        let err: SolveError = FormulaError::UnknownName { name: "foo".into() }.into();
        assert!(matches!(err, SolveError::Formula(FormulaError::UnknownName { .. })));
    }
}

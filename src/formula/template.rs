//! Authoring templates for the conductivity models engineers usually enter.

use serde::{Deserialize, Serialize};

use crate::error::FormulaError;
use crate::formula::ConductivityFormula;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum FormulaTemplate {
    /// k = k0
    Constant { k0: f64 },
    /// k = k0 + k1·T
    Linear { k0: f64, k1: f64 },
    /// k = k0 + k1·T + k2·T² + k3·T³ + k4·T⁴
    Polynomial { coefficients: [f64; 5] },
    /// k = a·exp(b·T)
    Exponential { a: f64, b: f64 },
}

impl FormulaTemplate {
    /// Formula text in the catalog's expression language.
    pub fn to_formula_string(&self) -> String {
        match self {
            FormulaTemplate::Constant { k0 } => format!("{}", k0),
            FormulaTemplate::Linear { k0, k1 } => format!("{} + {} * T", k0, k1),
            FormulaTemplate::Polynomial { coefficients: [k0, k1, k2, k3, k4] } => format!(
                "{} + {}*T + {}*T**2 + {}*T**3 + {}*T**4",
                k0, k1, k2, k3, k4
            ),
            FormulaTemplate::Exponential { a, b } => format!("{} * math.exp({} * T)", a, b),
        }
    }

    pub fn to_formula(&self) -> Result<ConductivityFormula, FormulaError> {
        ConductivityFormula::parse(&self.to_formula_string())
    }
}

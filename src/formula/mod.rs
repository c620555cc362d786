//! Temperature-dependent conductivity formulas.
//!
//! Catalog entries carry k(T) as user-authored text. The text is parsed by a
//! sandboxed arithmetic parser bound to the single variable `T` and a fixed
//! set of math functions; nothing in it can reach outside the expression.

pub mod ast;
pub mod parser;
pub mod template;

pub use template::FormulaTemplate;

use std::fmt;
use std::str::FromStr;

use crate::error::FormulaError;
use ast::Expr;

/// Replaces decimal commas ("0,035") with periods.
///
/// Applied to the whole text, so commas can never act as argument
/// separators in this language.
pub fn normalize_decimal_commas(text: &str) -> String {
    text.replace(',', ".")
}

/// A parsed conductivity formula, k(T) in W/m·K with T the mean temperature in °C.
#[derive(Debug, Clone, PartialEq)]
pub struct ConductivityFormula {
    source: String,
    expr: Expr,
}

impl ConductivityFormula {
    pub fn parse(text: &str) -> Result<Self, FormulaError> {
        let normalized = normalize_decimal_commas(text);
        let expr = parser::parse(&normalized)?;
        Ok(Self {
            source: text.to_string(),
            expr,
        })
    }

    /// The formula text as authored, before comma normalization.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_constant(&self) -> bool {
        self.expr.is_constant()
    }

    /// Conductivity at `mean_temperature`.
    ///
    /// Non-finite results (division by zero, log of a negative value) are
    /// reported as errors, never returned.
    pub fn conductivity_at(&self, mean_temperature: f64) -> Result<f64, FormulaError> {
        let value = self.expr.eval(mean_temperature);
        if value.is_finite() {
            Ok(value)
        } else {
            Err(FormulaError::NonFinite {
                value,
                temperature: mean_temperature,
            })
        }
    }
}

impl FromStr for ConductivityFormula {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ConductivityFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// One-shot evaluation of formula text at a mean temperature.
pub fn evaluate(formula: &str, mean_temperature: f64) -> Result<f64, FormulaError> {
    ConductivityFormula::parse(formula)?.conductivity_at(mean_temperature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_decimal_comma_normalization() {
        assert_eq!(normalize_decimal_commas("0,035 + 0,0001 * T"), "0.035 + 0.0001 * T");
        assert_relative_eq!(evaluate("0,035", 120.0).unwrap(), 0.035);
        assert_relative_eq!(evaluate("0,030 + 0,0001 * T", 100.0).unwrap(), 0.04, epsilon = 1e-12);
    }

    #[test]
    fn test_authoring_forms() {
        // constant
        assert_relative_eq!(evaluate("0.035", 0.0).unwrap(), 0.035);
        // polynomial with `**` powers
        let k = evaluate("0.025 + 0.0001*T + 1e-7*T**2 + 0.0*T**3 + 0.0*T**4", 100.0).unwrap();
        assert_relative_eq!(k, 0.025 + 0.01 + 0.001, epsilon = 1e-12);
        // exponential through the math namespace
        let k = evaluate("0.0387 * math.exp(0.0019 * T)", 100.0).unwrap();
        assert_relative_eq!(k, 0.0387 * (0.19_f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_undefined_name_is_a_formula_error() {
        let err = evaluate("0.035 + foo * T", 50.0).unwrap_err();
        assert_eq!(err, FormulaError::UnknownName { name: "foo".into() });
    }

    #[test]
    fn test_non_finite_value_is_a_formula_error() {
        let formula = ConductivityFormula::parse("0.04 / (T - 100)").unwrap();
        assert!(formula.conductivity_at(50.0).is_ok());
        assert!(matches!(
            formula.conductivity_at(100.0),
            Err(FormulaError::NonFinite { .. })
        ));

        let formula = ConductivityFormula::parse("math.log(T)").unwrap();
        assert!(formula.conductivity_at(-5.0).is_err());
    }

    #[test]
    fn test_source_is_kept_verbatim() {
        let formula: ConductivityFormula = "0,035".parse().unwrap();
        assert_eq!(formula.source(), "0,035");
        assert_eq!(formula.to_string(), "0,035");
        assert!(formula.is_constant());
    }
}

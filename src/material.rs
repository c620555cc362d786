// src/material.rs - insulation materials and the catalog they are selected from

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{CalculationError, CatalogError, FormulaError};
use crate::formula::{ConductivityFormula, FormulaTemplate};
use crate::json_parser::JsonParser;

const BUILTIN_CATALOG: &str = include_str!("materials.json");

/// One catalog row: a conductivity model plus the temperatures it is rated for.
///
/// Rows without `t_min`/`t_max` are the legacy variant and are accepted at
/// any operating temperature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    #[serde(alias = "nome")]
    pub name: String,
    /// k(T) in W/m·K with T the mean insulation temperature in °C
    #[serde(rename = "k_func", alias = "conductivity_formula")]
    pub conductivity_formula: String,
    #[serde(default, alias = "T_min", skip_serializing_if = "Option::is_none")]
    pub t_min: Option<f64>,
    #[serde(default, alias = "T_max", skip_serializing_if = "Option::is_none")]
    pub t_max: Option<f64>,
}

impl Material {
    pub fn new(name: impl Into<String>, conductivity_formula: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            conductivity_formula: conductivity_formula.into(),
            t_min: None,
            t_max: None,
        }
    }

    pub fn from_template(name: impl Into<String>, template: &FormulaTemplate) -> Self {
        Self::new(name, template.to_formula_string())
    }

    pub fn with_operating_range(mut self, t_min: f64, t_max: f64) -> Self {
        self.t_min = Some(t_min);
        self.t_max = Some(t_max);
        self
    }

    pub fn is_legacy(&self) -> bool {
        self.t_min.is_none() && self.t_max.is_none()
    }

    /// (min, max) in °C; a missing bound is open.
    pub fn operating_range(&self) -> Option<(f64, f64)> {
        if self.is_legacy() {
            return None;
        }
        Some((
            self.t_min.unwrap_or(f64::NEG_INFINITY),
            self.t_max.unwrap_or(f64::INFINITY),
        ))
    }

    pub fn parsed_formula(&self) -> Result<ConductivityFormula, FormulaError> {
        ConductivityFormula::parse(&self.conductivity_formula)
    }

    pub fn check_operating_range(&self, temperature: f64) -> Result<(), CalculationError> {
        match self.operating_range() {
            Some((min, max)) if !(min..=max).contains(&temperature) => {
                Err(CalculationError::OutOfOperatingRange {
                    material: self.name.clone(),
                    temperature,
                    min,
                    max,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Read-only snapshot of the available insulation materials, ordered by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialCatalog {
    materials: BTreeMap<String, Material>,
    source: Option<PathBuf>,
}

impl MaterialCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog bundled with the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, CatalogError> {
        let rows: Vec<Material> = serde_json::from_value(value)?;
        let mut catalog = Self::new();
        for material in rows {
            if material.is_legacy() {
                warn!(material = %material.name, "catalog row has no operating range");
            }
            catalog.insert(material)?;
        }
        Ok(catalog)
    }

    /// Loads a catalog file through the shared JSON cache.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let value = JsonParser::load_json(path.as_ref())?;
        let mut catalog = Self::from_value(value)?;
        catalog.source = Some(path.as_ref().to_path_buf());
        debug!(path = %path.as_ref().display(), materials = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    /// Re-reads the backing file after it was changed elsewhere.
    ///
    /// Catalogs assembled in memory have nothing to refresh.
    pub fn reload(&mut self) -> Result<(), CatalogError> {
        if let Some(path) = self.source.clone() {
            JsonParser::invalidate(&path);
            *self = Self::load(&path)?;
        }
        Ok(())
    }

    pub fn insert(&mut self, material: Material) -> Result<(), CatalogError> {
        if material.name.trim().is_empty() || material.conductivity_formula.trim().is_empty() {
            return Err(CatalogError::MissingField);
        }
        if self.materials.contains_key(&material.name) {
            return Err(CatalogError::DuplicateMaterial {
                name: material.name,
            });
        }
        self.materials.insert(material.name.clone(), material);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Material> {
        self.materials.get(name)
    }

    pub fn require(&self, name: &str) -> Result<&Material, CalculationError> {
        self.get(name).ok_or_else(|| CalculationError::UnknownMaterial {
            name: name.to_string(),
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.materials.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.values()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

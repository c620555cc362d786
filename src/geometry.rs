use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// Shape of the insulated surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Geometry {
    /// Flat wall, duct or vessel side.
    #[default]
    Planar,
    /// Pipe; `inner_diameter` is the outer diameter of the bare pipe in meters.
    Cylindrical { inner_diameter: f64 },
}

impl Geometry {
    pub fn pipe(inner_diameter: f64) -> Self {
        Geometry::Cylindrical { inner_diameter }
    }

    /// Radii (inner, outer) of the insulation sleeve for a cylinder.
    pub fn radii(inner_diameter: f64, thickness: f64) -> Result<(f64, f64), GeometryError> {
        let r_inner = inner_diameter / 2.0;
        let r_outer = r_inner + thickness;
        if !(r_inner > 0.0) {
            return Err(GeometryError::NonPositiveInnerRadius { inner_radius: r_inner });
        }
        if !(r_outer > r_inner) {
            return Err(GeometryError::NonPositiveThickness { thickness });
        }
        Ok((r_inner, r_outer))
    }

    /// Checks the geometry is usable with the given insulation thickness.
    pub fn validate(&self, thickness: f64) -> Result<(), GeometryError> {
        match self {
            Geometry::Planar if !(thickness > 0.0) => {
                Err(GeometryError::NonPositiveThickness { thickness })
            }
            Geometry::Planar => Ok(()),
            Geometry::Cylindrical { inner_diameter } => {
                Geometry::radii(*inner_diameter, thickness).map(|_| ())
            }
        }
    }

    /// Checks the bare surface alone, before any thickness is chosen.
    pub fn validate_shape(&self) -> Result<(), GeometryError> {
        match self {
            Geometry::Cylindrical { inner_diameter } if !(*inner_diameter > 0.0) => {
                Err(GeometryError::NonPositiveInnerRadius {
                    inner_radius: inner_diameter / 2.0,
                })
            }
            _ => Ok(()),
        }
    }

    /// Characteristic length of the bare (uninsulated) surface.
    pub fn bare_characteristic_length(&self, planar_length: f64) -> f64 {
        match self {
            Geometry::Planar => planar_length,
            Geometry::Cylindrical { inner_diameter } => *inner_diameter,
        }
    }
}

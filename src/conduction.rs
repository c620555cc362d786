//! Steady conduction through the insulation layer.
//!
//! Flux is always expressed per unit *outer* surface area so it can be
//! balanced directly against convection and radiation leaving that surface.

use crate::error::GeometryError;
use crate::geometry::Geometry;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConductionFlux {
    /// W/m² of outer surface; negative when heat flows inward
    pub flux: f64,
    /// Thickness for flat surfaces, outer diameter for cylinders (m)
    pub outer_characteristic_length: f64,
}

/// Conductive flux for a conductivity `k` (W/m·K) between two face temperatures.
///
/// # Arguments
/// - `hot_temperature`: inner-face temperature (°C)
/// - `cold_temperature`: outer-face temperature (°C)
/// - `thickness`: insulation thickness (m)
/// - `geometry`: flat or cylindrical; cylinders carry the bare pipe diameter
pub fn conduction_flux(
    k: f64,
    hot_temperature: f64,
    cold_temperature: f64,
    thickness: f64,
    geometry: &Geometry,
) -> Result<ConductionFlux, GeometryError> {
    let delta_t = hot_temperature - cold_temperature;
    match geometry {
        Geometry::Planar => {
            geometry.validate(thickness)?;
            Ok(ConductionFlux {
                flux: k * delta_t / thickness,
                outer_characteristic_length: thickness,
            })
        }
        Geometry::Cylindrical { inner_diameter } => {
            let (r_inner, r_outer) = Geometry::radii(*inner_diameter, thickness)?;
            Ok(ConductionFlux {
                flux: k * delta_t / (r_outer * (r_outer / r_inner).ln()),
                outer_characteristic_length: 2.0 * r_outer,
            })
        }
    }
}

/// Thermal resistance of a flat layer per unit area (m²·K/W).
pub fn planar_resistance(thickness: f64, k: f64) -> f64 {
    thickness / k
}

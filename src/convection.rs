//! Convective heat-transfer coefficient at the outer insulation surface.
//!
//! Four correlation regimes are used:
//! - natural convection, flat surface: `Nu = 0.27·Ra^¼` over a fixed 0.1 m
//!   plate length. The length does not scale with the real surface size.
//! - natural convection, cylinder (Churchill–Chu):
//!   `Nu = (0.60 + 0.387·Ra^⅙ / (1 + (0.559/Pr)^(9/16))^(8/27))²`
//! - forced convection, laminar (`Re < 5e5`): `Nu = 0.664·Re^½·Pr^⅓`
//! - forced convection, turbulent: `Nu = (0.037·Re^0.8 − 871)·Pr^⅓`
//!
//! Air properties are power-law fits around a 293.15 K reference, evaluated
//! at the film temperature.

use serde::{Deserialize, Serialize};

use crate::constants::{
    AIR_CONDUCTIVITY_W_M_K, AIR_KINEMATIC_VISCOSITY_EXPONENT, AIR_KINEMATIC_VISCOSITY_REF_M2_S,
    AIR_REFERENCE_TEMP_K, AIR_THERMAL_DIFFUSIVITY_EXPONENT, AIR_THERMAL_DIFFUSIVITY_REF_M2_S,
    FORCED_CONVECTION_MIN_WIND_M_S, GRAVITY_M_S2, LAMINAR_REYNOLDS_LIMIT, PLANAR_FORCED_LENGTH_M,
    PLANAR_NATURAL_LENGTH_M,
};
use crate::geometry::Geometry;
use crate::temp_utils::film_temperature_k;

/// Air transport properties at a film temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirProperties {
    pub film_temperature_k: f64,
    /// ν, m²/s
    pub kinematic_viscosity: f64,
    /// α, m²/s
    pub thermal_diffusivity: f64,
    /// W/m·K
    pub conductivity: f64,
}

impl AirProperties {
    pub fn at_film_temperature(film_temperature_k: f64) -> Self {
        let ratio = film_temperature_k / AIR_REFERENCE_TEMP_K;
        Self {
            film_temperature_k,
            kinematic_viscosity: AIR_KINEMATIC_VISCOSITY_REF_M2_S
                * ratio.powf(AIR_KINEMATIC_VISCOSITY_EXPONENT),
            thermal_diffusivity: AIR_THERMAL_DIFFUSIVITY_REF_M2_S
                * ratio.powf(AIR_THERMAL_DIFFUSIVITY_EXPONENT),
            conductivity: AIR_CONDUCTIVITY_W_M_K,
        }
    }

    pub fn prandtl(&self) -> f64 {
        self.kinematic_viscosity / self.thermal_diffusivity
    }

    /// Ideal-gas volumetric expansion coefficient, 1/K.
    pub fn expansion_coefficient(&self) -> f64 {
        1.0 / self.film_temperature_k
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConvectionRegime {
    /// No driving temperature difference or no usable length.
    None,
    NaturalPlanar,
    NaturalCylinder,
    ForcedLaminar,
    ForcedTurbulent,
}

/// Tunables for regime selection and characteristic lengths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvectionParams {
    /// Wind speed at and above which forced convection applies (m/s)
    pub forced_min_wind_speed: f64,
    /// Plate length for the flat-surface natural correlation (m)
    pub planar_natural_length: f64,
    /// Flow length for flat-surface forced convection (m)
    pub planar_forced_length: f64,
    /// Reynolds number where the turbulent correlation takes over
    pub laminar_reynolds_limit: f64,
}

impl Default for ConvectionParams {
    fn default() -> Self {
        Self {
            forced_min_wind_speed: FORCED_CONVECTION_MIN_WIND_M_S,
            planar_natural_length: PLANAR_NATURAL_LENGTH_M,
            planar_forced_length: PLANAR_FORCED_LENGTH_M,
            laminar_reynolds_limit: LAMINAR_REYNOLDS_LIMIT,
        }
    }
}

/// Coefficient together with the intermediate numbers that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvectionEstimate {
    /// h, W/m²·K
    pub coefficient: f64,
    pub regime: ConvectionRegime,
    pub nusselt: f64,
    pub characteristic_length: f64,
}

impl ConvectionEstimate {
    fn none() -> Self {
        Self {
            coefficient: 0.0,
            regime: ConvectionRegime::None,
            nusselt: 0.0,
            characteristic_length: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConvectionCoefficient {
    pub params: ConvectionParams,
}

impl ConvectionCoefficient {
    pub fn new(params: ConvectionParams) -> Self {
        Self { params }
    }

    /// Convective coefficient h (W/m²·K) at the outer surface.
    ///
    /// `outer_characteristic_length` is the outer diameter for cylinders; it
    /// is ignored for flat surfaces, which use fixed lengths.
    pub fn compute(
        &self,
        surface_temperature: f64,
        ambient_temperature: f64,
        geometry: &Geometry,
        outer_characteristic_length: f64,
        wind_speed: f64,
    ) -> f64 {
        self.estimate(
            surface_temperature,
            ambient_temperature,
            geometry,
            outer_characteristic_length,
            wind_speed,
        )
        .coefficient
    }

    pub fn regime(&self, geometry: &Geometry, reynolds: Option<f64>) -> ConvectionRegime {
        match (reynolds, geometry) {
            (Some(re), _) if re < self.params.laminar_reynolds_limit => ConvectionRegime::ForcedLaminar,
            (Some(_), _) => ConvectionRegime::ForcedTurbulent,
            (None, Geometry::Planar) => ConvectionRegime::NaturalPlanar,
            (None, Geometry::Cylindrical { .. }) => ConvectionRegime::NaturalCylinder,
        }
    }

    pub fn estimate(
        &self,
        surface_temperature: f64,
        ambient_temperature: f64,
        geometry: &Geometry,
        outer_characteristic_length: f64,
        wind_speed: f64,
    ) -> ConvectionEstimate {
        let delta_t = (surface_temperature - ambient_temperature).abs();
        if delta_t == 0.0 {
            return ConvectionEstimate::none();
        }

        let air = AirProperties::at_film_temperature(film_temperature_k(
            surface_temperature,
            ambient_temperature,
        ));
        let prandtl = air.prandtl();

        let (nusselt, length, regime) = if wind_speed >= self.params.forced_min_wind_speed {
            let length = match geometry {
                Geometry::Planar => self.params.planar_forced_length,
                Geometry::Cylindrical { .. } if outer_characteristic_length > 0.0 => {
                    outer_characteristic_length
                }
                Geometry::Cylindrical { .. } => self.params.planar_forced_length,
            };
            let reynolds = wind_speed * length / air.kinematic_viscosity;
            let regime = self.regime(geometry, Some(reynolds));
            let nusselt = match regime {
                ConvectionRegime::ForcedLaminar => {
                    0.664 * reynolds.sqrt() * prandtl.powf(1.0 / 3.0)
                }
                _ => (0.037 * reynolds.powf(0.8) - 871.0) * prandtl.powf(1.0 / 3.0),
            };
            (nusselt, length, regime)
        } else {
            let length = match geometry {
                Geometry::Planar => self.params.planar_natural_length,
                Geometry::Cylindrical { .. } => outer_characteristic_length,
            };
            if !(length > 0.0) {
                tracing::warn!(length, "natural convection needs a positive outer diameter");
                return ConvectionEstimate::none();
            }
            let rayleigh = GRAVITY_M_S2 * air.expansion_coefficient() * delta_t * length.powi(3)
                / (air.kinematic_viscosity * air.thermal_diffusivity);
            let regime = self.regime(geometry, None);
            let nusselt = match regime {
                ConvectionRegime::NaturalPlanar => 0.27 * rayleigh.powf(0.25),
                _ => {
                    let denominator =
                        (1.0 + (0.559 / prandtl).powf(9.0 / 16.0)).powf(8.0 / 27.0);
                    (0.60 + 0.387 * rayleigh.powf(1.0 / 6.0) / denominator).powi(2)
                }
            };
            (nusselt, length, regime)
        };

        ConvectionEstimate {
            coefficient: nusselt * air.conductivity / length,
            regime,
            nusselt,
            characteristic_length: length,
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::conduction::planar_resistance;

/// Temperature at the boundary between two adjacent insulation layers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterfaceTemperature {
    /// Zero-based index of the layer on the hot side of the boundary
    pub after_layer: usize,
    pub temperature: f64,
}

/// Walks the layers from the hot face outwards, dropping `flux · L/k` across
/// each one. All layers share `conductivity`, the value at the converged mean
/// temperature, and are treated as flat.
///
/// Returns one entry per internal boundary, so `layer_thicknesses.len() - 1`
/// entries; the last layer's outer face is the solved cold face.
pub fn interface_temperatures(
    hot_face_temperature: f64,
    flux: f64,
    conductivity: f64,
    layer_thicknesses: &[f64],
) -> Vec<InterfaceTemperature> {
    let Some((_, inner_layers)) = layer_thicknesses.split_last() else {
        return Vec::new();
    };

    let mut temperature = hot_face_temperature;
    inner_layers
        .iter()
        .enumerate()
        .map(|(after_layer, &thickness)| {
            temperature -= flux * planar_resistance(thickness, conductivity);
            InterfaceTemperature {
                after_layer,
                temperature,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_single_layer_has_no_interfaces() {
        assert!(interface_temperatures(250.0, 140.0, 0.035, &[0.051]).is_empty());
        assert!(interface_temperatures(250.0, 140.0, 0.035, &[]).is_empty());
    }

    #[test]
    fn test_equal_layers_split_drop_evenly() {
        // 0.02 m at k = 0.04 with 100 W/m² drops 50 °C per layer
        let interfaces = interface_temperatures(200.0, 100.0, 0.04, &[0.02, 0.02, 0.02]);
        assert_eq!(interfaces.len(), 2);
        assert_eq!(interfaces[0].after_layer, 0);
        assert_abs_diff_eq!(interfaces[0].temperature, 150.0, epsilon = 1e-9);
        assert_eq!(interfaces[1].after_layer, 1);
        assert_abs_diff_eq!(interfaces[1].temperature, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_thicker_layer_takes_larger_drop() {
        let interfaces = interface_temperatures(300.0, 80.0, 0.05, &[0.04, 0.01]);
        assert_abs_diff_eq!(interfaces[0].temperature, 300.0 - 64.0, epsilon = 1e-9);
    }
}

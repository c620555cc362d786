//! Temperature conversions and the closed-form psychrometric helpers
//! used around the heat-balance solver.

use crate::constants::{MAGNUS_A, MAGNUS_B_C, TO_KELVIN};

/// Converts Celsius to Kelvin.
pub fn celsius_to_kelvin(temp_c: f64) -> f64 {
    temp_c + TO_KELVIN
}

/// Converts Kelvin to Celsius.
pub fn kelvin_to_celsius(temp_k: f64) -> f64 {
    temp_k - TO_KELVIN
}

/// Mean of surface and ambient temperatures, in Kelvin.
///
/// Air properties in the convection correlations are evaluated at this
/// "film" temperature.
pub fn film_temperature_k(surface_c: f64, ambient_c: f64) -> f64 {
    (celsius_to_kelvin(surface_c) + celsius_to_kelvin(ambient_c)) / 2.0
}

/// Dew point (°C) from the Magnus approximation.
///
/// # Arguments
/// - `ambient_c`: dry-bulb air temperature in °C
/// - `relative_humidity_percent`: relative humidity in percent, `(0, 100]`
///
/// # Returns
/// The temperature below which ambient moisture condenses. Humidity of zero
/// or less has no dew point and yields NaN; callers validate first.
pub fn dew_point_c(ambient_c: f64, relative_humidity_percent: f64) -> f64 {
    let alpha =
        (MAGNUS_A * ambient_c) / (MAGNUS_B_C + ambient_c) + (relative_humidity_percent / 100.0).ln();
    (MAGNUS_B_C * alpha) / (MAGNUS_A - alpha)
}

/// Mean of two temperatures; the argument handed to conductivity formulas.
pub fn mean_temperature_c(hot_c: f64, cold_c: f64) -> f64 {
    (hot_c + cold_c) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_celsius_kelvin_conversion() {
        let test_cases = vec![
            (0.0, 273.15),    // Freezing point of water
            (100.0, 373.15),  // Boiling point of water
            (250.0, 523.15),  // Typical steam line
            (-40.0, 233.15),  // Cold storage
        ];

        for (celsius, expected_kelvin) in test_cases {
            let kelvin = celsius_to_kelvin(celsius);
            let back_to_celsius = kelvin_to_celsius(kelvin);

            assert_abs_diff_eq!(kelvin, expected_kelvin, epsilon = 0.01);
            assert_abs_diff_eq!(back_to_celsius, celsius, epsilon = 0.01);
        }
    }

    #[test]
    fn test_film_temperature() {
        assert_abs_diff_eq!(film_temperature_k(50.0, 30.0), 313.15, epsilon = 1e-9);
        assert_abs_diff_eq!(film_temperature_k(20.0, 20.0), 293.15, epsilon = 1e-9);
    }

    #[test]
    fn test_dew_point_reference_value() {
        // 25 °C at 70 % RH is the usual check value for the Magnus form
        let dew = dew_point_c(25.0, 70.0);
        assert_abs_diff_eq!(dew, 19.1, epsilon = 0.05);
    }

    #[test]
    fn test_dew_point_saturated_air_equals_ambient() {
        for ambient in [-10.0, 0.0, 12.5, 25.0, 40.0] {
            assert_abs_diff_eq!(dew_point_c(ambient, 100.0), ambient, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_dew_point_drops_with_humidity() {
        let humid = dew_point_c(25.0, 90.0);
        let dry = dew_point_c(25.0, 40.0);
        assert!(dry < humid);
        assert!(humid < 25.0);
    }

    #[test]
    fn test_mean_temperature() {
        assert_abs_diff_eq!(mean_temperature_c(250.0, 50.0), 150.0);
    }
}

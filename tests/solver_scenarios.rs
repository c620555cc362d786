// End-to-end checks of the cold-face solver on reference build-ups

use more_asserts::{assert_gt, assert_le, assert_lt};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thermal_insulation::error::{FormulaError, SolveError};
use thermal_insulation::formula::evaluate;
use thermal_insulation::geometry::Geometry;
use thermal_insulation::solver::{ColdFaceSolver, SolveInputs, SolveState};
use thermal_insulation::temp_utils::dew_point_c;

fn steam_line() -> SolveInputs {
    SolveInputs::hot_face(250.0, 30.0, 0.051)
}

#[test]
fn test_flat_wall_reference_case() {
    println!("🧱 Flat wall, k = 0.035, 250 °C → 30 °C, 51 mm");

    let solver = ColdFaceSolver::default();
    let result = solver.solve(&steam_line(), "0.035");

    println!("   cold face: {:?} °C", result.cold_face_temperature);
    println!("   flux:      {:?} W/m²", result.flux);
    println!("   iterations: {}", result.iterations);

    assert!(result.converged);
    let cold_face = result.cold_face_temperature.unwrap();
    assert_gt!(cold_face, 30.0);
    assert_lt!(cold_face, 250.0);
    assert_gt!(result.flux.unwrap(), 0.0);
}

#[test]
fn test_pipe_differs_from_flat_wall() {
    println!("🛢️ 88.9 mm pipe vs flat wall, same build-up");

    let solver = ColdFaceSolver::default();
    let wall = solver.solve(&steam_line(), "0.035");
    let pipe = solver.solve(&steam_line().with_geometry(Geometry::pipe(0.0889)), "0.035");

    println!("   wall: {:?} °C", wall.cold_face_temperature);
    println!("   pipe: {:?} °C", pipe.cold_face_temperature);

    assert!(pipe.converged);
    let difference = (pipe.cold_face_temperature.unwrap() - wall.cold_face_temperature.unwrap()).abs();
    assert_gt!(difference, 1.0);
}

#[test]
fn test_wind_cools_the_surface() {
    println!("🌬️ 5 m/s wind vs still air");

    let solver = ColdFaceSolver::default();
    let still = solver.solve(&steam_line(), "0.035");
    let windy = solver.solve(&steam_line().with_wind_speed(5.0), "0.035");

    println!("   still: {:?} °C", still.cold_face_temperature);
    println!("   windy: {:?} °C", windy.cold_face_temperature);

    assert!(windy.converged);
    assert_lt!(
        windy.cold_face_temperature.unwrap(),
        still.cold_face_temperature.unwrap()
    );
}

#[test]
fn test_dew_point_reference() {
    let dew_point = dew_point_c(25.0, 70.0);
    println!("💧 dew point at 25 °C / 70 %: {:.2} °C", dew_point);
    assert!((dew_point - 19.1).abs() < 0.1);
}

#[test]
fn test_undefined_name_is_reported_not_raised() {
    let solver = ColdFaceSolver::default();
    let result = solver.solve(&steam_line(), "0.035 + undefined_name * T");

    assert!(!result.converged);
    assert_eq!(result.flux, None);
    assert!(matches!(
        result.state,
        SolveState::Failed(SolveError::Formula(FormulaError::UnknownName { .. }))
    ));
    assert!(evaluate("0.035 + undefined_name * T", 100.0).is_err());
}

#[test]
fn test_runaway_nesting_fails_the_solve() {
    println!("🪆 catalog formula nested 100k levels deep");

    let solver = ColdFaceSolver::default();
    let formula = format!("{}0.035{}", "(".repeat(100_000), ")".repeat(100_000));
    let result = solver.solve(&steam_line(), &formula);

    println!("   state: {:?}", result.state);

    assert!(!result.converged);
    assert!(matches!(
        result.state,
        SolveState::Failed(SolveError::Formula(FormulaError::TooDeep { .. }))
    ));
    assert!(evaluate(&format!("{}0.035", "-".repeat(100_000)), 100.0).is_err());
}

#[test]
fn test_temperature_dependent_conductivity() {
    // rock wool style linear model
    let solver = ColdFaceSolver::default();
    let result = solver.solve(&steam_line(), "0.0337 + 0.000151 * T");
    let constant = solver.solve(&steam_line(), "0.0337");

    assert!(result.converged);
    // higher k at the working mean temperature lets more heat through
    assert_gt!(result.flux.unwrap(), constant.flux.unwrap());
}

#[test]
fn test_flux_matches_fourier_law_on_random_flat_walls() {
    println!("🎲 Seeded sweep of flat walls with constant k");

    let solver = ColdFaceSolver::default();
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..40 {
        let k: f64 = rng.random_range(0.02..0.08);
        let hot: f64 = rng.random_range(80.0..450.0);
        let ambient: f64 = rng.random_range(5.0..35.0);
        let thickness: f64 = rng.random_range(0.01..0.25);

        let inputs = SolveInputs::hot_face(hot, ambient, thickness);
        let result = solver.solve(&inputs, &format!("{}", k));
        assert!(result.converged, "no convergence for k={k} hot={hot} ambient={ambient} L={thickness}");

        let cold_face = result.cold_face_temperature.unwrap();
        let conduction = k * (hot - cold_face) / thickness;
        assert_le!((conduction - result.flux.unwrap()).abs(), 0.5);
    }
}

#[test]
fn test_thicker_insulation_brings_surface_toward_ambient() {
    println!("📏 Seeded thickness sweep");

    let solver = ColdFaceSolver::default();
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..10 {
        let k: f64 = rng.random_range(0.025..0.07);
        let hot: f64 = rng.random_range(120.0..400.0);
        let formula = format!("{} + 0.0001 * T", k);

        let mut thicknesses: Vec<f64> = (0..8).map(|_| rng.random_range(0.01..0.3)).collect();
        thicknesses.sort_by(|a, b| a.total_cmp(b));

        let surfaces: Vec<f64> = thicknesses
            .iter()
            .map(|&thickness| {
                let result = solver.solve(&SolveInputs::hot_face(hot, 25.0, thickness), &formula);
                assert!(result.converged);
                result.cold_face_temperature.unwrap()
            })
            .collect();

        // convergence tolerance allows a little jitter between close thicknesses
        for pair in surfaces.windows(2) {
            assert_le!(pair[1], pair[0] + 0.1);
        }
        for surface in &surfaces {
            assert_gt!(*surface, 25.0);
        }
        if thicknesses[7] - thicknesses[0] > 0.05 {
            assert_lt!(surfaces[7], surfaces[0]);
        }
    }
}

pub const TO_KELVIN: f64 = 273.15;

// Radiation
pub const STEFAN_BOLTZMANN_W_M2_K4: f64 = 5.67e-8;
pub const DEFAULT_EMISSIVITY: f64 = 0.9; // jacketed/painted outer surface

// Air properties, modeled against a 20 °C reference film temperature
pub const GRAVITY_M_S2: f64 = 9.81;
pub const AIR_REFERENCE_TEMP_K: f64 = 293.15;
pub const AIR_KINEMATIC_VISCOSITY_REF_M2_S: f64 = 1.589e-5;
pub const AIR_KINEMATIC_VISCOSITY_EXPONENT: f64 = 0.7;
pub const AIR_THERMAL_DIFFUSIVITY_REF_M2_S: f64 = 2.25e-5;
pub const AIR_THERMAL_DIFFUSIVITY_EXPONENT: f64 = 0.8;
pub const AIR_CONDUCTIVITY_W_M_K: f64 = 0.0263;

// Convection regime selection
pub const FORCED_CONVECTION_MIN_WIND_M_S: f64 = 1.0;
pub const PLANAR_NATURAL_LENGTH_M: f64 = 0.1; // fixed plate length for the 0.27·Ra^¼ correlation
pub const PLANAR_FORCED_LENGTH_M: f64 = 1.0;
pub const LAMINAR_REYNOLDS_LIMIT: f64 = 5.0e5;

// Cold-face solver defaults
pub const SOLVER_INITIAL_OFFSET_C: f64 = 10.0; // first guess above ambient
pub const SOLVER_INITIAL_STEP_C: f64 = 50.0;
pub const SOLVER_MIN_STEP_C: f64 = 0.001;
pub const SOLVER_STEP_REDUCTION: f64 = 0.5;
pub const SOLVER_TOLERANCE_W_M2: f64 = 0.5;
pub const SOLVER_MAX_ITERATIONS: usize = 1000;

// Thickness sweep defaults (condensation mode)
pub const SEARCH_STEP_M: f64 = 0.001;
pub const SEARCH_MAX_THICKNESS_M: f64 = 0.5;

// Magnus dew point approximation
pub const MAGNUS_A: f64 = 17.27;
pub const MAGNUS_B_C: f64 = 237.7;

// Economics
pub const WEEKS_PER_MONTH: f64 = 4.33;
pub const W_TO_KW: f64 = 1.0e-3;
pub const MM_PER_M: f64 = 1000.0;

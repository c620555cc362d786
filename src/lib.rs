pub mod constants;
pub mod temp_utils;
pub mod math_utils;
pub mod error;
pub mod formula;
pub mod geometry;
pub mod convection;
pub mod conduction;
pub mod solver;
pub mod thickness_search;
pub mod layers;
pub mod json_parser;
pub mod material;
pub mod config;
pub mod calculator;
pub mod savings;

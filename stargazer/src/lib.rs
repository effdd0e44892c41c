//! Stargazer
//!
//! Command-line host for the planning engine and the observing journal.
//!
//! Usage:
//!   stargazer plan --date 2025-07-15 --type deep-sky
//!   stargazer optics --aperture 200 --focal-length 1000 --eyepiece 10
//!   stargazer journal add --target "Ring Nebula (M57)" --rating 4 --instrument "8in Dob"
//!   stargazer journal list

pub mod cli;
pub mod commands;
pub mod logging;

pub use cli::Cli;

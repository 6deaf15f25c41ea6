//! Island-scale PV + battery + diesel microgrid dispatch simulator.

/// Hourly climate series: validated container, file loader, synthetic generator.
pub mod climate;
/// Scenario configuration parsed from TOML.
pub mod config;
pub mod devices;
pub mod io;
/// Dispatch engine, policy, and result aggregation.
pub mod sim;

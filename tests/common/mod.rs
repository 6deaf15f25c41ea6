//! Shared test fixtures for integration tests.

use microgrid_sim::climate::ClimateSeries;
use microgrid_sim::config::ScenarioConfig;
use microgrid_sim::sim::engine::DispatchEngine;
use microgrid_sim::sim::types::{DispatchParams, SimulationInputs};

/// Seed used for every synthetic climate year in the tests.
pub const TEST_SEED: u64 = 42;

/// A full synthetic tropical climate year.
pub fn tropical_climate() -> ClimateSeries {
    ClimateSeries::synthetic_tropical(TEST_SEED)
}

/// Simulation inputs with the given capacities against the synthetic
/// tropical year, 1 GWh annual demand, default dispatch parameters.
pub fn tropical_inputs(pv_kw: f64, battery_kwh: f64, diesel_kw: f64) -> SimulationInputs {
    SimulationInputs {
        pv_capacity_kw: pv_kw,
        battery_capacity_kwh: battery_kwh,
        diesel_capacity_kw: diesel_kw,
        annual_demand_kwh: 1_000_000.0,
        climate: tropical_climate(),
        diurnal_shape: None,
        params: DispatchParams::default(),
    }
}

/// Builds an engine for a named preset with the synthetic tropical year.
pub fn preset_engine(name: &str) -> DispatchEngine {
    let cfg = ScenarioConfig::from_preset(name).expect("preset exists");
    let inputs = cfg.to_inputs(tropical_climate());
    DispatchEngine::new(inputs).expect("preset inputs are valid")
}

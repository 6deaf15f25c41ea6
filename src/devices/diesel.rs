//! Diesel generator model with a two-part fuel-consumption curve.

use crate::sim::types::DispatchParams;

/// A diesel genset: nameplate capacity, minimum-load floor, fuel curve.
///
/// Fuel consumption for a running hour is
/// `capacity * idle_coefficient + output * proportional_coefficient`:
/// a fixed idle cost proportional to installed capacity plus a marginal
/// cost proportional to energy produced. The idle term is charged only in
/// hours the generator is actually dispatched; a standing-by generator
/// burns nothing in this model.
#[derive(Debug, Clone)]
pub struct DieselGenerator {
    /// Nameplate capacity in kilowatts.
    pub capacity_kw: f64,
    min_load_fraction: f64,
    fuel_idle_coefficient: f64,
    fuel_proportional_coefficient: f64,
}

impl DieselGenerator {
    /// Creates a genset from nameplate capacity and dispatch parameters.
    ///
    /// # Panics
    ///
    /// Panics if `capacity_kw` is negative.
    pub fn new(capacity_kw: f64, params: &DispatchParams) -> Self {
        assert!(capacity_kw >= 0.0);
        Self {
            capacity_kw,
            min_load_fraction: params.diesel_min_load_fraction,
            fuel_idle_coefficient: params.fuel_idle_coefficient,
            fuel_proportional_coefficient: params.fuel_proportional_coefficient,
        }
    }

    /// Lowest output the generator can sustain while running (kW).
    pub fn min_load_kw(&self) -> f64 {
        self.min_load_fraction * self.capacity_kw
    }

    /// Fuel burned in one hour at `output_kw` (litres).
    ///
    /// Callers must invoke this only for hours where the generator runs.
    pub fn fuel_litres(&self, output_kw: f64) -> f64 {
        self.capacity_kw * self.fuel_idle_coefficient
            + output_kw * self.fuel_proportional_coefficient
    }
}

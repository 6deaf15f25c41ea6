//! Physical component models of the microgrid.

/// Battery storage with SOC and wear bookkeeping.
pub mod battery;
/// Diesel genset with a two-part fuel curve.
pub mod diesel;
/// Hourly demand profile builder.
pub mod load;
/// Temperature-derated photovoltaic array.
pub mod solar;

// Re-export the main types for convenience
pub use battery::{Battery, ChargeOutcome};
pub use diesel::DieselGenerator;
pub use load::{REFERENCE_DIURNAL_SHAPE, build_hourly_profile};
pub use solar::SolarArray;

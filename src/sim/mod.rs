//! Dispatch engine, policy, and result aggregation.

pub mod engine;
/// Hour-of-day-banded diesel dispatch decision function.
pub mod policy;
pub mod result;
pub mod types;

// Re-export the main types for convenience
pub use engine::DispatchEngine;
pub use result::DispatchResult;
pub use types::{DispatchParams, HourRecord, SimulationInputs};

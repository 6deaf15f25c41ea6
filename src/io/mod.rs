//! File output helpers.

/// Hourly telemetry CSV export.
pub mod export;

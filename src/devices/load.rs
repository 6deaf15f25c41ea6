//! Hourly demand profile builder.

use crate::sim::types::{DAYS_PER_YEAR, HOURS_PER_DAY, HOURS_PER_YEAR};

/// Reference normalized diurnal load shape (tier-5 consumption pattern).
///
/// One fraction of the daily energy per hour of day; the 24 values sum to
/// exactly 1.0. Callers may supply their own shape instead; this constant
/// is only the default, not hidden global state.
pub const REFERENCE_DIURNAL_SHAPE: [f64; HOURS_PER_DAY] = [
    0.020, 0.018, 0.017, 0.016, 0.017, 0.020, // 00:00 - 05:00
    0.028, 0.038, 0.044, 0.046, 0.048, 0.050, // 06:00 - 11:00
    0.051, 0.050, 0.048, 0.046, 0.048, 0.054, // 12:00 - 17:00
    0.064, 0.070, 0.068, 0.058, 0.045, 0.036, // 18:00 - 23:00
];

/// Expands an annual energy total into an 8,760-value hourly demand series.
///
/// `profile[h] = shape[h % 24] * (annual_demand_kwh / 365)`. The shape is
/// tiled identically across all 365 days; with one-hour steps each entry is
/// both a kW load and a kWh energy. Pure and total; shape validation
/// happens during input validation, not here.
pub fn build_hourly_profile(
    annual_demand_kwh: f64,
    shape: &[f64; HOURS_PER_DAY],
) -> Vec<f64> {
    let daily_kwh = annual_demand_kwh / DAYS_PER_YEAR as f64;
    let mut profile = Vec::with_capacity(HOURS_PER_YEAR);
    for hour in 0..HOURS_PER_YEAR {
        profile.push(shape[hour % HOURS_PER_DAY] * daily_kwh);
    }
    profile
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_shape_sums_to_one() {
        let sum: f64 = REFERENCE_DIURNAL_SHAPE.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12, "shape sum was {sum}");
    }

    #[test]
    fn profile_has_full_year_length() {
        let profile = build_hourly_profile(500_000.0, &REFERENCE_DIURNAL_SHAPE);
        assert_eq!(profile.len(), HOURS_PER_YEAR);
    }

    #[test]
    fn profile_total_matches_annual_demand() {
        let annual = 1_000_000.0;
        let profile = build_hourly_profile(annual, &REFERENCE_DIURNAL_SHAPE);
        let total: f64 = profile.iter().sum();
        assert!(
            (total - annual).abs() / annual < 1e-9,
            "profile total {total} drifted from {annual}"
        );
    }

    #[test]
    fn shape_tiles_identically_across_days() {
        let profile = build_hourly_profile(365_000.0, &REFERENCE_DIURNAL_SHAPE);
        for h in 0..HOURS_PER_DAY {
            assert_eq!(profile[h], profile[h + HOURS_PER_DAY]);
            assert_eq!(profile[h], profile[h + 200 * HOURS_PER_DAY]);
        }
    }

    #[test]
    fn evening_peak_exceeds_overnight_trough() {
        let profile = build_hourly_profile(365_000.0, &REFERENCE_DIURNAL_SHAPE);
        assert!(profile[19] > profile[3]);
    }

    #[test]
    fn custom_shape_is_honored() {
        let mut shape = [0.0; HOURS_PER_DAY];
        shape[12] = 1.0;
        let profile = build_hourly_profile(365.0, &shape);
        assert_eq!(profile[12], 1.0);
        assert_eq!(profile[13], 0.0);
    }
}

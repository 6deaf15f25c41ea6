//! Hour-of-day-banded diesel dispatch policy.
//!
//! The reference methodology is a reactive controller, not a mode-based
//! state machine: each hour the decision table below is evaluated fresh
//! against the current deficit and battery state. The operating doctrine is
//! to prefer stored solar energy during the day, let diesel both serve load
//! and recharge the battery during the evening ramp, and fall back to
//! diesel at night. The band boundaries are fixed hour constants
//! (4, break hour, 23) by design, not solar-elevation-derived.

use super::types::DispatchParams;

/// First hour (exclusive) of the daytime dispatch band.
pub const MORNING_BOUNDARY_HOUR: usize = 4;
/// Hour at which the evening-peak band ends and the night band begins.
pub const NIGHT_BOUNDARY_HOUR: usize = 23;

/// The battery quantities the policy branches on.
///
/// `available_kwh` is the optimistic `soc * capacity * eta_discharge` view
/// (no DoD floor); `headroom_kwh` is the stored-energy room up to full.
#[derive(Debug, Clone, Copy)]
pub struct BatteryView {
    pub available_kwh: f64,
    pub headroom_kwh: f64,
}

/// Decides the diesel setpoint for one deficit hour.
///
/// Pure and side-effect-free; the engine applies the returned setpoint to
/// the genset and battery. `net_load_kw` must be the positive deficit
/// (demand minus generation); surplus hours never reach this function.
///
/// Bands, with `B` the configured break hour:
/// - daytime (`4 < h <= B`): diesel runs only when the battery cannot cover
///   the deficit, then at least at minimum load and at most at capacity;
/// - evening peak (`B < h < 23`): diesel runs at the highest useful level
///   (deficit plus battery charge headroom), but only above minimum load;
/// - night/other hours: diesel runs when the battery cannot cover the
///   deficit, at the highest useful level or minimum load, whichever is
///   greater.
///
/// A positive setpoint below minimum load is raised to the minimum-load
/// floor: a running generator cannot idle below it.
pub fn diesel_setpoint_kw(
    hour_of_day: usize,
    net_load_kw: f64,
    battery: BatteryView,
    diesel_capacity_kw: f64,
    params: &DispatchParams,
) -> f64 {
    let min_load_kw = params.diesel_min_load_fraction * diesel_capacity_kw;
    let max_useful_kw = diesel_capacity_kw
        .min(net_load_kw + battery.headroom_kwh / params.charge_efficiency);

    let mut setpoint_kw = if hour_of_day > MORNING_BOUNDARY_HOUR && hour_of_day <= params.break_hour
    {
        if battery.available_kwh < net_load_kw {
            net_load_kw.max(min_load_kw).min(diesel_capacity_kw)
        } else {
            0.0
        }
    } else if hour_of_day > params.break_hour && hour_of_day < NIGHT_BOUNDARY_HOUR {
        if max_useful_kw > min_load_kw {
            max_useful_kw
        } else {
            0.0
        }
    } else if battery.available_kwh < net_load_kw {
        max_useful_kw.max(min_load_kw)
    } else {
        0.0
    };

    if setpoint_kw > 0.0 && setpoint_kw < min_load_kw {
        setpoint_kw = min_load_kw;
    }
    setpoint_kw
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> DispatchParams {
        DispatchParams::default()
    }

    fn view(available_kwh: f64, headroom_kwh: f64) -> BatteryView {
        BatteryView {
            available_kwh,
            headroom_kwh,
        }
    }

    #[test]
    fn daytime_prefers_battery_when_it_covers_the_deficit() {
        let setpoint = diesel_setpoint_kw(10, 50.0, view(80.0, 100.0), 150.0, &params());
        assert_eq!(setpoint, 0.0);
    }

    #[test]
    fn daytime_runs_diesel_when_battery_is_short() {
        let setpoint = diesel_setpoint_kw(10, 100.0, view(20.0, 100.0), 150.0, &params());
        assert_eq!(setpoint, 100.0);
    }

    #[test]
    fn daytime_diesel_is_capped_at_capacity() {
        let setpoint = diesel_setpoint_kw(10, 400.0, view(0.0, 100.0), 150.0, &params());
        assert_eq!(setpoint, 150.0);
    }

    #[test]
    fn daytime_small_deficit_is_raised_to_min_load() {
        // min load = 0.4 * 150 = 60 kW
        let setpoint = diesel_setpoint_kw(10, 10.0, view(0.0, 100.0), 150.0, &params());
        assert_eq!(setpoint, 60.0);
    }

    #[test]
    fn evening_runs_at_max_useful_level() {
        // max useful = min(150, 80 + 50 / 0.95)
        let setpoint = diesel_setpoint_kw(19, 80.0, view(200.0, 50.0), 150.0, &params());
        let expected = (80.0 + 50.0 / 0.95_f64).min(150.0);
        assert!((setpoint - expected).abs() < 1e-9);
    }

    #[test]
    fn evening_stays_off_below_min_load_threshold() {
        // deficit + headroom below the 60 kW floor: not worth starting
        let setpoint = diesel_setpoint_kw(19, 20.0, view(200.0, 10.0), 150.0, &params());
        assert_eq!(setpoint, 0.0);
    }

    #[test]
    fn evening_runs_even_when_battery_could_cover() {
        // The evening band recharges through diesel regardless of SOC.
        let setpoint = diesel_setpoint_kw(18, 100.0, view(500.0, 200.0), 150.0, &params());
        assert_eq!(setpoint, 150.0);
    }

    #[test]
    fn night_prefers_battery_when_it_covers_the_deficit() {
        let setpoint = diesel_setpoint_kw(2, 30.0, view(50.0, 100.0), 150.0, &params());
        assert_eq!(setpoint, 0.0);
    }

    #[test]
    fn night_runs_at_least_min_load_when_battery_is_short() {
        let setpoint = diesel_setpoint_kw(2, 30.0, view(5.0, 0.0), 150.0, &params());
        assert_eq!(setpoint, 60.0);
    }

    #[test]
    fn night_band_covers_hour_23_and_early_morning() {
        let p = params();
        for h in [0, 1, 2, 3, 4, 23] {
            let setpoint = diesel_setpoint_kw(h, 100.0, view(0.0, 0.0), 150.0, &p);
            assert_eq!(setpoint, 100.0, "hour {h} should dispatch as night");
        }
    }

    #[test]
    fn break_hour_moves_the_evening_band() {
        let mut p = params();
        p.break_hour = 15;
        // Hour 16 is daytime under the default but evening under B = 15.
        let battery = view(500.0, 200.0);
        assert_eq!(diesel_setpoint_kw(16, 100.0, battery, 150.0, &params()), 0.0);
        assert_eq!(diesel_setpoint_kw(16, 100.0, battery, 150.0, &p), 150.0);
    }

    #[test]
    fn zero_diesel_capacity_never_dispatches() {
        let p = params();
        for h in 0..24 {
            assert_eq!(diesel_setpoint_kw(h, 500.0, view(0.0, 0.0), 0.0, &p), 0.0);
        }
    }

    #[test]
    fn positive_setpoint_never_below_min_load() {
        let p = params();
        for h in 0..24 {
            for deficit in [1.0, 10.0, 59.0, 61.0, 149.0, 500.0] {
                let s = diesel_setpoint_kw(h, deficit, view(0.0, 20.0), 150.0, &p);
                assert!(
                    s == 0.0 || s >= 0.4 * 150.0 - 1e-9,
                    "hour {h} deficit {deficit} gave sub-min-load setpoint {s}"
                );
            }
        }
    }
}

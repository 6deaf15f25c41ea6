//! Integration tests for the built-in scenario presets: each preset's annual
//! result must match the character of the system it describes.

mod common;

#[test]
fn solar_only_burns_no_fuel() {
    let result = common::preset_engine("solar_only").run();
    assert_eq!(result.diesel_generation_kwh, 0.0);
    assert_eq!(result.fuel_litres, 0.0);
    assert_eq!(result.diesel_hours, 0);
    assert!(result.pv_generation_kwh > 0.0);
}

#[test]
fn solar_only_cannot_serve_the_night_without_enough_storage() {
    // 500 kW of PV against 500 MWh of demand leaves some overnight hours
    // short even with 1 MWh of storage.
    let result = common::preset_engine("solar_only").run();
    assert!(result.battery_discharge_kwh > 0.0);
    assert!(result.lpsp() > 0.0);
}

#[test]
fn diesel_only_generates_no_pv_and_curtails_nothing() {
    let result = common::preset_engine("diesel_only").run();
    assert_eq!(result.pv_generation_kwh, 0.0);
    assert_eq!(result.curtailment_kwh, 0.0);
    assert_eq!(result.curtailment_hours, 0);
    assert!((result.diesel_share() - 1.0).abs() < 1e-12);
}

#[test]
fn diesel_only_goes_unmet_only_in_sub_min_load_evening_hours() {
    // A 200 kW genset covers the peak hour, but the evening band leaves the
    // genset off when the deficit sits below its 80 kW minimum load.
    let (result, records) = common::preset_engine("diesel_only").run_recorded();
    assert!(result.fuel_litres > 0.0);
    assert!(result.unmet_hours > 0);
    for r in &records {
        if r.unmet_kwh > 0.0 {
            let hour_of_day = r.hour % 24;
            assert!(
                (18..23).contains(&hour_of_day),
                "hour {} unmet outside the evening band",
                r.hour
            );
            assert!(
                r.demand_kwh < 0.4 * 200.0,
                "hour {} unmet despite clearing minimum load",
                r.hour
            );
        }
    }
}

#[test]
fn baseline_hybrid_is_reliable_and_mixed() {
    let result = common::preset_engine("baseline").run();
    assert!(result.lpsp() >= 0.0);
    assert!(result.lpsp() < 0.05, "LPSP {} too high", result.lpsp());
    let share = result.diesel_share();
    assert!(share > 0.0 && share < 1.0, "diesel share {share} not mixed");
}

#[test]
fn baseline_battery_cycles_daily() {
    let result = common::preset_engine("baseline").run();
    assert!(result.battery_discharge_kwh > 0.0);
    assert!(result.equivalent_cycles > 10.0);
    assert!(result.battery_wear_cycles > 0.0);
    assert!(result.max_depth_of_discharge > 0.0);
    assert!(result.average_soc > 0.0 && result.average_soc <= 1.0);
}

#[test]
fn adding_pv_to_diesel_reduces_fuel() {
    let diesel_alone = common::preset_engine("diesel_only").run();
    let hybrid = microgrid_sim::sim::engine::DispatchEngine::new({
        let mut i = common::tropical_inputs(300.0, 600.0, 200.0);
        i.annual_demand_kwh = 500_000.0;
        i
    })
    .expect("valid inputs")
    .run();
    assert!(hybrid.fuel_litres < diesel_alone.fuel_litres);
}

#[test]
fn summary_ratios_are_finite_for_every_preset() {
    for name in microgrid_sim::config::ScenarioConfig::PRESETS {
        let result = common::preset_engine(name).run();
        assert!(result.effective_capacity_factor().is_finite());
        assert!(result.curtailment_fraction().is_finite());
        assert!(result.diesel_share().is_finite());
        assert!(result.lpsp().is_finite());
        assert!(result.battery_utilization().is_finite());
    }
}

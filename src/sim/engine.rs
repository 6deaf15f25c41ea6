//! The 8,760-step dispatch engine.

use crate::climate::ClimateSeries;
use crate::devices::{Battery, DieselGenerator, SolarArray, build_hourly_profile};
use crate::devices::load::REFERENCE_DIURNAL_SHAPE;

use super::policy::{self, BatteryView};
use super::result::DispatchResult;
use super::types::{
    Accumulators, DispatchParams, HOURS_PER_DAY, HOURS_PER_YEAR, HourRecord, InputError,
    SimulationInputs,
};

/// Simulates one year of hourly microgrid dispatch for one node.
///
/// Owns all component models and the running accumulators. Each engine is
/// single-use: construct from validated [`SimulationInputs`], call
/// [`DispatchEngine::run`] (or [`DispatchEngine::run_recorded`]), read the
/// result. Nothing survives the call, so independent runs are trivially
/// parallelizable by the caller.
#[derive(Debug)]
pub struct DispatchEngine {
    demand_kwh: Vec<f64>,
    climate: ClimateSeries,
    pv: SolarArray,
    battery: Battery,
    genset: DieselGenerator,
    params: DispatchParams,
    acc: Accumulators,
    annual_demand_kwh: f64,
}

impl DispatchEngine {
    /// Builds an engine from simulation inputs, validating them first.
    ///
    /// The demand profile is expanded from the annual total using the
    /// supplied diurnal shape (or the built-in reference shape), and the
    /// climate series is truncated to exactly one year; extra trailing
    /// entries are ignored, shorter arrays were already rejected.
    ///
    /// # Errors
    ///
    /// Returns the first [`InputError`] found by input validation.
    pub fn new(inputs: SimulationInputs) -> Result<Self, InputError> {
        inputs.validate()?;
        let SimulationInputs {
            pv_capacity_kw,
            battery_capacity_kwh,
            diesel_capacity_kw,
            annual_demand_kwh,
            mut climate,
            diurnal_shape,
            params,
        } = inputs;

        climate.irradiance_wm2.truncate(HOURS_PER_YEAR);
        climate.ambient_temp_c.truncate(HOURS_PER_YEAR);

        let shape = diurnal_shape.unwrap_or(REFERENCE_DIURNAL_SHAPE);
        let demand_kwh = build_hourly_profile(annual_demand_kwh, &shape);

        Ok(Self {
            demand_kwh,
            climate,
            pv: SolarArray::new(pv_capacity_kw, &params),
            battery: Battery::new(battery_capacity_kwh, &params),
            genset: DieselGenerator::new(diesel_capacity_kw, &params),
            params,
            acc: Accumulators::default(),
            annual_demand_kwh,
        })
    }

    /// Executes one hourly step and returns its record.
    ///
    /// Implements the reference dispatch sequence: self-discharge, then
    /// generation and net load, then either surplus charging or the banded
    /// diesel decision with battery discharge/recharge, then SOC
    /// bookkeeping and, on the last hour of the day, the wear update.
    pub fn step(&mut self, hour: usize) -> HourRecord {
        let hour_of_day = hour % HOURS_PER_DAY;

        // 1. Self-discharge before any other battery operation.
        self.battery.apply_self_discharge();

        // 2. Generation and net load.
        let pv_kwh = self.pv.power_kw(
            self.climate.irradiance_wm2[hour],
            self.climate.ambient_temp_c[hour],
        );
        let demand_kwh = self.demand_kwh[hour];
        let net_load_kwh = demand_kwh - pv_kwh;

        let mut diesel_kwh = 0.0;
        let mut fuel_litres = 0.0;
        let mut battery_charge_kwh = 0.0;
        let mut battery_discharge_kwh = 0.0;
        let mut curtailed_kwh = 0.0;
        let mut unmet_kwh = 0.0;

        if net_load_kwh <= 0.0 {
            // 3. Surplus: store what fits, curtail the rest.
            let outcome = self.battery.charge(-net_load_kwh);
            battery_charge_kwh = outcome.absorbed_kwh;
            curtailed_kwh = outcome.curtailed_kwh;
        } else {
            // 4. Deficit: banded diesel decision, then battery.
            let battery_view = BatteryView {
                available_kwh: self.battery.available_kwh(),
                headroom_kwh: self.battery.headroom_kwh(),
            };
            diesel_kwh = policy::diesel_setpoint_kw(
                hour_of_day,
                net_load_kwh,
                battery_view,
                self.genset.capacity_kw,
                &self.params,
            );
            if diesel_kwh > 0.0 {
                fuel_litres = self.genset.fuel_litres(diesel_kwh);
            }

            let remaining_kwh = net_load_kwh - diesel_kwh;
            if remaining_kwh > 0.0 {
                battery_discharge_kwh = self.battery.discharge(remaining_kwh);
                unmet_kwh = (remaining_kwh - battery_discharge_kwh).max(0.0);
            } else if remaining_kwh < 0.0 {
                // Minimum-load overshoot recharges the battery; whatever a
                // full or absent battery cannot absorb is discarded and is
                // not curtailment (that total counts renewable surplus only).
                let outcome = self.battery.charge(-remaining_kwh);
                battery_charge_kwh = outcome.absorbed_kwh;
            }
        }

        // 5. SOC bookkeeping happens through the accumulators.
        let record = HourRecord {
            hour,
            demand_kwh,
            pv_kwh,
            diesel_kwh,
            battery_discharge_kwh,
            battery_charge_kwh,
            curtailed_kwh,
            unmet_kwh,
            fuel_litres,
            soc: self.battery.soc(),
        };
        self.acc.absorb(&record);

        // 6. Day boundary: wear update and daily buffer reset.
        if hour_of_day == HOURS_PER_DAY - 1 {
            self.battery.end_of_day_update();
        }

        record
    }

    /// Runs the full year and returns the aggregated result.
    pub fn run(mut self) -> DispatchResult {
        for hour in 0..HOURS_PER_YEAR {
            self.step(hour);
        }
        self.finish()
    }

    /// Runs the full year, additionally keeping every hourly record.
    pub fn run_recorded(mut self) -> (DispatchResult, Vec<HourRecord>) {
        let mut records = Vec::with_capacity(HOURS_PER_YEAR);
        for hour in 0..HOURS_PER_YEAR {
            records.push(self.step(hour));
        }
        (self.finish(), records)
    }

    /// Returns a reference to the battery (for state assertions in tests).
    pub fn battery(&self) -> &Battery {
        &self.battery
    }

    fn finish(&self) -> DispatchResult {
        DispatchResult::from_accumulators(
            &self.acc,
            self.pv.capacity_kw,
            self.battery.capacity_kwh,
            self.genset.capacity_kw,
            self.annual_demand_kwh,
            self.battery.wear_cycles(),
        )
    }
}

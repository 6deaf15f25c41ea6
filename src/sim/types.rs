//! Core simulation types: inputs, dispatch parameters, hourly records.

use std::fmt;

use serde::Deserialize;

use crate::climate::ClimateSeries;

/// Hours in one simulated year (365 days, no leap handling).
pub const HOURS_PER_YEAR: usize = 8_760;
/// Hours in one simulated day.
pub const HOURS_PER_DAY: usize = 24;
/// Days in one simulated year.
pub const DAYS_PER_YEAR: usize = 365;

/// Tolerance on the diurnal shape sum (must be 1.0 within this bound).
pub const SHAPE_SUM_TOLERANCE: f64 = 1e-6;

/// Energy threshold below which an hour does not count toward the
/// unmet/curtailment hour counters. The reference methodology counts any
/// strictly positive amount; this deliberately tightens that to ignore
/// sub-microwatt-hour residue left by `f64` cancellation.
pub const COUNT_EPSILON_KWH: f64 = 1e-9;

/// Tunable parameters of the reference dispatch methodology.
///
/// Defaults reproduce the reference parameterization for a tropical island
/// mini-grid. All rates are per hour; the break hour separates the daytime
/// dispatch band from the evening-peak band.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchParams {
    /// PV power temperature coefficient (fraction lost per °C above 25 °C).
    pub temp_coefficient: f64,
    /// Cell-temperature rise per kW/m² of irradiance (NOCT model).
    pub noct_coefficient: f64,
    /// Maximum usable depth of discharge (SOC floor = 1 - ceiling).
    pub dod_ceiling: f64,
    /// Minimum diesel loading as a fraction of nameplate capacity.
    pub diesel_min_load_fraction: f64,
    /// Fuel-curve idle term (litres per hour per kW of capacity).
    pub fuel_idle_coefficient: f64,
    /// Fuel-curve proportional term (litres per kWh produced).
    pub fuel_proportional_coefficient: f64,
    /// Battery charging efficiency (0..1].
    pub charge_efficiency: f64,
    /// Battery discharging efficiency (0..1].
    pub discharge_efficiency: f64,
    /// Battery self-discharge rate per hour.
    pub self_discharge_rate: f64,
    /// Hour of day separating the daytime band from the evening peak.
    pub break_hour: usize,
    /// Whole-system PV derating factor (soiling, wiring, inverter).
    pub system_derating: f64,
    /// Cycle-life curve coefficient `a` in `a * dod^b`.
    pub cycle_coefficient_a: f64,
    /// Cycle-life curve exponent `b` in `a * dod^b`.
    pub cycle_coefficient_b: f64,
    /// Battery state of charge at hour 0 (0.0 to 1.0).
    pub initial_soc: f64,
}

impl Default for DispatchParams {
    fn default() -> Self {
        Self {
            temp_coefficient: 0.0045,
            noct_coefficient: 31.25,
            dod_ceiling: 0.8,
            diesel_min_load_fraction: 0.4,
            fuel_idle_coefficient: 0.08145,
            fuel_proportional_coefficient: 0.246,
            charge_efficiency: 0.95,
            discharge_efficiency: 0.95,
            self_discharge_rate: 0.0002,
            break_hour: 17,
            system_derating: 0.85,
            cycle_coefficient_a: 1000.0,
            cycle_coefficient_b: -0.85,
            initial_soc: 0.5,
        }
    }
}

impl DispatchParams {
    /// Checks parameter ranges, returning the first violation.
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] naming the offending parameter.
    pub fn validate(&self) -> Result<(), InputError> {
        for (field, value) in [
            ("params.charge_efficiency", self.charge_efficiency),
            ("params.discharge_efficiency", self.discharge_efficiency),
            ("params.dod_ceiling", self.dod_ceiling),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(InputError::new(field, "must be in (0.0, 1.0]"));
            }
        }
        for (field, value) in [
            (
                "params.diesel_min_load_fraction",
                self.diesel_min_load_fraction,
            ),
            ("params.self_discharge_rate", self.self_discharge_rate),
            ("params.initial_soc", self.initial_soc),
            ("params.system_derating", self.system_derating),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(InputError::new(field, "must be in [0.0, 1.0]"));
            }
        }
        for (field, value) in [
            ("params.temp_coefficient", self.temp_coefficient),
            ("params.noct_coefficient", self.noct_coefficient),
            ("params.fuel_idle_coefficient", self.fuel_idle_coefficient),
            (
                "params.fuel_proportional_coefficient",
                self.fuel_proportional_coefficient,
            ),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(InputError::new(field, "must be finite and >= 0"));
            }
        }
        if self.cycle_coefficient_a <= 0.0 {
            return Err(InputError::new("params.cycle_coefficient_a", "must be > 0"));
        }
        // The band structure needs the break hour strictly between the
        // morning boundary (4) and the night boundary (23).
        if self.break_hour <= 4 || self.break_hour >= 23 {
            return Err(InputError::new("params.break_hour", "must be in 5..=22"));
        }
        Ok(())
    }
}

/// Structured validation failure for engine inputs.
#[derive(Debug, Clone)]
pub struct InputError {
    /// Name of the offending input field.
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl InputError {
    pub(crate) fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid input `{}`: {}", self.field, self.message)
    }
}

impl std::error::Error for InputError {}

/// Everything one single-year dispatch run needs, immutable for the run.
#[derive(Debug, Clone)]
pub struct SimulationInputs {
    /// Installed photovoltaic capacity (kW).
    pub pv_capacity_kw: f64,
    /// Battery nameplate energy capacity (kWh).
    pub battery_capacity_kwh: f64,
    /// Diesel generator nameplate capacity (kW).
    pub diesel_capacity_kw: f64,
    /// Annual demand energy to serve (kWh, > 0).
    pub annual_demand_kwh: f64,
    /// Hourly irradiance and ambient temperature for the year.
    pub climate: ClimateSeries,
    /// Optional 24-value normalized diurnal load shape. `None` selects the
    /// built-in reference shape.
    pub diurnal_shape: Option<[f64; HOURS_PER_DAY]>,
    /// Dispatch methodology parameters.
    pub params: DispatchParams,
}

impl SimulationInputs {
    /// Checks all input constraints, returning the first violation.
    ///
    /// Degenerate capacities (zero PV, battery, or diesel) are valid; only
    /// negative capacities, non-positive demand, short climate arrays, a
    /// malformed shape, or out-of-range parameters are rejected.
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] naming the offending field.
    pub fn validate(&self) -> Result<(), InputError> {
        if !(self.annual_demand_kwh > 0.0) {
            return Err(InputError::new("annual_demand_kwh", "must be > 0"));
        }
        for (field, value) in [
            ("pv_capacity_kw", self.pv_capacity_kw),
            ("battery_capacity_kwh", self.battery_capacity_kwh),
            ("diesel_capacity_kw", self.diesel_capacity_kw),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(InputError::new(field, "must be finite and >= 0"));
            }
        }
        if self.climate.irradiance_wm2.len() < HOURS_PER_YEAR {
            return Err(InputError::new(
                "climate.irradiance_wm2",
                format!(
                    "needs {HOURS_PER_YEAR} hourly entries, got {}",
                    self.climate.irradiance_wm2.len()
                ),
            ));
        }
        if self.climate.ambient_temp_c.len() < HOURS_PER_YEAR {
            return Err(InputError::new(
                "climate.ambient_temp_c",
                format!(
                    "needs {HOURS_PER_YEAR} hourly entries, got {}",
                    self.climate.ambient_temp_c.len()
                ),
            ));
        }
        if let Some(shape) = &self.diurnal_shape {
            let sum: f64 = shape.iter().sum();
            if (sum - 1.0).abs() > SHAPE_SUM_TOLERANCE {
                return Err(InputError::new(
                    "diurnal_shape",
                    format!("values must sum to 1.0, got {sum}"),
                ));
            }
            if shape.iter().any(|v| *v < 0.0) {
                return Err(InputError::new("diurnal_shape", "values must be >= 0"));
            }
        }
        self.params.validate()
    }
}

/// Complete record of one simulated hour.
#[derive(Debug, Clone)]
pub struct HourRecord {
    /// Hour index within the year (0 to 8759).
    pub hour: usize,
    /// Demand requested this hour (kWh).
    pub demand_kwh: f64,
    /// Photovoltaic generation (kWh).
    pub pv_kwh: f64,
    /// Diesel generation (kWh).
    pub diesel_kwh: f64,
    /// Energy delivered by the battery (kWh).
    pub battery_discharge_kwh: f64,
    /// Energy absorbed by the battery (kWh, input side).
    pub battery_charge_kwh: f64,
    /// Renewable surplus discarded (kWh).
    pub curtailed_kwh: f64,
    /// Demand left unserved (kWh).
    pub unmet_kwh: f64,
    /// Diesel fuel consumed (litres).
    pub fuel_litres: f64,
    /// Battery state of charge at the end of the hour (0.0 to 1.0).
    pub soc: f64,
}

impl fmt::Display for HourRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "h={:>4} | demand={:>7.2}  pv={:>7.2}  diesel={:>6.2}  \
             bat(-)={:>6.2}  bat(+)={:>6.2} | curt={:>6.2}  unmet={:>6.2}  \
             fuel={:>6.2} L  SoC={:.1}%",
            self.hour,
            self.demand_kwh,
            self.pv_kwh,
            self.diesel_kwh,
            self.battery_discharge_kwh,
            self.battery_charge_kwh,
            self.curtailed_kwh,
            self.unmet_kwh,
            self.fuel_litres,
            self.soc * 100.0,
        )
    }
}

/// Monotone totals folded across the 8,760 steps.
#[derive(Debug, Default, Clone)]
pub struct Accumulators {
    pub pv_kwh: f64,
    pub diesel_kwh: f64,
    pub battery_discharge_kwh: f64,
    pub curtailed_kwh: f64,
    pub unmet_kwh: f64,
    pub fuel_litres: f64,
    pub diesel_hours: usize,
    pub unmet_hours: usize,
    pub curtailment_hours: usize,
    pub soc_sum: f64,
    pub max_depth_of_discharge: f64,
}

impl Accumulators {
    /// Folds one hourly record into the running totals.
    pub fn absorb(&mut self, record: &HourRecord) {
        self.pv_kwh += record.pv_kwh;
        self.diesel_kwh += record.diesel_kwh;
        self.battery_discharge_kwh += record.battery_discharge_kwh;
        self.curtailed_kwh += record.curtailed_kwh;
        self.unmet_kwh += record.unmet_kwh;
        self.fuel_litres += record.fuel_litres;
        if record.diesel_kwh > 0.0 {
            self.diesel_hours += 1;
        }
        if record.unmet_kwh > COUNT_EPSILON_KWH {
            self.unmet_hours += 1;
        }
        if record.curtailed_kwh > COUNT_EPSILON_KWH {
            self.curtailment_hours += 1;
        }
        self.soc_sum += record.soc;
        self.max_depth_of_discharge = self.max_depth_of_discharge.max(1.0 - record.soc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::climate::ClimateSeries;

    fn inputs() -> SimulationInputs {
        SimulationInputs {
            pv_capacity_kw: 300.0,
            battery_capacity_kwh: 600.0,
            diesel_capacity_kw: 150.0,
            annual_demand_kwh: 1_000_000.0,
            climate: ClimateSeries::constant(500.0, 26.0),
            diurnal_shape: None,
            params: DispatchParams::default(),
        }
    }

    #[test]
    fn default_inputs_validate() {
        assert!(inputs().validate().is_ok());
    }

    #[test]
    fn zero_capacities_are_valid() {
        let mut i = inputs();
        i.pv_capacity_kw = 0.0;
        i.battery_capacity_kwh = 0.0;
        i.diesel_capacity_kw = 0.0;
        assert!(i.validate().is_ok());
    }

    #[test]
    fn negative_capacity_rejected() {
        let mut i = inputs();
        i.diesel_capacity_kw = -1.0;
        let err = i.validate().unwrap_err();
        assert_eq!(err.field, "diesel_capacity_kw");
    }

    #[test]
    fn zero_demand_rejected() {
        let mut i = inputs();
        i.annual_demand_kwh = 0.0;
        let err = i.validate().unwrap_err();
        assert_eq!(err.field, "annual_demand_kwh");
    }

    #[test]
    fn short_climate_rejected() {
        let mut i = inputs();
        i.climate.irradiance_wm2.truncate(100);
        let err = i.validate().unwrap_err();
        assert_eq!(err.field, "climate.irradiance_wm2");
    }

    #[test]
    fn bad_shape_sum_rejected() {
        let mut i = inputs();
        i.diurnal_shape = Some([1.0; HOURS_PER_DAY]);
        let err = i.validate().unwrap_err();
        assert_eq!(err.field, "diurnal_shape");
    }

    #[test]
    fn bad_break_hour_rejected() {
        let mut i = inputs();
        i.params.break_hour = 23;
        let err = i.validate().unwrap_err();
        assert_eq!(err.field, "params.break_hour");
    }

    #[test]
    fn bad_efficiency_rejected() {
        let mut i = inputs();
        i.params.charge_efficiency = 0.0;
        let err = i.validate().unwrap_err();
        assert_eq!(err.field, "params.charge_efficiency");
    }

    #[test]
    fn accumulators_count_flagged_hours() {
        let mut acc = Accumulators::default();
        let mut record = HourRecord {
            hour: 0,
            demand_kwh: 100.0,
            pv_kwh: 80.0,
            diesel_kwh: 20.0,
            battery_discharge_kwh: 0.0,
            battery_charge_kwh: 0.0,
            curtailed_kwh: 0.0,
            unmet_kwh: 5.0,
            fuel_litres: 17.1,
            soc: 0.4,
        };
        acc.absorb(&record);
        record.unmet_kwh = 0.0;
        record.diesel_kwh = 0.0;
        record.curtailed_kwh = 3.0;
        record.soc = 0.9;
        acc.absorb(&record);

        assert_eq!(acc.diesel_hours, 1);
        assert_eq!(acc.unmet_hours, 1);
        assert_eq!(acc.curtailment_hours, 1);
        assert!((acc.soc_sum - 1.3).abs() < 1e-12);
        assert!((acc.max_depth_of_discharge - 0.6).abs() < 1e-12);
    }
}

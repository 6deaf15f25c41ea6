//! Immutable single-year dispatch result and derived ratios.

use std::fmt;

use super::types::{Accumulators, HOURS_PER_YEAR};

/// Everything downstream cost/emission calculators read from one year of
/// dispatch. Stored values are the inputs and raw totals; the summary
/// ratios are derived on demand and never stored redundantly.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchResult {
    /// Installed photovoltaic capacity (kW).
    pub pv_capacity_kw: f64,
    /// Battery nameplate energy capacity (kWh).
    pub battery_capacity_kwh: f64,
    /// Diesel generator nameplate capacity (kW).
    pub diesel_capacity_kw: f64,
    /// Annual demand energy requested (kWh).
    pub annual_demand_kwh: f64,
    /// Total photovoltaic generation (kWh).
    pub pv_generation_kwh: f64,
    /// Total diesel generation (kWh).
    pub diesel_generation_kwh: f64,
    /// Total energy delivered by the battery (kWh).
    pub battery_discharge_kwh: f64,
    /// Total renewable surplus discarded (kWh).
    pub curtailment_kwh: f64,
    /// Total demand left unserved (kWh).
    pub unmet_kwh: f64,
    /// Total diesel fuel consumed (litres).
    pub fuel_litres: f64,
    /// Hours with the diesel generator running.
    pub diesel_hours: usize,
    /// Hours with unserved demand.
    pub unmet_hours: usize,
    /// Hours with curtailed surplus.
    pub curtailment_hours: usize,
    /// Mean battery state of charge over the year.
    pub average_soc: f64,
    /// Deepest depth of discharge reached (1 - SOC).
    pub max_depth_of_discharge: f64,
    /// Cumulative battery wear in equivalent full cycles (wear formula).
    pub battery_wear_cycles: f64,
    /// Equivalent full cycles as discharge over nameplate energy.
    pub equivalent_cycles: f64,
}

impl DispatchResult {
    /// Packages the year's accumulators into an immutable result.
    pub fn from_accumulators(
        acc: &Accumulators,
        pv_capacity_kw: f64,
        battery_capacity_kwh: f64,
        diesel_capacity_kw: f64,
        annual_demand_kwh: f64,
        battery_wear_cycles: f64,
    ) -> Self {
        let equivalent_cycles = if battery_capacity_kwh > 0.0 {
            acc.battery_discharge_kwh / battery_capacity_kwh
        } else {
            0.0
        };
        Self {
            pv_capacity_kw,
            battery_capacity_kwh,
            diesel_capacity_kw,
            annual_demand_kwh,
            pv_generation_kwh: acc.pv_kwh,
            diesel_generation_kwh: acc.diesel_kwh,
            battery_discharge_kwh: acc.battery_discharge_kwh,
            curtailment_kwh: acc.curtailed_kwh,
            unmet_kwh: acc.unmet_kwh,
            fuel_litres: acc.fuel_litres,
            diesel_hours: acc.diesel_hours,
            unmet_hours: acc.unmet_hours,
            curtailment_hours: acc.curtailment_hours,
            average_soc: acc.soc_sum / HOURS_PER_YEAR as f64,
            max_depth_of_discharge: acc.max_depth_of_discharge,
            battery_wear_cycles,
            equivalent_cycles,
        }
    }

    /// Generated energy over nameplate potential of the generating fleet.
    pub fn effective_capacity_factor(&self) -> f64 {
        ratio(
            self.pv_generation_kwh + self.diesel_generation_kwh,
            (self.pv_capacity_kw + self.diesel_capacity_kw) * HOURS_PER_YEAR as f64,
        )
    }

    /// Discarded surplus as a fraction of photovoltaic generation.
    pub fn curtailment_fraction(&self) -> f64 {
        ratio(self.curtailment_kwh, self.pv_generation_kwh)
    }

    /// Diesel's share of total generation.
    pub fn diesel_share(&self) -> f64 {
        ratio(
            self.diesel_generation_kwh,
            self.pv_generation_kwh + self.diesel_generation_kwh,
        )
    }

    /// Loss of power supply probability: unserved over requested energy.
    pub fn lpsp(&self) -> f64 {
        ratio(self.unmet_kwh, self.annual_demand_kwh)
    }

    /// Mean daily cycle depth: discharge over nameplate energy per day.
    pub fn battery_utilization(&self) -> f64 {
        ratio(
            self.battery_discharge_kwh,
            self.battery_capacity_kwh * (HOURS_PER_YEAR / 24) as f64,
        )
    }
}

/// Zero-denominator-safe division: summary ratios report 0, never NaN.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

impl fmt::Display for DispatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Annual Dispatch Report ---")?;
        writeln!(
            f,
            "Capacities:            pv={:.0} kW  battery={:.0} kWh  diesel={:.0} kW",
            self.pv_capacity_kw, self.battery_capacity_kwh, self.diesel_capacity_kw
        )?;
        writeln!(f, "Demand:                {:.0} kWh", self.annual_demand_kwh)?;
        writeln!(
            f,
            "Generation:            pv={:.0} kWh  diesel={:.0} kWh (share {:.1}%)",
            self.pv_generation_kwh,
            self.diesel_generation_kwh,
            self.diesel_share() * 100.0
        )?;
        writeln!(
            f,
            "Battery:               discharged={:.0} kWh  avg SoC={:.1}%  max DoD={:.1}%",
            self.battery_discharge_kwh,
            self.average_soc * 100.0,
            self.max_depth_of_discharge * 100.0
        )?;
        writeln!(
            f,
            "Cycling:               {:.1} equivalent cycles  wear={:.2} cycles",
            self.equivalent_cycles, self.battery_wear_cycles
        )?;
        writeln!(
            f,
            "Fuel:                  {:.0} L over {} diesel hours",
            self.fuel_litres, self.diesel_hours
        )?;
        writeln!(
            f,
            "Curtailment:           {:.0} kWh ({:.1}% of pv, {} hours)",
            self.curtailment_kwh,
            self.curtailment_fraction() * 100.0,
            self.curtailment_hours
        )?;
        write!(
            f,
            "Reliability:           unmet={:.0} kWh  LPSP={:.3}%  ({} hours short)",
            self.unmet_kwh,
            self.lpsp() * 100.0,
            self.unmet_hours
        )
    }
}

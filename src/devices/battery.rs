//! Battery state-of-charge tracker with wear accounting.

use crate::sim::types::DispatchParams;

/// Result of a charge request: what the battery absorbed and what it could not.
#[derive(Debug, Clone, Copy)]
pub struct ChargeOutcome {
    /// Energy actually absorbed, measured at the battery input (kWh).
    pub absorbed_kwh: f64,
    /// Requested energy the battery had no room for (kWh).
    pub curtailed_kwh: f64,
}

/// A stationary battery with SOC bookkeeping and end-of-day wear updates.
///
/// SOC is a fraction of nameplate energy and is clamped to [0.0, 1.0]
/// after every operation. Discharge additionally respects the
/// depth-of-discharge floor (`1 - dod_ceiling`): demand the floor blocks
/// is reported as undelivered, never as negative SOC.
///
/// A zero-capacity battery is a valid degenerate instance: charge and
/// discharge become no-ops that report everything as curtailed/undelivered.
#[derive(Debug, Clone)]
pub struct Battery {
    /// Nameplate energy capacity in kilowatt-hours.
    pub capacity_kwh: f64,
    /// State of charge as a fraction (0.0 to 1.0).
    soc: f64,
    eta_charge: f64,
    eta_discharge: f64,
    self_discharge_rate: f64,
    dod_ceiling: f64,
    cycle_coefficient_a: f64,
    cycle_coefficient_b: f64,
    /// Sum of |ΔSOC| from charge/discharge since the last day boundary.
    day_swing: f64,
    /// Deepest depth of discharge seen since the last day boundary.
    day_max_dod: f64,
    /// Cumulative wear in equivalent full cycles.
    wear_cycles: f64,
}

impl Battery {
    /// Creates a battery from nameplate capacity and dispatch parameters.
    ///
    /// # Panics
    ///
    /// Panics if `capacity_kwh` is negative or the initial SOC is out of
    /// range (both are caught earlier by input validation).
    pub fn new(capacity_kwh: f64, params: &DispatchParams) -> Self {
        assert!(capacity_kwh >= 0.0);
        assert!((0.0..=1.0).contains(&params.initial_soc));
        Self {
            capacity_kwh,
            soc: params.initial_soc,
            eta_charge: params.charge_efficiency,
            eta_discharge: params.discharge_efficiency,
            self_discharge_rate: params.self_discharge_rate,
            dod_ceiling: params.dod_ceiling,
            cycle_coefficient_a: params.cycle_coefficient_a,
            cycle_coefficient_b: params.cycle_coefficient_b,
            day_swing: 0.0,
            day_max_dod: 0.0,
            wear_cycles: 0.0,
        }
    }

    /// Current state of charge (0.0 to 1.0).
    pub fn soc(&self) -> f64 {
        self.soc
    }

    /// Cumulative wear in equivalent full cycles.
    pub fn wear_cycles(&self) -> f64 {
        self.wear_cycles
    }

    /// SOC floor below which discharge must not drive the battery.
    pub fn dod_floor(&self) -> f64 {
        1.0 - self.dod_ceiling
    }

    /// Discharge energy the dispatch policy treats as available (kWh).
    ///
    /// This is the optimistic `soc * capacity * eta_discharge` view the
    /// reference policy branches on; the DoD floor is enforced only inside
    /// [`Battery::discharge`].
    pub fn available_kwh(&self) -> f64 {
        self.soc * self.capacity_kwh * self.eta_discharge
    }

    /// Stored-energy headroom up to full charge (kWh, battery side).
    pub fn headroom_kwh(&self) -> f64 {
        (1.0 - self.soc) * self.capacity_kwh
    }

    /// Hourly self-discharge, applied once before any other operation.
    pub fn apply_self_discharge(&mut self) {
        self.soc *= 1.0 - self.self_discharge_rate;
        self.settle();
    }

    /// Attempts to absorb `requested_kwh` of surplus energy.
    ///
    /// Absorption is limited by the remaining headroom; the charge
    /// efficiency is paid on the way in. Returns what was absorbed and the
    /// remainder the caller must treat as curtailed.
    pub fn charge(&mut self, requested_kwh: f64) -> ChargeOutcome {
        if requested_kwh <= 0.0 || self.capacity_kwh <= 0.0 {
            return ChargeOutcome {
                absorbed_kwh: 0.0,
                curtailed_kwh: requested_kwh.max(0.0),
            };
        }
        let headroom_input_kwh = (1.0 - self.soc) * self.capacity_kwh / self.eta_charge;
        let absorbed_kwh = requested_kwh.min(headroom_input_kwh);
        let soc_before = self.soc;
        self.soc += self.eta_charge * absorbed_kwh / self.capacity_kwh;
        self.settle();
        self.day_swing += (self.soc - soc_before).abs();
        ChargeOutcome {
            absorbed_kwh,
            curtailed_kwh: requested_kwh - absorbed_kwh,
        }
    }

    /// Attempts to deliver `requested_kwh` of energy to the load.
    ///
    /// Delivery is limited by the energy above the DoD floor, scaled by the
    /// discharge efficiency. Returns the energy actually delivered; the
    /// caller books any shortfall as unmet demand.
    pub fn discharge(&mut self, requested_kwh: f64) -> f64 {
        if requested_kwh <= 0.0 || self.capacity_kwh <= 0.0 {
            return 0.0;
        }
        let floor = self.dod_floor();
        let available_kwh = (self.soc - floor).max(0.0) * self.capacity_kwh * self.eta_discharge;
        let delivered_kwh = requested_kwh.min(available_kwh);
        if delivered_kwh <= 0.0 {
            return 0.0;
        }
        let soc_before = self.soc;
        self.soc -= delivered_kwh / (self.eta_discharge * self.capacity_kwh);
        // Rounding must not push SOC under the floor the availability
        // computation already honored.
        self.soc = self.soc.max(floor);
        self.settle();
        self.day_swing += (soc_before - self.soc).abs();
        delivered_kwh
    }

    /// End-of-day wear update, invoked when the hour-of-day wraps past 23.
    ///
    /// The day's SOC swings are converted into equivalent full cycles by a
    /// power-law cycle-life curve evaluated at the day's deepest DoD, then
    /// the daily tracking buffers reset. Returns the wear increment.
    pub fn end_of_day_update(&mut self) -> f64 {
        let stress_dod = (self.day_max_dod * self.dod_ceiling).max(0.1);
        let cycle_life = self.cycle_coefficient_a * stress_dod.powf(self.cycle_coefficient_b);
        let increment = self.day_swing / cycle_life;
        self.wear_cycles += increment;
        self.day_swing = 0.0;
        self.day_max_dod = 0.0;
        increment
    }

    /// Clamps SOC into [0.0, 1.0] and refreshes the daily max-DoD buffer.
    fn settle(&mut self) {
        self.soc = self.soc.clamp(0.0, 1.0);
        self.day_max_dod = self.day_max_dod.max(1.0 - self.soc);
    }
}

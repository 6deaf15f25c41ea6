//! Temperature-derated photovoltaic generation model.

use crate::sim::types::DispatchParams;

/// Reference cell temperature for the derating correction (°C).
const REFERENCE_CELL_TEMP_C: f64 = 25.0;

/// A photovoltaic array converting an hourly climate sample into output.
///
/// Output follows the NOCT cell-temperature model: irradiance heats the
/// cell above ambient, and every degree above 25 °C costs a fixed fraction
/// of output. Stateless; one instance serves the whole year.
#[derive(Debug, Clone)]
pub struct SolarArray {
    /// Installed capacity in kilowatts.
    pub capacity_kw: f64,
    /// Whole-system derating factor (soiling, wiring, inverter).
    system_derating: f64,
    /// Fraction of output lost per °C of cell temperature above 25 °C.
    temp_coefficient: f64,
    /// Cell-temperature rise per kW/m² of irradiance.
    noct_coefficient: f64,
}

impl SolarArray {
    /// Creates a new array from installed capacity and dispatch parameters.
    ///
    /// # Panics
    ///
    /// Panics if `capacity_kw` is negative.
    pub fn new(capacity_kw: f64, params: &DispatchParams) -> Self {
        assert!(capacity_kw >= 0.0);
        Self {
            capacity_kw,
            system_derating: params.system_derating,
            temp_coefficient: params.temp_coefficient,
            noct_coefficient: params.noct_coefficient,
        }
    }

    /// Instantaneous output for one climate sample.
    ///
    /// Never negative; exactly zero at zero irradiance.
    pub fn power_kw(&self, irradiance_wm2: f64, ambient_temp_c: f64) -> f64 {
        let irradiance_kw = (irradiance_wm2 / 1000.0).max(0.0);
        if irradiance_kw <= 0.0 {
            return 0.0;
        }
        let cell_temp_c = ambient_temp_c + self.noct_coefficient * irradiance_kw;
        let derate =
            (1.0 - self.temp_coefficient * (cell_temp_c - REFERENCE_CELL_TEMP_C)).max(0.0);
        (self.capacity_kw * self.system_derating * irradiance_kw * derate).max(0.0)
    }
}

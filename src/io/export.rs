//! CSV export for hourly dispatch telemetry.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::HourRecord;

/// Column header for hourly telemetry export.
const HEADER: &str = "hour,demand_kwh,pv_kwh,diesel_kwh,battery_discharge_kwh,\
                      battery_charge_kwh,curtailed_kwh,unmet_kwh,fuel_litres,soc";

/// Exports hourly records to a CSV file at the given path.
///
/// Writes a header row followed by one data row per hour. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(records: &[HourRecord], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(records, buf)
}

/// Writes hourly records as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(records: &[HourRecord], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    // Header
    wtr.write_record(HEADER.split(',').map(str::trim))?;

    // Data rows
    for r in records {
        wtr.write_record(&[
            r.hour.to_string(),
            format!("{:.4}", r.demand_kwh),
            format!("{:.4}", r.pv_kwh),
            format!("{:.4}", r.diesel_kwh),
            format!("{:.4}", r.battery_discharge_kwh),
            format!("{:.4}", r.battery_charge_kwh),
            format!("{:.4}", r.curtailed_kwh),
            format!("{:.4}", r.unmet_kwh),
            format!("{:.4}", r.fuel_litres),
            format!("{:.6}", r.soc),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

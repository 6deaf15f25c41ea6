//! Hourly climate series: validated container, file loader, synthetic generator.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::sim::types::{DAYS_PER_YEAR, HOURS_PER_DAY, HOURS_PER_YEAR, InputError};

/// Metadata lines at the top of a climate data file, skipped unparsed.
pub const HEADER_LINES: usize = 22;
/// Zero-based index of the data column holding the measured value.
/// Row layout: `year,month,day,hour,value,flag`.
pub const VALUE_COLUMN: usize = 4;

/// First daylight hour of the synthetic tropical day (inclusive).
const SYNTHETIC_SUNRISE_HOUR: usize = 6;
/// Last daylight hour of the synthetic tropical day (exclusive).
const SYNTHETIC_SUNSET_HOUR: usize = 18;
/// Clear-sky peak irradiance of the synthetic tropical day (W/m²).
const SYNTHETIC_PEAK_WM2: f64 = 980.0;
/// Cloud multiplier bounds for the synthetic AR(1) process.
const CLOUD_MULTIPLIER_MIN: f64 = 0.2;
const CLOUD_MULTIPLIER_MAX: f64 = 1.2;

/// Two aligned hourly arrays covering one simulated year.
///
/// Construction validates the one-year contract: both arrays must carry at
/// least [`HOURS_PER_YEAR`] entries. Extra trailing entries are tolerated
/// (the engine ignores them); shorter arrays are a structured error, never
/// a silent truncation.
#[derive(Debug, Clone, PartialEq)]
pub struct ClimateSeries {
    /// Global horizontal irradiance per hour (W/m²).
    pub irradiance_wm2: Vec<f64>,
    /// Ambient air temperature per hour (°C).
    pub ambient_temp_c: Vec<f64>,
}

impl ClimateSeries {
    /// Builds a series from two pre-loaded arrays.
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] if either array is shorter than one year.
    pub fn new(irradiance_wm2: Vec<f64>, ambient_temp_c: Vec<f64>) -> Result<Self, InputError> {
        if irradiance_wm2.len() < HOURS_PER_YEAR {
            return Err(InputError::new(
                "climate.irradiance_wm2",
                format!(
                    "needs {HOURS_PER_YEAR} hourly entries, got {}",
                    irradiance_wm2.len()
                ),
            ));
        }
        if ambient_temp_c.len() < HOURS_PER_YEAR {
            return Err(InputError::new(
                "climate.ambient_temp_c",
                format!(
                    "needs {HOURS_PER_YEAR} hourly entries, got {}",
                    ambient_temp_c.len()
                ),
            ));
        }
        Ok(Self {
            irradiance_wm2,
            ambient_temp_c,
        })
    }

    /// A flat series, mostly useful in tests and degenerate experiments.
    pub fn constant(irradiance_wm2: f64, ambient_temp_c: f64) -> Self {
        Self {
            irradiance_wm2: vec![irradiance_wm2; HOURS_PER_YEAR],
            ambient_temp_c: vec![ambient_temp_c; HOURS_PER_YEAR],
        }
    }

    /// Generates a representative tropical-island year from a seed.
    ///
    /// Irradiance follows a half-sine daylight arc (06:00 to 18:00) with a
    /// mild seasonal modulation and an AR(1) cloud multiplier, so cloudy
    /// spells persist for hours rather than flickering per sample.
    /// Temperature is a diurnal sinusoid around 26 °C with small Gaussian
    /// noise. Deterministic for a fixed seed.
    pub fn synthetic_tropical(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut irradiance = Vec::with_capacity(HOURS_PER_YEAR);
        let mut temperature = Vec::with_capacity(HOURS_PER_YEAR);
        let mut cloud = 1.0_f64;

        for day in 0..DAYS_PER_YEAR {
            // Tropics: a few percent of seasonal swing, nothing more.
            let seasonal =
                0.95 + 0.05 * (2.0 * std::f64::consts::PI * day as f64 / DAYS_PER_YEAR as f64).cos();
            for hour in 0..HOURS_PER_DAY {
                let epsilon = gaussian_noise(&mut rng, 0.25);
                cloud = (0.9 * cloud + 0.1 * (1.0 + epsilon))
                    .clamp(CLOUD_MULTIPLIER_MIN, CLOUD_MULTIPLIER_MAX);

                let arc = daylight_arc(hour);
                irradiance.push(SYNTHETIC_PEAK_WM2 * seasonal * arc * cloud);

                let diurnal = (2.0 * std::f64::consts::PI * (hour as f64 - 15.0) / 24.0).cos();
                temperature.push(26.0 + 2.5 * diurnal + gaussian_noise(&mut rng, 0.3));
            }
        }
        Self {
            irradiance_wm2: irradiance,
            ambient_temp_c: temperature,
        }
    }
}

/// Half-sine daylight fraction for the synthetic day, 0.0 outside daylight.
fn daylight_arc(hour: usize) -> f64 {
    if hour < SYNTHETIC_SUNRISE_HOUR || hour >= SYNTHETIC_SUNSET_HOUR {
        return 0.0;
    }
    let span = (SYNTHETIC_SUNSET_HOUR - SYNTHETIC_SUNRISE_HOUR) as f64;
    let position = (hour as f64 + 0.5 - SYNTHETIC_SUNRISE_HOUR as f64) / span;
    (std::f64::consts::PI * position).sin().max(0.0)
}

/// Gaussian noise via the Box-Muller transform.
fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }
    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z0 * std_dev
}

/// Failure while loading a climate data file.
#[derive(Debug)]
pub struct ClimateError {
    /// File the failure occurred in.
    pub path: PathBuf,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for ClimateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "climate file \"{}\": {}",
            self.path.display(),
            self.message
        )
    }
}

impl std::error::Error for ClimateError {}

/// Loads a climate series from two fixed-layout data files.
///
/// Each file carries [`HEADER_LINES`] metadata lines followed by
/// comma-separated `year,month,day,hour,value,flag` rows; the loader reads
/// the `value` column and requires at least one year of usable rows.
///
/// # Errors
///
/// Returns a [`ClimateError`] on I/O failure, malformed rows, or fewer
/// than 8,760 usable rows in either file.
pub fn load_climate_files(
    irradiance_path: &Path,
    temperature_path: &Path,
) -> Result<ClimateSeries, ClimateError> {
    let irradiance = load_value_column(irradiance_path)?;
    let temperature = load_value_column(temperature_path)?;
    // Lengths were checked per file; this cannot fail here.
    ClimateSeries::new(irradiance, temperature).map_err(|e| ClimateError {
        path: irradiance_path.to_path_buf(),
        message: e.to_string(),
    })
}

fn load_value_column(path: &Path) -> Result<Vec<f64>, ClimateError> {
    let err = |message: String| ClimateError {
        path: path.to_path_buf(),
        message,
    };

    let content = fs::read_to_string(path).map_err(|e| err(format!("cannot read: {e}")))?;
    let mut remainder = content.lines();
    for n in 0..HEADER_LINES {
        if remainder.next().is_none() {
            return Err(err(format!(
                "file ends inside the {HEADER_LINES}-line header (line {n})"
            )));
        }
    }
    let data = remainder.collect::<Vec<_>>().join("\n");

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data.as_bytes());

    let mut values = Vec::with_capacity(HOURS_PER_YEAR);
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| err(format!("data row {row}: {e}")))?;
        let field = record
            .get(VALUE_COLUMN)
            .ok_or_else(|| err(format!("data row {row}: missing column {VALUE_COLUMN}")))?;
        let value: f64 = field
            .trim()
            .parse()
            .map_err(|_| err(format!("data row {row}: \"{field}\" is not a number")))?;
        values.push(value);
    }

    if values.len() < HOURS_PER_YEAR {
        return Err(err(format!(
            "needs {HOURS_PER_YEAR} usable rows, got {}",
            values.len()
        )));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn new_rejects_short_arrays() {
        let err = ClimateSeries::new(vec![0.0; 100], vec![0.0; HOURS_PER_YEAR]).unwrap_err();
        assert_eq!(err.field, "climate.irradiance_wm2");
        let err = ClimateSeries::new(vec![0.0; HOURS_PER_YEAR], vec![0.0; 100]).unwrap_err();
        assert_eq!(err.field, "climate.ambient_temp_c");
    }

    #[test]
    fn new_tolerates_extra_trailing_entries() {
        let series =
            ClimateSeries::new(vec![0.0; HOURS_PER_YEAR + 24], vec![0.0; HOURS_PER_YEAR + 24]);
        assert!(series.is_ok());
    }

    #[test]
    fn synthetic_is_deterministic_per_seed() {
        let a = ClimateSeries::synthetic_tropical(7);
        let b = ClimateSeries::synthetic_tropical(7);
        assert_eq!(a, b);
        let c = ClimateSeries::synthetic_tropical(8);
        assert_ne!(a, c);
    }

    #[test]
    fn synthetic_has_dark_nights_and_bright_days() {
        let climate = ClimateSeries::synthetic_tropical(42);
        assert_eq!(climate.irradiance_wm2.len(), HOURS_PER_YEAR);
        for day in [0, 100, 250] {
            assert_eq!(climate.irradiance_wm2[day * 24 + 2], 0.0);
            assert!(climate.irradiance_wm2[day * 24 + 12] > 150.0);
        }
        assert!(climate.irradiance_wm2.iter().all(|v| *v >= 0.0));
    }

    #[test]
    fn synthetic_temperature_is_tropical() {
        let climate = ClimateSeries::synthetic_tropical(42);
        let mean: f64 =
            climate.ambient_temp_c.iter().sum::<f64>() / climate.ambient_temp_c.len() as f64;
        assert!((20.0..32.0).contains(&mean), "mean temp was {mean}");
    }

    fn write_climate_file(path: &Path, rows: usize, value: f64) {
        let mut file = fs::File::create(path).expect("create temp file");
        for n in 0..HEADER_LINES {
            writeln!(file, "# metadata line {n}").expect("write header");
        }
        for row in 0..rows {
            let hour = row % 24;
            writeln!(file, "2024,1,{},{hour},{value},0", row / 24 + 1).expect("write row");
        }
    }

    #[test]
    fn loader_reads_the_value_column() {
        let dir = std::env::temp_dir();
        let irr = dir.join("microgrid_sim_test_irr.csv");
        let temp = dir.join("microgrid_sim_test_temp.csv");
        write_climate_file(&irr, HOURS_PER_YEAR, 500.0);
        write_climate_file(&temp, HOURS_PER_YEAR, 26.5);

        let climate = load_climate_files(&irr, &temp).expect("load should succeed");
        assert_eq!(climate.irradiance_wm2.len(), HOURS_PER_YEAR);
        assert_eq!(climate.irradiance_wm2[0], 500.0);
        assert_eq!(climate.ambient_temp_c[123], 26.5);

        fs::remove_file(irr).ok();
        fs::remove_file(temp).ok();
    }

    #[test]
    fn loader_rejects_short_files() {
        let dir = std::env::temp_dir();
        let irr = dir.join("microgrid_sim_test_short_irr.csv");
        let temp = dir.join("microgrid_sim_test_short_temp.csv");
        write_climate_file(&irr, 100, 500.0);
        write_climate_file(&temp, HOURS_PER_YEAR, 26.5);

        let err = load_climate_files(&irr, &temp).unwrap_err();
        assert!(err.message.contains("usable rows"), "got: {}", err.message);

        fs::remove_file(irr).ok();
        fs::remove_file(temp).ok();
    }

    #[test]
    fn loader_rejects_missing_file() {
        let missing = Path::new("/nonexistent/microgrid_sim_irr.csv");
        let err = load_climate_files(missing, missing).unwrap_err();
        assert!(err.message.contains("cannot read"));
    }

    #[test]
    fn loader_rejects_non_numeric_values() {
        let dir = std::env::temp_dir();
        let irr = dir.join("microgrid_sim_test_bad_irr.csv");
        let temp = dir.join("microgrid_sim_test_bad_temp.csv");
        let mut file = fs::File::create(&irr).expect("create temp file");
        for n in 0..HEADER_LINES {
            writeln!(file, "# metadata line {n}").expect("write header");
        }
        writeln!(file, "2024,1,1,0,not_a_number,0").expect("write row");
        drop(file);
        write_climate_file(&temp, HOURS_PER_YEAR, 26.5);

        let err = load_climate_files(&irr, &temp).unwrap_err();
        assert!(err.message.contains("not a number"), "got: {}", err.message);

        fs::remove_file(irr).ok();
        fs::remove_file(temp).ok();
    }
}

//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::climate::ClimateSeries;
use crate::sim::types::{DispatchParams, HOURS_PER_DAY, SHAPE_SUM_TOLERANCE, SimulationInputs};

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from TOML
/// with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Installed capacities and annual demand.
    pub system: SystemConfig,
    /// Dispatch methodology parameters.
    pub dispatch: DispatchParams,
    /// Where the hourly climate year comes from.
    pub climate: ClimateConfig,
    /// Demand profile overrides.
    pub load: LoadConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self::baseline()
    }
}

/// Installed capacities and annual demand.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SystemConfig {
    /// Installed photovoltaic capacity (kW).
    pub pv_capacity_kw: f64,
    /// Battery nameplate energy capacity (kWh).
    pub battery_capacity_kwh: f64,
    /// Diesel generator nameplate capacity (kW).
    pub diesel_capacity_kw: f64,
    /// Annual demand energy (kWh, must be > 0).
    pub annual_demand_kwh: f64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            pv_capacity_kw: 300.0,
            battery_capacity_kwh: 600.0,
            diesel_capacity_kw: 150.0,
            annual_demand_kwh: 1_000_000.0,
        }
    }
}

/// Climate source selection: a seeded synthetic year or two data files.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClimateConfig {
    /// Source: `"synthetic"` or `"files"`.
    pub source: String,
    /// Seed for the synthetic tropical year.
    pub seed: u64,
    /// Irradiance data file (required when source = "files").
    pub irradiance_path: Option<PathBuf>,
    /// Temperature data file (required when source = "files").
    pub temperature_path: Option<PathBuf>,
}

impl Default for ClimateConfig {
    fn default() -> Self {
        Self {
            source: "synthetic".to_string(),
            seed: 42,
            irradiance_path: None,
            temperature_path: None,
        }
    }
}

/// Demand profile overrides.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadConfig {
    /// Optional 24-value normalized diurnal shape; omit for the built-in
    /// reference shape.
    pub shape: Option<Vec<f64>>,
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"system.annual_demand_kwh"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario: a mid-size island hybrid system.
    pub fn baseline() -> Self {
        Self {
            system: SystemConfig::default(),
            dispatch: DispatchParams::default(),
            climate: ClimateConfig::default(),
            load: LoadConfig::default(),
        }
    }

    /// Returns the solar-only preset: PV and storage, no genset.
    pub fn solar_only() -> Self {
        Self {
            system: SystemConfig {
                pv_capacity_kw: 500.0,
                battery_capacity_kwh: 1_000.0,
                diesel_capacity_kw: 0.0,
                annual_demand_kwh: 500_000.0,
            },
            ..Self::baseline()
        }
    }

    /// Returns the diesel-only preset: a conventional genset microgrid.
    pub fn diesel_only() -> Self {
        Self {
            system: SystemConfig {
                pv_capacity_kw: 0.0,
                battery_capacity_kwh: 0.0,
                diesel_capacity_kw: 200.0,
                annual_demand_kwh: 500_000.0,
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "solar_only", "diesel_only"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "solar_only" => Ok(Self::solar_only()),
            "diesel_only" => Ok(Self::diesel_only()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.system;

        if !(s.annual_demand_kwh > 0.0) {
            errors.push(ConfigError {
                field: "system.annual_demand_kwh".into(),
                message: "must be > 0".into(),
            });
        }
        for (field, value) in [
            ("system.pv_capacity_kw", s.pv_capacity_kw),
            ("system.battery_capacity_kwh", s.battery_capacity_kwh),
            ("system.diesel_capacity_kw", s.diesel_capacity_kw),
        ] {
            if !value.is_finite() || value < 0.0 {
                errors.push(ConfigError {
                    field: field.into(),
                    message: "must be finite and >= 0".into(),
                });
            }
        }

        let c = &self.climate;
        match c.source.as_str() {
            "synthetic" => {}
            "files" => {
                if c.irradiance_path.is_none() {
                    errors.push(ConfigError {
                        field: "climate.irradiance_path".into(),
                        message: "required when climate.source = \"files\"".into(),
                    });
                }
                if c.temperature_path.is_none() {
                    errors.push(ConfigError {
                        field: "climate.temperature_path".into(),
                        message: "required when climate.source = \"files\"".into(),
                    });
                }
            }
            other => errors.push(ConfigError {
                field: "climate.source".into(),
                message: format!("must be \"synthetic\" or \"files\", got \"{other}\""),
            }),
        }

        if let Some(shape) = &self.load.shape {
            if shape.len() != HOURS_PER_DAY {
                errors.push(ConfigError {
                    field: "load.shape".into(),
                    message: format!("must have {HOURS_PER_DAY} values, got {}", shape.len()),
                });
            } else {
                let sum: f64 = shape.iter().sum();
                if (sum - 1.0).abs() > SHAPE_SUM_TOLERANCE {
                    errors.push(ConfigError {
                        field: "load.shape".into(),
                        message: format!("values must sum to 1.0, got {sum}"),
                    });
                }
                if shape.iter().any(|v| *v < 0.0) {
                    errors.push(ConfigError {
                        field: "load.shape".into(),
                        message: "values must be >= 0".into(),
                    });
                }
            }
        }

        if let Err(e) = self.dispatch.validate() {
            errors.push(ConfigError {
                field: e.field.replace("params.", "dispatch."),
                message: e.message,
            });
        }

        errors
    }

    /// Assembles engine inputs from this configuration and a climate year.
    ///
    /// Call after [`ScenarioConfig::validate`]; the engine revalidates the
    /// assembled inputs anyway.
    pub fn to_inputs(&self, climate: ClimateSeries) -> SimulationInputs {
        let diurnal_shape = self
            .load
            .shape
            .as_deref()
            .and_then(|s| <[f64; HOURS_PER_DAY]>::try_from(s).ok());
        SimulationInputs {
            pv_capacity_kw: self.system.pv_capacity_kw,
            battery_capacity_kwh: self.system.battery_capacity_kwh,
            diesel_capacity_kw: self.system.diesel_capacity_kw,
            annual_demand_kwh: self.system.annual_demand_kwh,
            climate,
            diurnal_shape,
            params: self.dispatch.clone(),
        }
    }
}

//! Run configuration: rainfall event sizes, travel cost and the
//! per-road-type parameter table.

use std::path::Path;

use hashbrown::HashMap;
use serde::Deserialize;

use crate::Error;

/// Runoff and erosion parameters for one road surface type
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RoadTypeParams {
    /// Fraction of rainfall that becomes runoff on this surface
    pub runoff_coefficient: f64,
    /// Sediment mass eroded per unit area and unit rainfall
    pub erosion_rate: f64,
}

/// Configuration for a model run, loaded once before any computation.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Rainfall event sizes (mm) to evaluate, one engine run each
    pub rainfall_values: Vec<f64>,
    /// Travel loss per unit distance along a connecting flow path
    pub travel_cost: f64,
    /// Parameters per road type key appearing in the source data
    pub road_types: HashMap<String, RoadTypeParams>,
}

impl ModelConfig {
    /// Reads and validates a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails validation
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let file = std::fs::File::open(path)?;
        let config: ModelConfig = serde_json::from_reader(std::io::BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the loaded values before any run uses them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] describing the first offending value
    pub fn validate(&self) -> Result<(), Error> {
        if self.rainfall_values.is_empty() {
            return Err(Error::InvalidData(
                "rainfall_values must contain at least one event size".to_string(),
            ));
        }
        for value in &self.rainfall_values {
            if !value.is_finite() || *value < 0.0 {
                return Err(Error::InvalidData(format!(
                    "rainfall_values must be finite and non-negative, got {value}"
                )));
            }
        }

        if !self.travel_cost.is_finite() || self.travel_cost < 0.0 {
            return Err(Error::InvalidData(format!(
                "travel_cost must be finite and non-negative, got {}",
                self.travel_cost
            )));
        }

        if self.road_types.is_empty() {
            return Err(Error::InvalidData(
                "road_types must define at least one road type".to_string(),
            ));
        }
        for (road_type, params) in &self.road_types {
            if !params.runoff_coefficient.is_finite() || params.runoff_coefficient < 0.0 {
                return Err(Error::InvalidData(format!(
                    "runoff_coefficient for '{road_type}' must be finite and non-negative"
                )));
            }
            if !params.erosion_rate.is_finite() || params.erosion_rate < 0.0 {
                return Err(Error::InvalidData(format!(
                    "erosion_rate for '{road_type}' must be finite and non-negative"
                )));
            }
        }

        Ok(())
    }
}

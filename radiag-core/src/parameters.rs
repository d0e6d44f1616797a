//! Diagnostic parameters
//!
//! Settings shared by the diagnostics. They can be constructed in code or read from a
//! TOML document:
//!
//! ```toml
//! mean_method = "trapezoidal"
//! consistency_tolerance = 1e-4
//! ```

use crate::errors::{RadiagError, RadiagResult};
use crate::field::FloatValue;
use crate::spatial::MeanMethod;
use serde::{Deserialize, Serialize};

/// Parameters controlling global means and budget consistency checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticParameters {
    /// Reduction used when diagnostics are collapsed to global means.
    ///
    /// Default: [`MeanMethod::WeightedSum`]
    pub mean_method: MeanMethod,

    /// Largest accepted relative difference between the two energy budget methods.
    ///
    /// The difference is scaled by the larger of the two budget magnitudes (or 1 W/m²
    /// when both are smaller than that).
    /// Default: 1e-6
    pub consistency_tolerance: FloatValue,
}

impl Default for DiagnosticParameters {
    fn default() -> Self {
        Self {
            mean_method: MeanMethod::WeightedSum,
            consistency_tolerance: 1e-6,
        }
    }
}

impl DiagnosticParameters {
    /// Parse and validate parameters from TOML
    ///
    /// Missing keys take their default values.
    pub fn from_toml_str(text: &str) -> RadiagResult<Self> {
        let parameters: Self =
            toml::from_str(text).map_err(|e| RadiagError::InvalidConfiguration(e.to_string()))?;
        parameters.validate()?;
        Ok(parameters)
    }

    /// Serialise to TOML
    pub fn to_toml_string(&self) -> RadiagResult<String> {
        toml::to_string(self).map_err(|e| RadiagError::InvalidConfiguration(e.to_string()))
    }

    pub fn validate(&self) -> RadiagResult<()> {
        if !self.consistency_tolerance.is_finite() || self.consistency_tolerance < 0.0 {
            return Err(RadiagError::InvalidConfiguration(format!(
                "consistency_tolerance must be finite and non-negative, got {}",
                self.consistency_tolerance
            )));
        }
        Ok(())
    }
}

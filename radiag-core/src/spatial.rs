//! Latitude weighting and area-weighted means
//!
//! On a regular latitude-longitude grid, cells shrink towards the poles in proportion
//! to the cosine of latitude. An unweighted mean over such a grid overweights polar
//! cells. This module provides [`LatitudeWeights`], a validated weight vector indexed by
//! latitude, and the reductions built on it:
//!
//! - [`area_weighted_mean`]: `Σ(field·w) / Σ(w)` over the spatial axes, keeping any
//!   leading axes (e.g. time)
//! - [`global_mean`]: the same reduction collapsed to a single value
//! - [`LatitudeWeights::trapezoidal_mean`]: the integral form
//!   `∫ f cosφ dφ / ∫ cosφ dφ` evaluated with the trapezoid rule
//!
//! # Examples
//!
//! ```rust
//! use ndarray::arr1;
//! use radiag_core::spatial::{global_mean, LatitudeWeights};
//!
//! let weights = LatitudeWeights::cosine(&[-60.0, 0.0, 60.0]).unwrap();
//! let field = arr1(&[10.0, 20.0, 30.0]).into_dyn();
//!
//! // (0.5*10 + 1.0*20 + 0.5*30) / (0.5 + 1.0 + 0.5)
//! let mean = global_mean(&field, &weights).unwrap();
//! assert!((mean - 20.0).abs() < 1e-10);
//! ```

use crate::errors::{RadiagError, RadiagResult};
use crate::field::{Field, FloatValue};
use ndarray::{Array1, Axis, IxDyn};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a field is reduced to a global mean
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeanMethod {
    /// Weighted sum of cell values divided by the sum of the weights
    #[default]
    WeightedSum,
    /// Trapezoid-rule integral over latitude (requires latitudes)
    Trapezoidal,
}

impl FromStr for MeanMethod {
    type Err = RadiagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weighted_sum" => Ok(MeanMethod::WeightedSum),
            "trapezoidal" => Ok(MeanMethod::Trapezoidal),
            _ => Err(RadiagError::InvalidConfiguration(format!(
                "unknown mean method '{}'. Expected 'weighted_sum' or 'trapezoidal'",
                s
            ))),
        }
    }
}

/// Positions of the spatial axes within a field
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SpatialAxes {
    pub latitude: usize,
    pub longitude: Option<usize>,
}

impl SpatialAxes {
    /// Axes for the crate-wide layout: `[lat]` or `[..leading, lat, lon]`
    pub fn trailing(ndim: usize) -> RadiagResult<Self> {
        match ndim {
            0 => Err(RadiagError::ShapeMismatch {
                context: "spatial axes".to_string(),
                expected: vec![1],
                found: vec![],
            }),
            1 => Ok(Self {
                latitude: 0,
                longitude: None,
            }),
            n => Ok(Self {
                latitude: n - 2,
                longitude: Some(n - 1),
            }),
        }
    }

    fn validate(&self, shape: &[usize]) -> RadiagResult<()> {
        let ndim = shape.len();
        let out_of_range = self.latitude >= ndim
            || self.longitude.map_or(false, |lon| lon >= ndim || lon == self.latitude);
        if out_of_range {
            return Err(RadiagError::ShapeMismatch {
                context: format!(
                    "spatial axes (latitude={}, longitude={:?})",
                    self.latitude, self.longitude
                ),
                expected: vec![ndim],
                found: shape.to_vec(),
            });
        }
        if let Some(lon) = self.longitude {
            if shape[lon] == 0 {
                return Err(RadiagError::ShapeMismatch {
                    context: "longitude axis is empty".to_string(),
                    expected: vec![1],
                    found: vec![0],
                });
            }
        }
        Ok(())
    }

    /// Spatial axes in descending order, so they can be removed one after another
    fn descending(&self) -> Vec<usize> {
        let mut axes = vec![self.latitude];
        axes.extend(self.longitude);
        axes.sort_unstable_by(|a, b| b.cmp(a));
        axes
    }
}

/// Non-negative weights indexed by latitude
///
/// Weights are usually the cosine of latitude, but any non-negative vector with a
/// positive sum is accepted. Only relative magnitudes matter: every reduction
/// normalises by the total weight.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LatitudeWeights {
    weights: Array1<FloatValue>,
    /// Latitudes (degrees) the weights were derived from, when known
    latitudes: Option<Array1<FloatValue>>,
}

impl LatitudeWeights {
    /// Create weights from explicit values
    ///
    /// Fails with [`RadiagError::InvalidWeights`] if the weights are empty, contain a
    /// negative or non-finite value, or sum to zero.
    pub fn new(weights: Vec<FloatValue>) -> RadiagResult<Self> {
        validate_weights(&weights)?;
        Ok(Self {
            weights: Array1::from(weights),
            latitudes: None,
        })
    }

    /// Create `cos(latitude)` weights from latitudes in degrees
    pub fn cosine(latitudes: &[FloatValue]) -> RadiagResult<Self> {
        if let Some(bad) = latitudes
            .iter()
            .find(|lat| !lat.is_finite() || lat.abs() > 90.0)
        {
            return Err(RadiagError::InvalidCoordinates(format!(
                "latitude {} is outside [-90, 90]",
                bad
            )));
        }

        // cos(90°) is not exactly zero in floating point
        let weights: Vec<FloatValue> = latitudes
            .iter()
            .map(|lat| {
                if lat.abs() == 90.0 {
                    0.0
                } else {
                    lat.to_radians().cos().max(0.0)
                }
            })
            .collect();
        validate_weights(&weights)?;

        Ok(Self {
            weights: Array1::from(weights),
            latitudes: Some(Array1::from(latitudes.to_vec())),
        })
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn weights(&self) -> &Array1<FloatValue> {
        &self.weights
    }

    pub fn latitudes(&self) -> Option<&Array1<FloatValue>> {
        self.latitudes.as_ref()
    }

    /// Reduce a field using the selected method
    pub fn mean_with(&self, field: &Field, method: MeanMethod) -> RadiagResult<Field> {
        match method {
            MeanMethod::WeightedSum => self.mean(field),
            MeanMethod::Trapezoidal => self.trapezoidal_mean(field),
        }
    }

    /// Area-weighted mean over the trailing spatial axes
    pub fn mean(&self, field: &Field) -> RadiagResult<Field> {
        self.mean_along(field, SpatialAxes::trailing(field.ndim())?)
    }

    /// Area-weighted mean over explicitly chosen spatial axes
    ///
    /// Computes `Σ(field·w) / Σ(w)` where the weights are broadcast across the
    /// longitude axis. All other axes are preserved in their original order.
    pub fn mean_along(&self, field: &Field, axes: SpatialAxes) -> RadiagResult<Field> {
        let weighted = self.weight_along(field, axes)?;

        let n_lon = axes.longitude.map_or(1, |lon| field.len_of(Axis(lon)));
        let total_weight = self.weights.sum() * n_lon as FloatValue;

        let summed = axes
            .descending()
            .into_iter()
            .fold(weighted, |acc, axis| acc.sum_axis(Axis(axis)));

        tracing::debug!(
            shape = ?field.shape(),
            reduced_shape = ?summed.shape(),
            "Computed area-weighted mean"
        );
        Ok(summed.mapv(|v| v / total_weight))
    }

    /// Mean from the trapezoid-rule integral over latitude
    ///
    /// Evaluates `∫ f cosφ dφ / ∫ cosφ dφ` with latitude in radians, then averages
    /// longitude with equal weights. The integral is equivalent to a weighted sum in
    /// which each latitude's weight is scaled by half the width of its neighbouring
    /// intervals, which is how it is computed here.
    ///
    /// Requires weights built with [`LatitudeWeights::cosine`] from at least two
    /// strictly monotonic latitudes.
    pub fn trapezoidal_mean(&self, field: &Field) -> RadiagResult<Field> {
        let latitudes = self.latitudes.as_ref().ok_or_else(|| {
            RadiagError::InvalidCoordinates(
                "trapezoidal mean requires weights built from latitudes".to_string(),
            )
        })?;
        if latitudes.len() < 2 {
            return Err(RadiagError::InvalidCoordinates(
                "trapezoidal mean requires at least two latitudes".to_string(),
            ));
        }

        let radians = latitudes.mapv(FloatValue::to_radians);
        let steps: Vec<FloatValue> = radians
            .windows(2)
            .into_iter()
            .map(|pair| pair[1] - pair[0])
            .collect();
        let ascending = steps.iter().all(|&d| d > 0.0);
        let descending = steps.iter().all(|&d| d < 0.0);
        if !(ascending || descending) {
            return Err(RadiagError::InvalidCoordinates(
                "latitudes must be strictly monotonic".to_string(),
            ));
        }

        let n = steps.len();
        let integration_weights: Vec<FloatValue> = self
            .weights
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let left = if i > 0 { steps[i - 1].abs() } else { 0.0 };
                let right = if i < n { steps[i].abs() } else { 0.0 };
                w * 0.5 * (left + right)
            })
            .collect();

        LatitudeWeights::new(integration_weights)?.mean(field)
    }

    /// Multiply a field by its latitude weights without reducing it
    pub fn area_weight_field(&self, field: &Field) -> RadiagResult<Field> {
        self.weight_along(field, SpatialAxes::trailing(field.ndim())?)
    }

    fn weight_along(&self, field: &Field, axes: SpatialAxes) -> RadiagResult<Field> {
        axes.validate(field.shape())?;

        let n_lat = field.len_of(Axis(axes.latitude));
        if n_lat != self.weights.len() {
            return Err(RadiagError::shape_mismatch(
                "latitude weights",
                &[n_lat],
                &[self.weights.len()],
            ));
        }

        let mut weighted = field.to_owned();
        weighted
            .axis_iter_mut(Axis(axes.latitude))
            .zip(self.weights.iter())
            .for_each(|(mut band, &w)| band.mapv_inplace(|v| v * w));
        Ok(weighted)
    }
}

fn validate_weights(weights: &[FloatValue]) -> RadiagResult<()> {
    if weights.is_empty() {
        return Err(RadiagError::InvalidWeights("no weights given".to_string()));
    }
    if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(RadiagError::InvalidWeights(format!(
            "weights must be finite and non-negative, got {}",
            bad
        )));
    }
    let sum: FloatValue = weights.iter().sum();
    if sum <= 0.0 {
        return Err(RadiagError::InvalidWeights(
            "weights sum to zero".to_string(),
        ));
    }
    Ok(())
}

/// Area-weighted mean of a field with a raw weight vector
///
/// The field follows the `[lat]` / `[..leading, lat, lon]` layout. Leading axes are
/// preserved; a 1-D or 2-D field reduces to a 0-d array.
pub fn area_weighted_mean(field: &Field, weights: &[FloatValue]) -> RadiagResult<Field> {
    let weights = LatitudeWeights::new(weights.to_vec())?;
    weights.mean(field)
}

/// Reduce a field to a single global mean value
///
/// Fails with [`RadiagError::ShapeMismatch`] if the field has leading axes, since those
/// would leave more than one value.
pub fn global_mean(field: &Field, weights: &LatitudeWeights) -> RadiagResult<FloatValue> {
    global_mean_with(field, weights, MeanMethod::WeightedSum)
}

/// [`global_mean`] with a selectable reduction method
pub fn global_mean_with(
    field: &Field,
    weights: &LatitudeWeights,
    method: MeanMethod,
) -> RadiagResult<FloatValue> {
    let reduced = weights.mean_with(field, method)?;
    if reduced.ndim() != 0 {
        return Err(RadiagError::shape_mismatch(
            "global mean (leading axes remain)",
            &[],
            reduced.shape(),
        ));
    }
    Ok(reduced[IxDyn(&[])])
}

//! Flux fields and their names
//!
//! A [`Field`] is a gridded radiative flux in W/m². Fields are plain
//! [`ndarray::ArrayD`] values with the axis convention used throughout the crate:
//!
//! - a 1-D field is `[lat]` (time-mean, zonal-mean data)
//! - an N-D field is `[..leading, lat, lon]`, where leading axes (e.g. time) are
//!   carried through untouched
//!
//! Input fluxes are identified by a [`FluxName`], which pairs one of the seven
//! directional flux components with a sky condition. Names render as the short keys
//! commonly used for radiation output (`swut`, `lwds_cs`, ...).
//!
//! # Sign convention
//!
//! Net fluxes are downward-positive. See [`FluxSet::net_downward_flux`] for how the
//! directional components are combined.
//!
//! # Examples
//!
//! ```rust
//! use ndarray::arr1;
//! use radiag_core::field::{Band, FluxComponent, FluxName, FluxSet, Level, Sky};
//!
//! let fluxes = FluxSet::new()
//!     .with(FluxName::all_sky(FluxComponent::SwDownToa), arr1(&[340.0]).into_dyn())
//!     .with(FluxName::all_sky(FluxComponent::SwUpToa), arr1(&[100.0]).into_dyn());
//!
//! let net = fluxes
//!     .net_downward_flux(Band::Shortwave, Level::Toa, Sky::All)
//!     .unwrap();
//! assert_eq!(net[[0]], 240.0);
//! ```

use crate::errors::{RadiagError, RadiagResult};
use ndarray::ArrayD;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Floating point type used for all flux values
pub type FloatValue = f64;

/// A gridded flux field (W/m²)
pub type Field = ArrayD<FloatValue>;

/// Spectral band of a flux
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Band {
    Shortwave,
    Longwave,
}

/// Atmospheric level at which a flux is diagnosed
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    /// Top of atmosphere
    Toa,
    Surface,
}

/// Direction of a flux component
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
}

/// Sky condition of a flux
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sky {
    /// All-sky flux (cloudy and clear regions together)
    All,
    /// Clear-sky flux (computed with clouds removed)
    Clear,
}

/// One of the directional flux components making up a radiation budget
///
/// Longwave has no downward component at the top of atmosphere, so there are seven
/// rather than eight components.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FluxComponent {
    /// Reflected shortwave at the top of atmosphere
    SwUpToa,
    /// Incoming solar radiation at the top of atmosphere
    SwDownToa,
    /// Reflected shortwave at the surface
    SwUpSurface,
    /// Shortwave reaching the surface
    SwDownSurface,
    /// Outgoing longwave radiation
    LwUpToa,
    /// Longwave emitted by the surface
    LwUpSurface,
    /// Longwave emitted by the atmosphere towards the surface
    LwDownSurface,
}

impl FluxComponent {
    /// Every flux component, in the conventional key order
    pub const ALL: [FluxComponent; 7] = [
        FluxComponent::SwUpToa,
        FluxComponent::SwDownToa,
        FluxComponent::SwUpSurface,
        FluxComponent::SwDownSurface,
        FluxComponent::LwUpToa,
        FluxComponent::LwUpSurface,
        FluxComponent::LwDownSurface,
    ];

    /// Short key, e.g. `swut`
    pub fn key(&self) -> &'static str {
        match self {
            FluxComponent::SwUpToa => "swut",
            FluxComponent::SwDownToa => "swdt",
            FluxComponent::SwUpSurface => "swus",
            FluxComponent::SwDownSurface => "swds",
            FluxComponent::LwUpToa => "lwut",
            FluxComponent::LwUpSurface => "lwus",
            FluxComponent::LwDownSurface => "lwds",
        }
    }

    pub fn band(&self) -> Band {
        match self {
            FluxComponent::SwUpToa
            | FluxComponent::SwDownToa
            | FluxComponent::SwUpSurface
            | FluxComponent::SwDownSurface => Band::Shortwave,
            FluxComponent::LwUpToa | FluxComponent::LwUpSurface | FluxComponent::LwDownSurface => {
                Band::Longwave
            }
        }
    }

    pub fn level(&self) -> Level {
        match self {
            FluxComponent::SwUpToa | FluxComponent::SwDownToa | FluxComponent::LwUpToa => {
                Level::Toa
            }
            _ => Level::Surface,
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            FluxComponent::SwDownToa
            | FluxComponent::SwDownSurface
            | FluxComponent::LwDownSurface => Direction::Down,
            _ => Direction::Up,
        }
    }
}

/// Name of an input flux field: a component under a sky condition
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FluxName {
    pub component: FluxComponent,
    pub sky: Sky,
}

impl FluxName {
    pub fn new(component: FluxComponent, sky: Sky) -> Self {
        Self { component, sky }
    }

    pub fn all_sky(component: FluxComponent) -> Self {
        Self::new(component, Sky::All)
    }

    pub fn clear_sky(component: FluxComponent) -> Self {
        Self::new(component, Sky::Clear)
    }
}

const CLEAR_SKY_SUFFIX: &str = "_cs";

impl fmt::Display for FluxName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sky {
            Sky::All => write!(f, "{}", self.component.key()),
            Sky::Clear => write!(f, "{}{}", self.component.key(), CLEAR_SKY_SUFFIX),
        }
    }
}

impl FromStr for FluxName {
    type Err = RadiagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, sky) = match s.strip_suffix(CLEAR_SKY_SUFFIX) {
            Some(key) => (key, Sky::Clear),
            None => (s, Sky::All),
        };

        FluxComponent::ALL
            .iter()
            .find(|c| c.key() == key)
            .map(|&component| FluxName::new(component, sky))
            .ok_or_else(|| RadiagError::UnknownFluxName(s.to_string()))
    }
}

/// Check that every field has the same shape as the first one
///
/// `context` names the calculation in the resulting error.
pub fn ensure_same_shape(context: &str, fields: &[&Field]) -> RadiagResult<()> {
    if let Some((first, rest)) = fields.split_first() {
        for field in rest {
            if field.shape() != first.shape() {
                return Err(RadiagError::shape_mismatch(
                    context,
                    first.shape(),
                    field.shape(),
                ));
            }
        }
    }
    Ok(())
}

/// A collection of named flux fields
///
/// Lookups of absent names fail with [`RadiagError::MissingField`]; no field is ever
/// filled in with a default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FluxSet {
    fields: HashMap<FluxName, Field>,
}

impl FluxSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a flux set from short keys such as `"swut"` or `"lwds_cs"`
    pub fn from_keys<I, K>(fields: I) -> RadiagResult<Self>
    where
        I: IntoIterator<Item = (K, Field)>,
        K: AsRef<str>,
    {
        let mut set = Self::new();
        for (key, field) in fields {
            set.insert(key.as_ref().parse()?, field);
        }
        Ok(set)
    }

    /// Builder method to add a field
    pub fn with(mut self, name: FluxName, field: Field) -> Self {
        self.insert(name, field);
        self
    }

    /// Add a field, returning any field previously stored under the same name
    pub fn insert(&mut self, name: FluxName, field: Field) -> Option<Field> {
        self.fields.insert(name, field)
    }

    /// Get a field by name
    pub fn get(&self, name: FluxName) -> RadiagResult<&Field> {
        self.fields
            .get(&name)
            .ok_or_else(|| RadiagError::MissingField(name.to_string()))
    }

    pub fn contains(&self, name: FluxName) -> bool {
        self.fields.contains_key(&name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Names of all fields held, sorted by key
    pub fn names(&self) -> Vec<FluxName> {
        let mut names: Vec<FluxName> = self.fields.keys().copied().collect();
        names.sort_by_key(|n| n.to_string());
        names
    }

    /// Net downward flux for a band at a level
    ///
    /// | band      | level   | net flux        |
    /// |-----------|---------|-----------------|
    /// | shortwave | TOA     | `swdt - swut`   |
    /// | longwave  | TOA     | `-lwut`         |
    /// | shortwave | surface | `swds - swus`   |
    /// | longwave  | surface | `lwds - lwus`   |
    ///
    /// There is no incoming longwave at the top of atmosphere, so the TOA longwave
    /// net flux is the negated outgoing longwave radiation.
    pub fn net_downward_flux(&self, band: Band, level: Level, sky: Sky) -> RadiagResult<Field> {
        let name = |component| FluxName::new(component, sky);

        let (down, up) = match (band, level) {
            (Band::Shortwave, Level::Toa) => (
                Some(name(FluxComponent::SwDownToa)),
                name(FluxComponent::SwUpToa),
            ),
            (Band::Longwave, Level::Toa) => (None, name(FluxComponent::LwUpToa)),
            (Band::Shortwave, Level::Surface) => (
                Some(name(FluxComponent::SwDownSurface)),
                name(FluxComponent::SwUpSurface),
            ),
            (Band::Longwave, Level::Surface) => (
                Some(name(FluxComponent::LwDownSurface)),
                name(FluxComponent::LwUpSurface),
            ),
        };

        let up = self.get(up)?;
        match down {
            Some(down) => {
                let down = self.get(down)?;
                ensure_same_shape("net downward flux", &[down, up])?;
                Ok(down - up)
            }
            None => Ok(up.mapv(|v| -v)),
        }
    }
}

//! Cloud Radiative Effect
//!
//! The cloud radiative effect (CRE) isolates the radiative impact of clouds by
//! differencing fluxes computed with and without clouds.
//!
//! # Definition
//!
//! For shortwave and longwave net fluxes $F$ at one level:
//!
//! $$CRE_{sw} = F^{clear}_{sw} - F^{all}_{sw}$$
//! $$CRE_{lw} = F^{clear}_{lw} - F^{all}_{lw}$$
//! $$CRE_{net} = CRE_{sw} + CRE_{lw}$$
//!
//! [`cloud_radiative_effect`] applies these formulas to whatever it is given and does
//! not rescale or flip signs. The level helpers ([`cre_at_level`], [`cre_profile`])
//! build the net fluxes from a [`FluxSet`] with the crate's downward-positive
//! convention, so a positive CRE means clouds reduce the net downward flux at that
//! level (a cooling of everything below it).
//!
//! # Sign relative to the literature
//!
//! The usual TOA definitions difference outgoing fluxes, e.g.
//! $CRE_{sw} = F^{up,clear}_{sw} - F^{up,all}_{sw}$, which is negative when clouds cool
//! (about -50 W/m² in the global mean). With downward-positive net fluxes the clear
//! minus all difference has the opposite sign, so every term returned here is the
//! negation of that convention: global-mean shortwave CRE is positive and longwave CRE
//! is negative. Negate the results to compare with published values.
//!
//! # Levels
//!
//! - top of atmosphere: clouds' effect on the whole Earth system
//! - surface: clouds' effect on the surface
//! - atmosphere: the column between the two, `CRE_toa - CRE_surface`
//!
//! Reference: Allan (2011), "Combining satellite data and models to estimate cloud
//! radiative effect at the surface and in the atmosphere".

use radiag_core::errors::RadiagResult;
use radiag_core::field::{ensure_same_shape, Band, Field, FloatValue, FluxSet, Level, Sky};
use radiag_core::spatial::{global_mean_with, LatitudeWeights, MeanMethod};
use serde::{Deserialize, Serialize};

/// Shortwave, longwave and net cloud radiative effect
///
/// `net` is always computed as `shortwave + longwave`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreResult {
    pub shortwave: Field,
    pub longwave: Field,
    pub net: Field,
}

/// Global-mean cloud radiative effect (W/m²)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreSummary {
    pub shortwave: FloatValue,
    pub longwave: FloatValue,
    pub net: FloatValue,
}

impl CreResult {
    fn from_components(shortwave: Field, longwave: Field) -> Self {
        let net = &shortwave + &longwave;
        Self {
            shortwave,
            longwave,
            net,
        }
    }

    /// Reduce every term to its global mean
    pub fn global_mean(
        &self,
        weights: &LatitudeWeights,
        method: MeanMethod,
    ) -> RadiagResult<CreSummary> {
        Ok(CreSummary {
            shortwave: global_mean_with(&self.shortwave, weights, method)?,
            longwave: global_mean_with(&self.longwave, weights, method)?,
            net: global_mean_with(&self.net, weights, method)?,
        })
    }
}

/// Cloud radiative effect from paired clear-sky and all-sky fluxes at one level
///
/// Fails with a shape mismatch unless all four fields share the same shape.
pub fn cloud_radiative_effect(
    clear_sw: &Field,
    all_sw: &Field,
    clear_lw: &Field,
    all_lw: &Field,
) -> RadiagResult<CreResult> {
    ensure_same_shape(
        "cloud radiative effect",
        &[clear_sw, all_sw, clear_lw, all_lw],
    )?;

    Ok(CreResult::from_components(
        clear_sw - all_sw,
        clear_lw - all_lw,
    ))
}

/// Cloud radiative effect at the top of atmosphere or the surface
///
/// Needs the clear-sky and all-sky directional fluxes for both bands at `level`.
pub fn cre_at_level(fluxes: &FluxSet, level: Level) -> RadiagResult<CreResult> {
    let clear_sw = fluxes.net_downward_flux(Band::Shortwave, level, Sky::Clear)?;
    let all_sw = fluxes.net_downward_flux(Band::Shortwave, level, Sky::All)?;
    let clear_lw = fluxes.net_downward_flux(Band::Longwave, level, Sky::Clear)?;
    let all_lw = fluxes.net_downward_flux(Band::Longwave, level, Sky::All)?;

    cloud_radiative_effect(&clear_sw, &all_sw, &clear_lw, &all_lw)
}

/// Cloud radiative effect at the top of atmosphere, the surface and in the column
#[derive(Debug, Clone, PartialEq)]
pub struct CreProfile {
    pub toa: CreResult,
    pub surface: CreResult,
    /// Atmospheric column CRE, `toa - surface` term by term
    pub atmosphere: CreResult,
}

/// Global means of a [`CreProfile`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreProfileSummary {
    pub toa: CreSummary,
    pub surface: CreSummary,
    pub atmosphere: CreSummary,
}

impl CreProfile {
    pub fn global_mean(
        &self,
        weights: &LatitudeWeights,
        method: MeanMethod,
    ) -> RadiagResult<CreProfileSummary> {
        Ok(CreProfileSummary {
            toa: self.toa.global_mean(weights, method)?,
            surface: self.surface.global_mean(weights, method)?,
            atmosphere: self.atmosphere.global_mean(weights, method)?,
        })
    }
}

/// Compute the full CRE profile from a set of clear-sky and all-sky fluxes
pub fn cre_profile(fluxes: &FluxSet) -> RadiagResult<CreProfile> {
    let toa = cre_at_level(fluxes, Level::Toa)?;
    let surface = cre_at_level(fluxes, Level::Surface)?;
    ensure_same_shape("cloud radiative effect profile", &[&toa.net, &surface.net])?;

    let atmosphere = CreResult::from_components(
        &toa.shortwave - &surface.shortwave,
        &toa.longwave - &surface.longwave,
    );

    tracing::debug!(shape = ?toa.net.shape(), "Computed cloud radiative effect profile");
    Ok(CreProfile {
        toa,
        surface,
        atmosphere,
    })
}

//! Atmospheric Energy Budget
//!
//! Net radiative energy gained by the atmospheric column, positive when the column
//! gains energy. Two derivations are provided and compared.
//!
//! # Method 1: flux divergence
//!
//! The column's net radiative heating is the net downward flux entering at its top
//! minus the net downward flux leaving through its base, summed over both bands:
//!
//! $$R_{lw} = F^{toa}_{lw} - F^{sfc}_{lw}, \quad R_{sw} = F^{toa}_{sw} - F^{sfc}_{sw}$$
//! $$R = R_{lw} + R_{sw}$$
//!
//! $R_{lw}$ is the negated longwave cooling of the column and $R_{sw}$ its shortwave
//! absorption (DeAngelis et al., 2015).
//!
//! # Method 2: clear-sky budget plus cloud forcing
//!
//! $$R = R^{clear} + (CRE^{sfc}_{net} - CRE^{toa}_{net})$$
//!
//! where $R^{clear}$ is method 1 applied to clear-sky fluxes. The cloud term is the
//! negated atmospheric CRE: CRE is clear minus all sky, while the budget change
//! caused by clouds is all minus clear.
//!
//! Both methods are algebraically identical for self-consistent inputs. Their
//! difference is reported in [`EnergyBudgetResult`] and never enforced; a large
//! difference points at a sign-convention or input-field error.
//!
//! # Latent heating
//!
//! In equilibrium the column's radiative budget is balanced by latent heating from
//! precipitation ($LP$) and surface sensible heat flux ($SH$):
//!
//! $$R + LP + SH = 0$$
//!
//! [`latent_heating`] returns the $LP$ that closes this balance.

use crate::cre::{cre_profile, CreProfile};
use radiag_core::errors::RadiagResult;
use radiag_core::field::{ensure_same_shape, Band, Field, FloatValue, FluxSet, Level, Sky};
use radiag_core::parameters::DiagnosticParameters;
use radiag_core::spatial::{global_mean_with, LatitudeWeights, MeanMethod};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Band-resolved flux divergence of the atmospheric column
#[derive(Debug, Clone, PartialEq)]
pub struct RadiativeBudgetTerms {
    /// Longwave divergence, negative when the column cools by emission
    pub longwave: Field,
    /// Shortwave divergence, the shortwave absorbed by the column
    pub shortwave: Field,
    /// `longwave + shortwave`
    pub net: Field,
}

/// Longwave and shortwave flux divergence of the column under one sky condition
pub fn radiative_terms(fluxes: &FluxSet, sky: Sky) -> RadiagResult<RadiativeBudgetTerms> {
    let lw_toa = fluxes.net_downward_flux(Band::Longwave, Level::Toa, sky)?;
    let lw_surface = fluxes.net_downward_flux(Band::Longwave, Level::Surface, sky)?;
    let sw_toa = fluxes.net_downward_flux(Band::Shortwave, Level::Toa, sky)?;
    let sw_surface = fluxes.net_downward_flux(Band::Shortwave, Level::Surface, sky)?;
    ensure_same_shape(
        "atmospheric flux divergence",
        &[&lw_toa, &lw_surface, &sw_toa, &sw_surface],
    )?;

    let longwave = &lw_toa - &lw_surface;
    let shortwave = &sw_toa - &sw_surface;
    let net = &longwave + &shortwave;

    Ok(RadiativeBudgetTerms {
        longwave,
        shortwave,
        net,
    })
}

/// Method 1: net column budget from flux divergence
pub fn flux_divergence_budget(fluxes: &FluxSet, sky: Sky) -> RadiagResult<Field> {
    Ok(radiative_terms(fluxes, sky)?.net)
}

/// Change in the column budget caused by clouds, `CRE_surface - CRE_toa`
pub fn cloud_forcing(cre: &CreProfile) -> RadiagResult<Field> {
    ensure_same_shape("cloud forcing", &[&cre.surface.net, &cre.toa.net])?;
    Ok(&cre.surface.net - &cre.toa.net)
}

/// Method 2: clear-sky budget plus cloud forcing
///
/// Only the clear-sky fluxes are read from `fluxes`; the all-sky information enters
/// through `cre`.
pub fn cre_decomposition_budget(fluxes: &FluxSet, cre: &CreProfile) -> RadiagResult<Field> {
    let clear = flux_divergence_budget(fluxes, Sky::Clear)?;
    let clouds = cloud_forcing(cre)?;
    ensure_same_shape("cloud radiative effect decomposition", &[&clear, &clouds])?;
    Ok(&clear + &clouds)
}

/// Latent heating from precipitation that balances the column budget
///
/// Returns `-(R + SH)` for radiative budget `R` and surface sensible heat flux `SH`
/// (upward-positive, W/m²).
pub fn latent_heating(
    terms: &RadiativeBudgetTerms,
    sensible_heat: &Field,
) -> RadiagResult<Field> {
    ensure_same_shape("latent heating", &[&terms.net, sensible_heat])?;
    Ok((&terms.net + sensible_heat).mapv(|v| -v))
}

/// Column energy budget from both methods
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyBudgetResult {
    /// Method 1
    pub flux_divergence: Field,
    /// Method 2
    pub cre_decomposition: Field,
    /// `flux_divergence - cre_decomposition`
    pub difference: Field,
}

/// Global-mean energy budget (W/m²)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyBudgetSummary {
    pub flux_divergence: FloatValue,
    pub cre_decomposition: FloatValue,
    pub difference: FloatValue,
}

impl EnergyBudgetResult {
    fn new(flux_divergence: Field, cre_decomposition: Field) -> Self {
        let difference = &flux_divergence - &cre_decomposition;
        Self {
            flux_divergence,
            cre_decomposition,
            difference,
        }
    }

    /// Largest difference between the methods relative to the budget magnitude
    ///
    /// Each cell's difference is divided by the larger of the two budget magnitudes,
    /// floored at 1 W/m² so that near-zero budgets do not inflate the ratio. Returns
    /// NaN if any cell is NaN.
    pub fn max_relative_difference(&self) -> FloatValue {
        let mut largest: FloatValue = 0.0;
        for ((m1, m2), diff) in self
            .flux_divergence
            .iter()
            .zip(self.cre_decomposition.iter())
            .zip(self.difference.iter())
        {
            let relative = diff.abs() / m1.abs().max(m2.abs()).max(1.0);
            if relative.is_nan() {
                return FloatValue::NAN;
            }
            largest = largest.max(relative);
        }
        largest
    }

    /// Whether the two methods agree within `tolerance` (relative)
    pub fn is_consistent(&self, tolerance: FloatValue) -> bool {
        self.max_relative_difference() <= tolerance
    }

    /// Check agreement using the configured tolerance, warning when it is exceeded
    pub fn check_consistency(&self, parameters: &DiagnosticParameters) -> bool {
        let relative = self.max_relative_difference();
        let consistent = relative <= parameters.consistency_tolerance;
        if !consistent {
            warn!(
                max_relative_difference = relative,
                tolerance = parameters.consistency_tolerance,
                "Energy budget methods disagree; check flux signs and clear-sky inputs"
            );
        }
        consistent
    }

    /// Reduce every term to its global mean
    pub fn global_mean(
        &self,
        weights: &LatitudeWeights,
        method: MeanMethod,
    ) -> RadiagResult<EnergyBudgetSummary> {
        Ok(EnergyBudgetSummary {
            flux_divergence: global_mean_with(&self.flux_divergence, weights, method)?,
            cre_decomposition: global_mean_with(&self.cre_decomposition, weights, method)?,
            difference: global_mean_with(&self.difference, weights, method)?,
        })
    }
}

/// Compute the column budget with both methods
///
/// Requires all fourteen directional fluxes (seven components, clear and all sky).
pub fn energy_budget(fluxes: &FluxSet) -> RadiagResult<EnergyBudgetResult> {
    let method_1 = flux_divergence_budget(fluxes, Sky::All)?;
    let cre = cre_profile(fluxes)?;
    let method_2 = cre_decomposition_budget(fluxes, &cre)?;
    ensure_same_shape("energy budget methods", &[&method_1, &method_2])?;

    debug!(shape = ?method_1.shape(), "Computed atmospheric energy budget");
    Ok(EnergyBudgetResult::new(method_1, method_2))
}

//! Shared flux sets for unit tests

use ndarray::arr0;
use radiag_core::field::FluxSet;

/// Global-mean fluxes (W/m²) with the magnitudes of present-day observations
///
/// Whole numbers are used so that every derived term is exact.
pub(crate) fn global_mean_fluxes() -> FluxSet {
    FluxSet::from_keys(
        [
            ("swdt", 340.0),
            ("swut", 100.0),
            ("lwut", 240.0),
            ("swds", 186.0),
            ("swus", 24.0),
            ("lwds", 345.0),
            ("lwus", 398.0),
            ("swdt_cs", 340.0),
            ("swut_cs", 53.0),
            ("lwut_cs", 268.0),
            ("swds_cs", 244.0),
            ("swus_cs", 31.0),
            ("lwds_cs", 316.0),
            ("lwus_cs", 398.0),
        ]
        .into_iter()
        .map(|(key, value)| (key, arr0(value).into_dyn())),
    )
    .expect("fixture keys are valid")
}

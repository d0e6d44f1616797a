use crate::python::to_py_err;
use numpy::{IntoPyArray, PyArrayDyn, PyReadonlyArrayDyn};
use pyo3::prelude::*;
use pyo3::types::PyDict;
use radiag_components::cre::{self, CreResult};
use radiag_components::energy_budget as budget;
use radiag_core::field::{FloatValue, FluxSet, Sky};
use radiag_core::parameters::DiagnosticParameters;
use std::collections::HashMap;

type FluxArrays<'py> = HashMap<String, PyReadonlyArrayDyn<'py, FloatValue>>;

fn flux_set(fluxes: &FluxArrays<'_>) -> PyResult<FluxSet> {
    FluxSet::from_keys(
        fluxes
            .iter()
            .map(|(key, array)| (key, array.as_array().to_owned())),
    )
    .map_err(to_py_err)
}

fn cre_to_dict<'py>(py: Python<'py>, result: CreResult) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("shortwave", result.shortwave.into_pyarray_bound(py))?;
    dict.set_item("longwave", result.longwave.into_pyarray_bound(py))?;
    dict.set_item("net", result.net.into_pyarray_bound(py))?;
    Ok(dict)
}

/// Cloud radiative effect (clear minus all sky) from net fluxes at one level
///
/// Returns a dict with "shortwave", "longwave" and "net" arrays.
#[pyfunction]
pub fn cloud_radiative_effect<'py>(
    py: Python<'py>,
    clear_sw: PyReadonlyArrayDyn<'py, FloatValue>,
    all_sw: PyReadonlyArrayDyn<'py, FloatValue>,
    clear_lw: PyReadonlyArrayDyn<'py, FloatValue>,
    all_lw: PyReadonlyArrayDyn<'py, FloatValue>,
) -> PyResult<Bound<'py, PyDict>> {
    let result = cre::cloud_radiative_effect(
        &clear_sw.as_array().to_owned(),
        &all_sw.as_array().to_owned(),
        &clear_lw.as_array().to_owned(),
        &all_lw.as_array().to_owned(),
    )
    .map_err(to_py_err)?;
    cre_to_dict(py, result)
}

/// CRE at the top of atmosphere, the surface and in the atmospheric column
///
/// `fluxes` maps keys such as "swut" and "lwds_cs" to arrays.
#[pyfunction]
pub fn cre_profile<'py>(
    py: Python<'py>,
    fluxes: FluxArrays<'py>,
) -> PyResult<Bound<'py, PyDict>> {
    let profile = cre::cre_profile(&flux_set(&fluxes)?).map_err(to_py_err)?;

    let dict = PyDict::new_bound(py);
    dict.set_item("toa", cre_to_dict(py, profile.toa)?)?;
    dict.set_item("surface", cre_to_dict(py, profile.surface)?)?;
    dict.set_item("atmosphere", cre_to_dict(py, profile.atmosphere)?)?;
    Ok(dict)
}

/// Atmospheric energy budget from both derivations
///
/// Returns a dict with "flux_divergence", "cre_decomposition" and "difference" arrays
/// and a boolean "consistent" flag.
#[pyfunction]
#[pyo3(signature = (fluxes, consistency_tolerance=None))]
pub fn energy_budget<'py>(
    py: Python<'py>,
    fluxes: FluxArrays<'py>,
    consistency_tolerance: Option<FloatValue>,
) -> PyResult<Bound<'py, PyDict>> {
    let mut parameters = DiagnosticParameters::default();
    if let Some(tolerance) = consistency_tolerance {
        parameters.consistency_tolerance = tolerance;
    }
    parameters.validate().map_err(to_py_err)?;

    let result = budget::energy_budget(&flux_set(&fluxes)?).map_err(to_py_err)?;
    let consistent = result.check_consistency(&parameters);

    let dict = PyDict::new_bound(py);
    dict.set_item("consistent", consistent)?;
    dict.set_item(
        "flux_divergence",
        result.flux_divergence.into_pyarray_bound(py),
    )?;
    dict.set_item(
        "cre_decomposition",
        result.cre_decomposition.into_pyarray_bound(py),
    )?;
    dict.set_item("difference", result.difference.into_pyarray_bound(py))?;
    Ok(dict)
}

/// Latent heating that closes the all-sky column budget given the sensible heat flux
#[pyfunction]
pub fn latent_heating<'py>(
    py: Python<'py>,
    fluxes: FluxArrays<'py>,
    sensible_heat: PyReadonlyArrayDyn<'py, FloatValue>,
) -> PyResult<Bound<'py, PyArrayDyn<FloatValue>>> {
    let terms =
        budget::radiative_terms(&flux_set(&fluxes)?, Sky::All).map_err(to_py_err)?;
    let lp = budget::latent_heating(&terms, &sensible_heat.as_array().to_owned())
        .map_err(to_py_err)?;
    Ok(lp.into_pyarray_bound(py))
}

#[pymodule]
pub fn diagnostics(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(cloud_radiative_effect, m)?)?;
    m.add_function(wrap_pyfunction!(cre_profile, m)?)?;
    m.add_function(wrap_pyfunction!(energy_budget, m)?)?;
    m.add_function(wrap_pyfunction!(latent_heating, m)?)?;
    Ok(())
}

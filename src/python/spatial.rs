use crate::python::to_py_err;
use numpy::{IntoPyArray, PyArray1, PyArrayDyn, PyReadonlyArray1, PyReadonlyArrayDyn, ToPyArray};
use pyo3::prelude::*;
use radiag_core::field::FloatValue;
use radiag_core::spatial::{global_mean_with, LatitudeWeights, MeanMethod};

/// Cosine-of-latitude weights for latitudes in degrees
#[pyfunction]
pub fn cosine_weights<'py>(
    py: Python<'py>,
    latitudes: PyReadonlyArray1<'py, FloatValue>,
) -> PyResult<Bound<'py, PyArray1<FloatValue>>> {
    let latitudes = latitudes.as_array().to_vec();
    let weights = LatitudeWeights::cosine(&latitudes).map_err(to_py_err)?;
    Ok(weights.weights().to_pyarray_bound(py))
}

/// Area-weighted mean over the trailing spatial axes, keeping leading axes
#[pyfunction]
pub fn area_weighted_mean<'py>(
    py: Python<'py>,
    field: PyReadonlyArrayDyn<'py, FloatValue>,
    weights: PyReadonlyArray1<'py, FloatValue>,
) -> PyResult<Bound<'py, PyArrayDyn<FloatValue>>> {
    let field = field.as_array().to_owned();
    let weights = weights.as_array().to_vec();
    let mean = radiag_core::spatial::area_weighted_mean(&field, &weights).map_err(to_py_err)?;
    Ok(mean.into_pyarray_bound(py))
}

/// Global mean of a field given its latitudes in degrees
///
/// `method` is either "weighted_sum" or "trapezoidal".
#[pyfunction]
#[pyo3(signature = (field, latitudes, method="weighted_sum"))]
pub fn global_mean<'py>(
    field: PyReadonlyArrayDyn<'py, FloatValue>,
    latitudes: PyReadonlyArray1<'py, FloatValue>,
    method: &str,
) -> PyResult<FloatValue> {
    let method: MeanMethod = method.parse().map_err(to_py_err)?;
    let latitudes = latitudes.as_array().to_vec();
    let weights = LatitudeWeights::cosine(&latitudes).map_err(to_py_err)?;
    let field = field.as_array().to_owned();
    global_mean_with(&field, &weights, method).map_err(to_py_err)
}

#[pymodule]
pub fn spatial(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(cosine_weights, m)?)?;
    m.add_function(wrap_pyfunction!(area_weighted_mean, m)?)?;
    m.add_function(wrap_pyfunction!(global_mean, m)?)?;
    Ok(())
}

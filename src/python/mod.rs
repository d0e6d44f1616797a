//! Python bindings
//!
//! Each submodule is exposed as `radiag._lib.<name>`. Inputs are numpy arrays with the
//! same axis layout as the Rust API (`[lat]` or `[..leading, lat, lon]`); outputs are
//! new numpy arrays.

use pyo3::exceptions::{PyKeyError, PyValueError};
use pyo3::PyErr;
use radiag_core::errors::RadiagError;

pub mod diagnostics;
pub mod spatial;

/// Convert a diagnostic error into the matching Python exception
///
/// Missing flux fields raise `KeyError`; everything else is a `ValueError`.
pub(crate) fn to_py_err(error: RadiagError) -> PyErr {
    match error {
        RadiagError::MissingField(_) => PyKeyError::new_err(error.to_string()),
        _ => PyValueError::new_err(error.to_string()),
    }
}

//! Python extension module for `radiag`
//!
//! The calculations live in `radiag-core` and `radiag-components`; this crate only
//! converts numpy arrays in and out.

use pyo3::prelude::*;
use pyo3::wrap_pymodule;

pub mod python;

use python::diagnostics::diagnostics;
use python::spatial::spatial;

#[pymodule]
#[pyo3(name = "_lib")]
fn radiag(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add_wrapped(wrap_pymodule!(spatial))?;
    m.add_wrapped(wrap_pymodule!(diagnostics))?;

    set_path(m, "radiag._lib.spatial", "spatial")?;
    set_path(m, "radiag._lib.diagnostics", "diagnostics")?;

    Ok(())
}

fn set_path(m: &Bound<'_, PyModule>, path: &str, module: &str) -> PyResult<()> {
    let code = format!(
        "\
import sys
sys.modules['{path}'] = {module}
    "
    );
    m.py().run_bound(&code, None, Some(&m.dict()))
}

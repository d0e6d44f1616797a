//! Radiative diagnostics built on `radiag-core`
//!
//! # Module Organisation
//!
//! - `cre`: cloud radiative effect at a level, at the surface and for the
//!   atmospheric column
//! - `energy_budget`: net radiative energy budget of the atmospheric column, derived
//!   both from flux divergence and from the clear-sky budget plus cloud forcing
//!
//! Every calculation is a free function over caller-owned fields and returns an
//! immutable result. Nothing is cached between calls.

pub mod cre;
pub mod energy_budget;

#[cfg(test)]
pub(crate) mod fixtures;

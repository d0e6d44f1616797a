//! Core types for cloud radiative effect and atmospheric energy budget diagnostics
//!
//! - [`field`]: flux fields, flux names and the net-flux sign convention
//! - [`spatial`]: latitude weights and area-weighted means
//! - [`parameters`]: configurable diagnostic settings
//! - [`errors`]: the shared error type

pub mod errors;
pub mod field;
pub mod parameters;
pub mod spatial;

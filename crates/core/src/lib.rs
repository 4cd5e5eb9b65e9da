//! Domain core for RIPD (data protection impact report) projects.
//!
//! Everything in this crate is synchronous and free of I/O. The storage and
//! HTTP layers load a [`project::Project`] (through [`normalize`]) and call
//! into the calculators, label tables and fallback generators defined here.

pub mod action;
pub mod error;
pub mod labels;
pub mod legal_basis;
pub mod maturity;
pub mod normalize;
pub mod project;
pub mod risk;
pub mod templates;
pub mod types;
pub mod validation;

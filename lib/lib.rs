#![allow(non_snake_case)]

//! Provides a local-density (Thomas-Fermi) model of a one-dimensional
//! Bose-Einstein condensate in a linearly tilted trap, along with its
//! Bogoliubov-like excitation spectrum, and the plumbing needed to turn a set
//! of user-supplied parameters into a rendered diagnostic figure.
//!
//! The model itself lives in [`model`]; everything else is layered around it:
//! - [`params`]: physical/grid parameters and validation of raw form input
//! - [`render`]: headless rasterization of the four diagnostic panels and
//!   PNG/base64 encoding
//! - [`pipeline`]: the validate → evaluate → render → encode sequence with a
//!   typed error for each stage
//!
//! ```
//! use tiltbec::model;
//!
//! let ev = model::simulate(0.05, 0.5, 1.0).unwrap();
//! assert_eq!(ev.x().len(), 1000);
//! assert_eq!(ev.k().len(), 200);
//! assert!(ev.psi_imag().iter().all(|im| *im == 0.0));
//! assert!(ev.n0() > 0.0);
//! ```
//!
//! See [`docs`] for theoretical background.

pub mod error;
pub mod params;
pub mod utils;
pub mod model;
pub mod render;
pub mod text;
pub mod pipeline;

pub mod docs;

/// Default spatial extent of the position grid.
pub const DEF_LENGTH: f64 = 20.0;
/// Default number of position grid points.
pub const DEF_SAMPLES: usize = 1000;
/// Width of the moving-average window applied to the density.
pub const SMOOTHING_WINDOW: usize = 5;
/// Number of momentum grid points.
pub const MOMENTUM_SAMPLES: usize = 200;
/// The momentum grid covers `[-MOMENTUM_MAX, MOMENTUM_MAX]`.
pub const MOMENTUM_MAX: f64 = 5.0;

pub type Arr1<S> = ndarray::ArrayBase<S, ndarray::Ix1>;

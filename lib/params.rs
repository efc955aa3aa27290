//! Physical and grid parameters, along with the descriptors and validation
//! logic for the three user-facing form fields.
//!
//! ```
//! use tiltbec::params::Params;
//!
//! let form = [("alpha", "0.1"), ("g", "0.5"), ("mu", "2.0")];
//! let lookup = |key: &str| {
//!     form.iter().find(|(k, _)| *k == key).map(|(_, v)| v.to_string())
//! };
//! let params = Params::from_form(lookup).unwrap();
//! assert_eq!(params, Params { alpha: 0.1, g: 0.5, mu: 2.0 });
//! ```

use crate::{
    error::{ FieldError, ValidationError },
    DEF_LENGTH,
    DEF_SAMPLES,
};

pub type VResult<T> = Result<T, ValidationError>;

/// Static description of a single numerical form field.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Field {
    /// Form key.
    pub key: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// Short description shown beneath the input.
    pub help: &'static str,
    /// Value shown in an empty form.
    pub initial: f64,
    /// Inclusive lower bound.
    pub min: f64,
    /// Inclusive upper bound.
    pub max: f64,
    /// Input increment suggested to the browser.
    pub step: f64,
}

impl Field {
    /// Check a numerical value against this field's bounds.
    pub fn check(&self, value: f64) -> Result<f64, FieldError> {
        if !value.is_finite() {
            Err(FieldError::NotFinite(self.key))
        } else if value < self.min || value > self.max {
            Err(FieldError::OutOfRange {
                key: self.key,
                value,
                min: self.min,
                max: self.max,
            })
        } else {
            Ok(value)
        }
    }

    /// Parse and check a raw (string) value for this field.
    pub fn parse(&self, raw: Option<&str>) -> Result<f64, FieldError> {
        let raw = raw.map(str::trim).unwrap_or("");
        if raw.is_empty() { return Err(FieldError::Missing(self.key)); }
        let value: f64
            = raw.parse()
            .map_err(|_| FieldError::NotANumber(self.key, raw.to_string()))?;
        self.check(value)
    }
}

/// Tilt strength.
pub const ALPHA: Field = Field {
    key: "alpha",
    label: "Tilt Strength (α)",
    help: "Strength of linear potential (like gravity)",
    initial: 0.05,
    min: 0.0,
    max: 1.0,
    step: 0.01,
};

/// Interaction strength.
pub const G: Field = Field {
    key: "g",
    label: "Interaction Strength (g)",
    help: "How strongly atoms interact (repulsion)",
    initial: 0.5,
    min: 0.01,
    max: 2.0,
    step: 0.1,
};

/// Chemical potential.
pub const MU: Field = Field {
    key: "mu",
    label: "Chemical Potential (μ)",
    help: "Energy cost to add atoms to condensate",
    initial: 1.0,
    min: 0.1,
    max: 3.0,
    step: 0.1,
};

/// All form fields, in display order.
pub const FIELDS: [Field; 3] = [ALPHA, G, MU];

/// The three physical parameters of the model.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Params {
    /// Tilt strength α.
    pub alpha: f64,
    /// Interaction strength g.
    pub g: f64,
    /// Chemical potential μ.
    pub mu: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self { alpha: ALPHA.initial, g: G.initial, mu: MU.initial }
    }
}

impl Params {
    /// Check all three parameters against the bounds of their form fields,
    /// collecting every failure.
    pub fn validate(&self) -> VResult<Self> {
        let errors: Vec<FieldError>
            = [(ALPHA, self.alpha), (G, self.g), (MU, self.mu)].into_iter()
            .filter_map(|(field, value)| field.check(value).err())
            .collect();
        ValidationError::check(errors)?;
        Ok(*self)
    }

    /// Parse and validate parameters from raw form input, where `lookup`
    /// returns the raw value associated with a form key, if present.
    ///
    /// Problems with every field are collected into a single
    /// [`ValidationError`].
    pub fn from_form<F>(mut lookup: F) -> VResult<Self>
    where F: FnMut(&str) -> Option<String>
    {
        let mut errors: Vec<FieldError> = Vec::new();
        let mut values = [0.0; 3];
        for (field, value) in FIELDS.iter().zip(values.iter_mut()) {
            match field.parse(lookup(field.key).as_deref()) {
                Ok(v) => { *value = v; },
                Err(err) => { errors.push(err); },
            }
        }
        ValidationError::check(errors)?;
        let [alpha, g, mu] = values;
        Ok(Self { alpha, g, mu })
    }
}

/// Position grid parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Grid {
    /// Total extent of the grid, which covers `[-length / 2, length / 2]`.
    pub length: f64,
    /// Number of points.
    pub samples: usize,
}

impl Default for Grid {
    fn default() -> Self {
        Self { length: DEF_LENGTH, samples: DEF_SAMPLES }
    }
}

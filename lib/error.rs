//! Collection of all error types.
//!
//! All errors derive [`thiserror::Error`], making them composable when allowed
//! and compatible with application code using [`anyhow`][anyhow].
//!
//! [anyhow]: https://crates.io/crates/anyhow

use ndarray as nd;
use thiserror::Error;

/// Returned when an operation requiring equal-length arrays encounters arrays
/// with unequal length.
#[derive(Debug, Error)]
#[error("encountered arrays with incompatible lengths; got {0} and {1}")]
pub struct LengthError(pub usize, pub usize);

impl LengthError {
    pub(crate) fn check<S, A, T, B>(
        a: &nd::ArrayBase<S, nd::Ix1>,
        b: &nd::ArrayBase<T, nd::Ix1>,
    ) -> Result<(), Self>
    where
        S: nd::Data<Elem = A>,
        T: nd::Data<Elem = B>,
    {
        let na = a.len();
        let nb = b.len();
        (na == nb).then_some(()).ok_or(Self(na, nb))
    }
}

/// Returned from the model evaluator when its inputs (or anything derived from
/// them) leave the domain on which the model is defined.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Returned when the interaction strength is exactly zero.
    #[error("interaction strength g must be non-zero")]
    ZeroInteraction,

    /// Returned when an input parameter is NaN or infinite.
    #[error("parameter {0} must be finite; got {1}")]
    NonFinite(&'static str, f64),

    /// Returned when a non-positive grid length is encountered.
    #[error("grid length must be greater than 0; got {0}")]
    BadLength(f64),

    /// Returned when a zero-point grid is requested.
    #[error("grid must have at least 1 sample; got {0}")]
    BadSamples(usize),

    /// Returned when a derived quantity picks up a NaN or infinity.
    #[error("evaluation produced non-finite values in {0}")]
    NonFiniteOutput(&'static str),
}

impl DomainError {
    pub(crate) fn check_finite(name: &'static str, val: f64)
        -> Result<(), Self>
    {
        val.is_finite().then_some(()).ok_or(Self::NonFinite(name, val))
    }

    pub(crate) fn check_interaction(g: f64) -> Result<(), Self> {
        (g != 0.0).then_some(()).ok_or(Self::ZeroInteraction)
    }

    pub(crate) fn check_length(length: f64) -> Result<(), Self> {
        (length > 0.0).then_some(()).ok_or(Self::BadLength(length))
    }

    pub(crate) fn check_samples(samples: usize) -> Result<(), Self> {
        (samples != 0).then_some(()).ok_or(Self::BadSamples(samples))
    }

    pub(crate) fn check_output<'a, I>(name: &'static str, vals: I)
        -> Result<(), Self>
    where I: IntoIterator<Item = &'a f64>
    {
        vals.into_iter().all(|v| v.is_finite())
            .then_some(())
            .ok_or(Self::NonFiniteOutput(name))
    }
}

/// Describes a single problem with a single form field.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum FieldError {
    /// Returned when a field is absent or blank.
    #[error("{0}: this field is required")]
    Missing(&'static str),

    /// Returned when a field cannot be parsed as a number.
    #[error("{0}: enter a number; got {1:?}")]
    NotANumber(&'static str, String),

    /// Returned when a field parses to NaN or an infinity.
    #[error("{0}: value must be finite")]
    NotFinite(&'static str),

    /// Returned when a field lies outside its (inclusive) allowed range.
    #[error("{key}: ensure this value lies in [{min}, {max}]; got {value}")]
    OutOfRange {
        key: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl FieldError {
    /// Return the key of the offending field.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Missing(key) => key,
            Self::NotANumber(key, _) => key,
            Self::NotFinite(key) => key,
            Self::OutOfRange { key, .. } => key,
        }
    }
}

/// Returned when one or more fields of a parameter set fail validation.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("invalid parameters: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
pub struct ValidationError(pub Vec<FieldError>);

impl ValidationError {
    /// Return all errors pertaining to the field with key `key`.
    pub fn for_field<'a>(&'a self, key: &'a str)
        -> impl Iterator<Item = &'a FieldError> + 'a
    {
        self.0.iter().filter(move |err| err.key() == key)
    }

    pub(crate) fn check(errors: Vec<FieldError>) -> Result<(), Self> {
        errors.is_empty().then_some(()).ok_or(Self(errors))
    }
}

/// Returned from functions in [`render`][crate::render].
#[derive(Debug, Error)]
pub enum RenderError {
    /// [`LengthError`]
    #[error("series length error: {0}")]
    Length(#[from] LengthError),

    /// Returned when a plotted series contains NaN or infinite values.
    #[error("cannot plot non-finite values in series {0:?}")]
    NonFinite(String),

    /// Returned when the requested canvas is too small to hold the panels.
    #[error("canvas must be at least {min}x{min} pixels; got {width}x{height}")]
    BadCanvas { width: u32, height: u32, min: u32 },

    /// Returned when the embedded font face cannot be parsed.
    #[error("font error: {0}")]
    Font(#[from] ab_glyph::InvalidFont),

    /// Returned when PNG encoding fails.
    #[error("png encoding error: {0}")]
    Encode(#[from] image::ImageError),
}

/// Identifies a stage of the [`pipeline`][crate::pipeline].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Validate,
    Evaluate,
    Render,
    Encode,
}

/// Returned from [`pipeline::run`][crate::pipeline::run].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// [`ValidationError`]
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// [`DomainError`]
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// [`RenderError`]
    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

impl PipelineError {
    /// Return the stage at which the pipeline was halted.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Validation(_) => Stage::Validate,
            Self::Domain(_) => Stage::Evaluate,
            Self::Render(RenderError::Encode(_)) => Stage::Encode,
            Self::Render(_) => Stage::Render,
        }
    }
}

//! The full request flow, from raw form input to an encoded figure.
//!
//! Each stage returns its own error type, lifted into [`PipelineError`] so that
//! the first failure halts the pipeline and the caller can tell which stage it
//! came from via [`PipelineError::stage`]:
//! ```text
//!   raw form input
//!        |
//!        V
//!    validate  --> ValidationError
//!        |
//!        V
//!    evaluate  --> DomainError
//!        |
//!        V
//!     render   --> RenderError
//!        |
//!        V
//!     encode   --> RenderError::Encode
//!        |
//!        V
//!     Report
//! ```

use tracing::{ debug, warn };
use crate::{
    error::{ PipelineError, Stage },
    model::{ self, Evaluation },
    params::{ Grid, Params },
    render::{ self, RenderConfig },
};

pub type PResult<T> = Result<T, PipelineError>;

/// Everything needed to display the outcome of a successful run.
#[derive(Clone, Debug)]
pub struct Report {
    /// Validated input parameters.
    pub params: Params,
    /// Peak density.
    pub n0: f64,
    /// Encoded PNG figure.
    pub png: Vec<u8>,
    /// Base64 encoding of `png`.
    pub plot: String,
}

impl Report {
    /// Peak density formatted to three decimal places.
    pub fn n0_display(&self) -> String { format!("{:.3}", self.n0) }

    /// The figure as a `data:` URL suitable for an `<img>` source.
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", self.plot)
    }
}

fn log_failure(err: PipelineError) -> PipelineError {
    warn!(stage = ?err.stage(), "pipeline: halted: {}", err);
    err
}

fn finish(ev: &Evaluation, config: RenderConfig) -> PResult<Report> {
    let img = render::figure(ev, config)?;
    debug!(stage = ?Stage::Render, "pipeline: stage complete");
    let png = render::encode_png(&img)?;
    let plot = render::to_base64(&png);
    debug!(stage = ?Stage::Encode, bytes = png.len(), "pipeline: stage complete");
    Ok(Report { params: ev.params(), n0: ev.n0(), png, plot })
}

/// Run the evaluate, render, and encode stages for already-parsed parameters.
///
/// Parameters are still checked against the bounds of their form fields.
pub fn run_params(params: Params, grid: Grid, config: RenderConfig)
    -> PResult<Report>
{
    let go = || -> PResult<Report> {
        let params = params.validate()?;
        debug!(stage = ?Stage::Validate, "pipeline: stage complete");
        let ev = model::evaluate(params, grid)?;
        debug!(stage = ?Stage::Evaluate, "pipeline: stage complete");
        finish(&ev, config)
    };
    go().map_err(log_failure)
}

/// Run the full pipeline on raw form input, where `lookup` returns the raw
/// value associated with a form key, if present.
pub fn run<F>(lookup: F, grid: Grid, config: RenderConfig) -> PResult<Report>
where F: FnMut(&str) -> Option<String>
{
    Params::from_form(lookup)
        .map_err(PipelineError::from)
        .map_err(log_failure)
        .and_then(|params| run_params(params, grid, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use crate::error::DomainError;

    fn small() -> RenderConfig { RenderConfig { width: 300, height: 240 } }

    #[test]
    fn successful_run() {
        let form: HashMap<&str, &str>
            = [("alpha", "0.05"), ("g", "0.5"), ("mu", "1.0")].into_iter().collect();
        let report = run(|k| form.get(k).map(|v| v.to_string()), Grid::default(), small())
            .unwrap();
        assert_eq!(report.params, Params::default());
        assert_eq!(&report.png[1..4], b"PNG");
        assert!(report.data_url().starts_with("data:image/png;base64,iVBORw0KGgo"));
        assert_eq!(report.n0_display(), format!("{:.3}", report.n0));
    }

    #[test]
    fn validation_halts_first() {
        let err = run(|_| Some("nope".to_string()), Grid::default(), small())
            .unwrap_err();
        assert_eq!(err.stage(), Stage::Validate);
        let err = run_params(
            Params { alpha: 0.05, g: 0.0, mu: 1.0 }, Grid::default(), small())
            .unwrap_err();
        assert_eq!(err.stage(), Stage::Validate);
    }

    #[test]
    fn domain_error_halts_before_render() {
        let err = run_params(
            Params::default(), Grid { length: -1.0, samples: 100 }, small())
            .unwrap_err();
        assert_eq!(err.stage(), Stage::Evaluate);
        assert!(matches!(err, PipelineError::Domain(DomainError::BadLength(_))));
    }

    #[test]
    fn render_error_after_evaluate() {
        let err = run_params(
            Params::default(), Grid::default(), RenderConfig { width: 10, height: 10 })
            .unwrap_err();
        assert_eq!(err.stage(), Stage::Render);
    }
}

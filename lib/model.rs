//! Functions to evaluate the Thomas-Fermi density profile and Bogoliubov
//! excitation spectrum of a condensate in a linearly tilted potential.
//!
//! All quantities are in the dimensionless units described in
//! [`docs`][crate::docs#units].

use ndarray as nd;
use num_complex::Complex64 as C64;
use tracing::{ debug, warn };
use crate::{
    Arr1,
    error::DomainError,
    params::{ Grid, Params },
    utils::{ max_value, moving_average },
    MOMENTUM_MAX,
    MOMENTUM_SAMPLES,
    SMOOTHING_WINDOW,
};

pub type DResult<T> = Result<T, DomainError>;

/// Generate the position grid: `samples` evenly spaced points over
/// `[-length / 2, length / 2]`, endpoints included.
pub fn position_grid(grid: Grid) -> nd::Array1<f64> {
    nd::Array1::linspace(-grid.length / 2.0, grid.length / 2.0, grid.samples)
}

/// Compute the Thomas-Fermi density `max(0, (μ - α x) / g)` over a set of
/// positions.
pub fn thomas_fermi_density<S>(x: &Arr1<S>, params: Params) -> nd::Array1<f64>
where S: nd::Data<Elem = f64>
{
    let Params { alpha, g, mu } = params;
    x.mapv(|xk| ((mu - alpha * xk) / g).max(0.0))
}

/// Apply the fixed-width moving average to a density profile.
///
/// See [`moving_average`] for the treatment of the edges.
pub fn smooth_density<S>(n: &Arr1<S>) -> nd::Array1<f64>
where S: nd::Data<Elem = f64>
{
    if n.len() < SMOOTHING_WINDOW {
        warn!(
            "model::smooth_density: {} samples is fewer than the smoothing \
            window ({}); every point will be edge-damped",
            n.len(),
            SMOOTHING_WINDOW,
        );
    }
    moving_average(n, SMOOTHING_WINDOW)
}

/// Compute the order parameter `ψ = √n` from a (smoothed) density.
///
/// Negative rounding residue in `n` is clamped to zero. The imaginary part of
/// the result is identically zero.
pub fn order_parameter<S>(n: &Arr1<S>) -> nd::Array1<C64>
where S: nd::Data<Elem = f64>
{
    n.mapv(|nk| C64::from(nk.max(0.0).sqrt()))
}

/// Compute the peak density `max |ψ|²`.
///
/// Returns zero for an empty array.
pub fn peak_density<S>(psi: &Arr1<S>) -> f64
where S: nd::Data<Elem = C64>
{
    max_value(&psi.mapv(|q| q.norm())).map_or(0.0, |m| m.powi(2))
}

/// Generate the momentum grid: [`MOMENTUM_SAMPLES`] evenly spaced points over
/// `[-MOMENTUM_MAX, MOMENTUM_MAX]`.
pub fn momentum_grid() -> nd::Array1<f64> {
    nd::Array1::linspace(-MOMENTUM_MAX, MOMENTUM_MAX, MOMENTUM_SAMPLES)
}

/// Evaluate the tilted Bogoliubov dispersion
/// ```text
/// E(k) = √(k² (k² + 2 g n₀)) + α k
/// ```
/// at a single momentum.
pub fn dispersion(k: f64, params: Params, n0: f64) -> f64 {
    let k2 = k.powi(2);
    (k2 * (k2 + 2.0 * params.g * n0)).sqrt() + params.alpha * k
}

/// Evaluate the tilted Bogoliubov dispersion over a set of momenta.
pub fn bogoliubov_energy<S>(k: &Arr1<S>, params: Params, n0: f64)
    -> nd::Array1<f64>
where S: nd::Data<Elem = f64>
{
    k.mapv(|kk| dispersion(kk, params, n0))
}

/// The result of a single model evaluation.
///
/// This struct is only returned by [`evaluate`]; all arrays are fixed at
/// construction and exposed through shared references.
#[derive(Clone, Debug)]
pub struct Evaluation {
    params: Params,
    grid: Grid,
    // position array
    x: nd::Array1<f64>,
    // order parameter
    psi: nd::Array1<C64>,
    // momentum array
    k: nd::Array1<f64>,
    // excitation energies
    E: nd::Array1<f64>,
    // peak density
    n0: f64,
}

impl Evaluation {
    /// Get the parameters used to generate `self`.
    pub fn params(&self) -> Params { self.params }

    /// Get the position grid parameters used to generate `self`.
    pub fn grid(&self) -> Grid { self.grid }

    /// Get a reference to the position array.
    pub fn x(&self) -> &nd::Array1<f64> { &self.x }

    /// Get a reference to the order parameter.
    pub fn psi(&self) -> &nd::Array1<C64> { &self.psi }

    /// Get a reference to the momentum array.
    pub fn k(&self) -> &nd::Array1<f64> { &self.k }

    /// Get a reference to the excitation energies.
    pub fn E(&self) -> &nd::Array1<f64> { &self.E }

    /// Get the peak density.
    pub fn n0(&self) -> f64 { self.n0 }

    /// Compute the real part of the order parameter.
    pub fn psi_real(&self) -> nd::Array1<f64> { self.psi.mapv(|q| q.re) }

    /// Compute the imaginary part of the order parameter.
    pub fn psi_imag(&self) -> nd::Array1<f64> { self.psi.mapv(|q| q.im) }

    /// Compute the density `|ψ|²`.
    pub fn density(&self) -> nd::Array1<f64> { self.psi.mapv(|q| q.norm_sqr()) }

    /// Compute the phase `arg ψ` in radians.
    pub fn phase(&self) -> nd::Array1<f64> { self.psi.mapv(|q| q.arg()) }

    /// Deconstruct into `(x, ψ, k, E, n₀)`.
    pub fn into_parts(self)
        -> (nd::Array1<f64>, nd::Array1<C64>, nd::Array1<f64>, nd::Array1<f64>, f64)
    {
        (self.x, self.psi, self.k, self.E, self.n0)
    }
}

/// Evaluate the model for a given set of physical parameters over a given
/// position grid.
///
/// This performs, in order:
/// 1. generation of the position grid
/// 2. computation of the Thomas-Fermi density
/// 3. smoothing via a 5-point moving average
/// 4. computation of the order parameter
/// 5. computation of the peak density
/// 6. generation of the momentum grid
/// 7. computation of the excitation spectrum
///
/// Inputs are not checked against the bounds of their form fields (see
/// [`Params::validate`]), but this function will return a [`DomainError`] for
/// `g == 0`, any non-finite parameter, `grid.length <= 0`, `grid.samples == 0`,
/// or if any output contains NaN or infinite values.
pub fn evaluate(params: Params, grid: Grid) -> DResult<Evaluation> {
    DomainError::check_finite("alpha", params.alpha)?;
    DomainError::check_finite("g", params.g)?;
    DomainError::check_finite("mu", params.mu)?;
    DomainError::check_finite("length", grid.length)?;
    DomainError::check_interaction(params.g)?;
    DomainError::check_length(grid.length)?;
    DomainError::check_samples(grid.samples)?;

    let x = position_grid(grid);
    let n_tf = thomas_fermi_density(&x, params);
    DomainError::check_output("density", &n_tf)?;
    let n = smooth_density(&n_tf);
    let psi = order_parameter(&n);
    let n0 = peak_density(&psi);
    DomainError::check_output("n0", &[n0])?;
    let k = momentum_grid();
    let E = bogoliubov_energy(&k, params, n0);
    DomainError::check_output("E", &E)?;
    debug!(
        alpha = params.alpha,
        g = params.g,
        mu = params.mu,
        samples = grid.samples,
        n0,
        "model::evaluate: done"
    );
    Ok(Evaluation { params, grid, x, psi, k, E, n0 })
}

/// Evaluate the model over the default position grid.
pub fn simulate(alpha: f64, g: f64, mu: f64) -> DResult<Evaluation> {
    evaluate(Params { alpha, g, mu }, Grid::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{ argmax, is_strictly_increasing };

    fn ev(alpha: f64, g: f64, mu: f64) -> Evaluation {
        simulate(alpha, g, mu).unwrap()
    }

    #[test]
    fn lengths() {
        for samples in [1, 3, 5, 64, 1000, 2001] {
            let e = evaluate(Params::default(), Grid { length: 20.0, samples })
                .unwrap();
            assert_eq!(e.x().len(), samples);
            assert_eq!(e.psi().len(), samples);
            assert_eq!(e.k().len(), MOMENTUM_SAMPLES);
            assert_eq!(e.E().len(), MOMENTUM_SAMPLES);
        }
    }

    #[test]
    fn grids_are_strictly_increasing() {
        let e = ev(0.3, 1.2, 2.0);
        assert!(is_strictly_increasing(e.x()));
        assert!(is_strictly_increasing(e.k()));
        assert_eq!(e.k()[0], -5.0);
        assert_eq!(e.k()[MOMENTUM_SAMPLES - 1], 5.0);
    }

    #[test]
    fn deterministic() {
        let a = ev(0.7, 0.2, 2.5);
        let b = ev(0.7, 0.2, 2.5);
        assert_eq!(a.x(), b.x());
        assert_eq!(a.psi(), b.psi());
        assert_eq!(a.k(), b.k());
        assert_eq!(a.E(), b.E());
        assert_eq!(a.n0(), b.n0());
    }

    #[test]
    fn nonnegative_and_real() {
        for &(alpha, g, mu) in &[(0.0, 0.01, 0.1), (1.0, 0.01, 0.1), (1.0, 2.0, 3.0)] {
            let e = ev(alpha, g, mu);
            assert!(e.psi_real().iter().all(|q| *q >= 0.0));
            assert!(e.psi_imag().iter().all(|q| *q == 0.0));
            assert!(e.density().iter().all(|n| *n >= 0.0));
            assert!(e.phase().iter().all(|p| *p == 0.0));
            assert!(e.E().iter().all(|en| en.is_finite()));
        }
    }

    #[test]
    fn untilted_density_is_flat() {
        let x = position_grid(Grid::default());
        let params = Params { alpha: 0.0, g: 0.5, mu: 1.0 };
        let n = thomas_fermi_density(&x, params);
        assert!(n.iter().all(|nk| *nk == 2.0));
    }

    #[test]
    fn density_clamped_past_edge() {
        // cloud edge at x = μ / α = 2
        let x = position_grid(Grid::default());
        let params = Params { alpha: 0.5, g: 1.0, mu: 1.0 };
        let n = thomas_fermi_density(&x, params);
        x.iter().zip(&n)
            .for_each(|(xk, nk)| {
                if *xk >= 2.0 {
                    assert_eq!(*nk, 0.0);
                } else {
                    assert!(*nk > 0.0);
                }
            });
    }

    #[test]
    fn order_parameter_clamps_negative_residue() {
        let psi = order_parameter(&nd::array![-1e-17, 4.0, 0.0, -3.0]);
        assert_eq!(
            psi,
            nd::array![C64::new(0.0, 0.0), C64::new(2.0, 0.0), C64::new(0.0, 0.0), C64::new(0.0, 0.0)],
        );
        assert!(psi.iter().all(|q| !q.re.is_nan() && !q.im.is_nan()));
        assert_eq!(peak_density(&psi), 4.0);
    }

    #[test]
    fn reference_scenario() {
        let e = ev(0.05, 0.5, 1.0);
        let x = e.x();
        assert_eq!(x[0], -10.0);
        assert_eq!(x[999], 10.0);

        // density decreases left to right; the peak sits at the first point
        // not damped by the smoothing edge
        let density = e.density();
        assert_eq!(argmax(&density), Some(2));
        let n_tf = thomas_fermi_density(x, e.params());
        let expected = n_tf.slice(nd::s![0..5]).sum() / 5.0;
        assert!((e.n0() - expected).abs() < 1e-12);
        assert!((e.n0() - (1.0 - 0.05 * x[2]) / 0.5).abs() < 1e-9);

        assert_eq!(dispersion(0.0, e.params(), e.n0()), 0.0);
        let kmin = e.k().iter().zip(e.E())
            .min_by(|l, r| l.0.abs().partial_cmp(&r.0.abs()).unwrap())
            .unwrap();
        assert!(kmin.1.abs() < 0.2);
    }

    #[test]
    fn untilted_spectrum_is_symmetric() {
        let e = ev(0.0, 0.5, 1.0);
        let en = e.E();
        let n = en.len();
        (0..n / 2).for_each(|i| {
            assert!((en[i] - en[n - 1 - i]).abs() < 1e-12);
        });
    }

    #[test]
    fn tilt_term_is_antisymmetric() {
        let params = Params { alpha: 0.4, g: 1.0, mu: 1.0 };
        let (ep, em) = (dispersion(2.0, params, 1.5), dispersion(-2.0, params, 1.5));
        assert!(((ep - em) - 2.0 * 0.4 * 2.0).abs() < 1e-12);
    }

    #[test]
    fn spectrum_may_go_negative() {
        // on a short grid the cloud stays dilute enough that the tilt term
        // beats the phonon branch at small negative k
        let params = Params { alpha: 1.0, g: 0.01, mu: 0.1 };
        let e = evaluate(params, Grid { length: 0.2, samples: 100 }).unwrap();
        assert!(2.0 * params.g * e.n0() < 1.0);
        assert!(e.E().iter().any(|en| *en < 0.0));
    }

    #[test]
    fn domain_errors() {
        assert!(matches!(simulate(0.05, 0.0, 1.0), Err(DomainError::ZeroInteraction)));
        assert!(matches!(
            simulate(f64::NAN, 0.5, 1.0),
            Err(DomainError::NonFinite("alpha", _))
        ));
        assert!(matches!(
            simulate(0.05, 0.5, f64::INFINITY),
            Err(DomainError::NonFinite("mu", _))
        ));
        assert!(matches!(
            evaluate(Params::default(), Grid { length: 0.0, samples: 10 }),
            Err(DomainError::BadLength(_))
        ));
        assert!(matches!(
            evaluate(Params::default(), Grid { length: 20.0, samples: 0 }),
            Err(DomainError::BadSamples(0))
        ));
    }

    #[test]
    fn overflow_is_reported() {
        let params = Params { alpha: 0.0, g: 1e-308, mu: 1e10 };
        assert!(matches!(
            evaluate(params, Grid::default()),
            Err(DomainError::NonFiniteOutput(_))
        ));
    }

    #[test]
    fn into_parts_preserves_arrays() {
        let e = ev(0.05, 0.5, 1.0);
        let n0 = e.n0();
        let x0 = e.x().clone();
        let (x, psi, k, E, n0_) = e.into_parts();
        assert_eq!(x, x0);
        assert_eq!(psi.len(), 1000);
        assert_eq!((k.len(), E.len()), (200, 200));
        assert_eq!(n0, n0_);
    }
}

//! Theoretical background.
//!
//! # Contents
//! - [Background](#background)
//! - [Units](#units)
//! - [Smoothing](#smoothing)
//! - [Excitations](#excitations)
//!
//! # Background
//! At zero temperature, a dilute Bose gas with contact interactions is
//! described by a single macroscopic wavefunction *ψ*(*x*) obeying the
//! (time-independent) Gross-Pitaevskii equation (GPE)[^1]
//! ```text
//!    ħ² ∂²ψ
//! - --- --- + V(x) ψ(x) + g |ψ(x)|² ψ(x) = μ ψ(x)
//!   2 m ∂x²
//! ```
//! where *g* is an effective interaction strength, *μ* is the chemical
//! potential, and |*ψ*|² = *n* is the local density. For a condensate with
//! many atoms and repulsive interactions, the kinetic term is small compared
//! to the interaction and potential energies everywhere except near the edge of
//! the cloud. Dropping it entirely gives the Thomas-Fermi approximation,
//! ```text
//! n(x) = max(0, (μ - V(x)) / g)
//! ```
//! i.e. the condensate fills the potential up to the chemical potential, and
//! is absent wherever *V*(*x*) > *μ*.
//!
//! Here the trapping potential is taken to be a pure linear tilt (a uniform
//! force, such as gravity),
//! ```text
//! V(x) = α x
//! ```
//! so that the density decreases linearly from left to right and vanishes
//! beyond the edge at *x* = *μ*/*α*. On a finite grid [-*L*/2, *L*/2] the
//! left-hand side of the grid acts as a hard wall. For *α* = 0 the density is
//! uniform at *μ*/*g*.
//!
//! Since the Thomas-Fermi density carries no phase information, the order
//! parameter is taken to be the non-negative real root *ψ* = √*n*. It is
//! nevertheless represented as a complex array so that the real and imaginary
//! parts (and the phase arg *ψ*) can be inspected uniformly; under this model
//! the imaginary part and phase are identically zero.
//!
//! # Units
//! All quantities are dimensionless. Starting from the GPE above, one chooses
//! a length scale *a* and energy scale *ε* = *ħ*²/2 *m* *a*² and rescales
//! *x* → *x*/*a*, *μ* → *μ*/*ε*, *V* → *V*/*ε*, so that the kinetic term
//! becomes simply -*∂*²/*∂x*². Momenta are then measured in units of 1/*a* and
//! excitation energies in units of *ε*, giving the free-particle dispersion
//! *E* = *k*².
//!
//! # Smoothing
//! The clamp to zero in the Thomas-Fermi density produces a kink at the cloud
//! edge. Before the order parameter is computed, the density is passed through
//! a centered, 5-point moving average:
//! ```text
//!         1   2
//! n'[i] = -   Σ   n[i + j]
//!         5  j=-2
//! ```
//! where any *n*\[*i* + *j*\] falling outside the grid is taken to be zero. The
//! output has exactly as many points as the input. Note that this zero-padding
//! damps the two outermost points on either side of the grid (to 3/5 and 4/5
//! of their neighbors' values for a flat profile), so that for *α* > 0 the
//! maximum of the smoothed density sits at the third grid point from the left
//! rather than the first.
//!
//! # Excitations
//! Small-amplitude excitations on top of a uniform condensate of density
//! *n*₀ follow the Bogoliubov dispersion[^2]
//! ```text
//! E(k) = √(k² (k² + 2 g n₀))
//! ```
//! which is linear (phonon-like, with sound speed √(2 *g* *n*₀)) for small *k*
//! and quadratic (free-particle-like) for large *k*. The tilt is included
//! heuristically as a Doppler-like shift linear in *k*,
//! ```text
//! E(k) = √(k² (k² + 2 g n₀)) + α k
//! ```
//! with *n*₀ taken to be the peak of the (smoothed) density. The radicand is
//! non-negative whenever *g* *n*₀ ≥ 0. For |*α*| greater than the sound speed,
//! *E*(*k*) goes negative over a range of *k* with sign opposite to *α*; this
//! is an artifact of the local treatment, not an error.
//!
//! [^1]: L. Pitaevskii and S. Stringari, *Bose-Einstein Condensation and
//! Superfluidity*. Oxford University Press (2016).
//!
//! [^2]: N. N. Bogoliubov, "On the theory of superfluidity." J. Phys. (USSR)
//! **11** 23 (1947).

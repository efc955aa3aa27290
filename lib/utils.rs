//! Miscellaneous tools.

use ndarray::{ self as nd, Ix1 };
use num_traits::{ Float, NumCast };

/// Compute the centered moving average of `y` over a window of `window`
/// points.
///
/// Points beyond either end of `y` are treated as zeros and every output point
/// is divided by the full window width, so that values within `window / 2`
/// points of either edge are damped. This is equivalent to a "same"-mode
/// discrete convolution with a uniform kernel. The output always has the same
/// length as `y`, even when `y` is shorter than the window.
///
/// For even `window`, the extra point is taken from the left.
///
/// *Panics if `window` is zero or not representable as `A`*.
pub fn moving_average<S, A>(y: &nd::ArrayBase<S, Ix1>, window: usize)
    -> nd::Array1<A>
where
    S: nd::Data<Elem = A>,
    A: Float,
{
    assert!(window > 0, "moving_average: window must be non-zero");
    let n = y.len();
    let w: A
        = <A as NumCast>::from(window)
        .expect("moving_average: window not representable");
    let back = window / 2;
    let fwd = window - 1 - back;
    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(back);
            let hi = (i + fwd + 1).min(n);
            y.slice(nd::s![lo..hi]).iter()
                .fold(A::zero(), |acc, yk| acc + *yk)
                / w
        })
        .collect()
}

/// Return the largest value in `y`, ignoring NaNs.
///
/// Returns `None` if `y` has no non-NaN elements.
pub fn max_value<S, A>(y: &nd::ArrayBase<S, Ix1>) -> Option<A>
where
    S: nd::Data<Elem = A>,
    A: Float,
{
    y.iter().copied()
        .filter(|yk| !yk.is_nan())
        .fold(None, |acc: Option<A>, yk| Some(acc.map_or(yk, |m| m.max(yk))))
}

/// Return the index of the largest value in `y`, ignoring NaNs.
///
/// Ties resolve to the first occurrence.
pub fn argmax<S, A>(y: &nd::ArrayBase<S, Ix1>) -> Option<usize>
where
    S: nd::Data<Elem = A>,
    A: Float,
{
    y.iter().copied().enumerate()
        .filter(|(_, yk)| !yk.is_nan())
        .fold(None, |acc: Option<(usize, A)>, (k, yk)| {
            match acc {
                Some((_, m)) if m >= yk => acc,
                _ => Some((k, yk)),
            }
        })
        .map(|(k, _)| k)
}

/// Return `true` if every element of `y` is strictly greater than the one
/// before it.
pub fn is_strictly_increasing<S, A>(y: &nd::ArrayBase<S, Ix1>) -> bool
where
    S: nd::Data<Elem = A>,
    A: PartialOrd,
{
    y.iter().zip(y.iter().skip(1)).all(|(yk, ykp1)| yk < ykp1)
}

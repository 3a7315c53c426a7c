//! Series statistics over daily metric values
//!
//! Thin wrappers around `trueno::Vector` SIMD kernels, specialized for
//! short, sparse self-report series. Every function returns `Option`: an
//! empty or degenerate series yields `None`, never a fabricated number and
//! never a panic (Jidoka: stop rather than pass a defect downstream).
//!
//! trueno's `variance()` divides by n (population variance); correlation
//! gating here is specified against sample variance, so the n-1 form is
//! computed from centered dot products built on kernels the rest of the
//! crate already exercises.

use trueno::Vector;

/// Arithmetic mean of a series
///
/// Returns `None` for an empty series.
#[must_use]
pub fn mean(series: &[f32]) -> Option<f32> {
    if series.is_empty() {
        return None;
    }
    Vector::from_slice(series).mean().ok()
}

/// Sample variance (n-1 denominator) of a series
///
/// Returns `None` when fewer than two values are present, since a single
/// observation carries no spread information.
#[must_use]
pub fn sample_variance(series: &[f32]) -> Option<f32> {
    let n = series.len();
    if n < 2 {
        return None;
    }
    let mu = mean(series)?;
    let centered: Vec<f32> = series.iter().map(|v| v - mu).collect();
    let vec = Vector::from_slice(&centered);
    let ss = vec.dot(&vec).ok()?;
    #[allow(clippy::cast_precision_loss)]
    let denom = (n - 1) as f32;
    Some(ss / denom)
}

/// Sample standard deviation of a series
///
/// Returns `None` when fewer than two values are present.
#[must_use]
pub fn sample_stddev(series: &[f32]) -> Option<f32> {
    sample_variance(series).map(f32::sqrt)
}

/// Least-squares slope of `ys` against `xs`
///
/// `xs` carries day offsets so gaps in a sparse history weigh correctly;
/// callers must supply equal-length slices. Returns `None` for fewer than
/// two points, mismatched lengths, or a degenerate x spread (all
/// observations on the same day).
#[must_use]
pub fn slope(xs: &[f32], ys: &[f32]) -> Option<f32> {
    let n = xs.len();
    if n < 2 || n != ys.len() {
        return None;
    }

    let xv = Vector::from_slice(xs);
    let yv = Vector::from_slice(ys);

    #[allow(clippy::cast_precision_loss)]
    let n_f = n as f32;
    let sum_x = xv.sum_kahan().ok()?;
    let sum_y = yv.sum_kahan().ok()?;
    let sum_xy = xv.dot(&yv).ok()?;
    let sum_x2 = xv.dot(&xv).ok()?;

    let denom = n_f * sum_x2 - sum_x * sum_x;
    if denom.abs() < f32::EPSILON {
        return None;
    }

    Some((n_f * sum_xy - sum_x * sum_y) / denom)
}

use std::iter;
use std::ops::Div;
use num_traits::NumAssign;


pub fn mean<T, I>(xs: I) -> T
where T: NumAssign + Copy + Div<f64, Output=T> + iter::Sum<T>,
      I: AsRef<[T]>,
{
    let xs = xs.as_ref();
    let len = xs.len();
    assert!(len > 0);
    xs.iter().cloned().sum::<T>() / len as f64
}


/// Population standard deviation (divided by `n`, not `n-1`).
///
/// Similar to `numpy.std` with default `ddof = 0`.
pub fn population_std<I>(xs: I) -> f64
where I: AsRef<[f64]>,
{
    let xs = xs.as_ref();
    let m = mean(xs);
    let var = xs.iter()
        .map(|x| (x - m) * (x - m))
        .sum::<f64>() / xs.len() as f64;
    var.sqrt()
}


/// Piecewise linear interpolation of `(xs, ys)` evaluated at `x`.
///
/// Values outside `[xs[0], xs[n-1]]` are clamped to the boundary samples.
/// Similar to `numpy.interp`.
///
/// Requirements: `xs` sorted in ascending order, `xs.len() == ys.len() >= 1`.
pub fn interp(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    assert!(!xs.is_empty());
    assert!(xs.len() == ys.len());

    let last = xs.len() - 1;
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[last] {
        return ys[last];
    }

    // xs[j-1] <= x < xs[j]
    let j = xs.partition_point(|&v| v <= x);
    let (x0, x1) = (xs[j-1], xs[j]);
    let (y0, y1) = (ys[j-1], ys[j]);
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}


/// Result of an ordinary least-squares fit `y = slope * x + intercept`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Standard error of the slope, `0` when only two points are fitted.
    pub slope_std_err: f64,
}


/// Ordinary least-squares regression of `ys` against `xs`, intercept not fixed.
///
/// Returns `None` if all `xs` are identical, where the slope is undefined.
/// Similar to `scipy.stats.linregress`.
///
/// Requirements: `xs.len() == ys.len() >= 2`.
pub fn linear_fit<I1, I2>(xs: I1, ys: I2) -> Option<LinearFit>
where I1: AsRef<[f64]>,
      I2: AsRef<[f64]>,
{
    let xs = xs.as_ref();
    let ys = ys.as_ref();
    assert!(xs.len() >= 2);
    assert!(xs.len() == ys.len());

    // checked on the raw values, `sxx` may be a few ULPs off zero after
    // subtracting an inexact mean
    if xs.iter().all(|&x| x == xs[0]) {
        return None;
    }

    let n = xs.len();
    let xm = mean(xs);
    let ym = mean(ys);

    let (sxx, sxy) = iter::zip(xs, ys)
        .fold((0.0, 0.0), |(sxx, sxy), (&x, &y)| {
            (sxx + (x - xm) * (x - xm), sxy + (x - xm) * (y - ym))
        });

    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = ym - slope * xm;

    let slope_std_err = if n > 2 {
        let ssr = iter::zip(xs, ys)
            .map(|(&x, &y)| {
                let r = y - (slope * x + intercept);
                r * r
            })
            .sum::<f64>();
        (ssr / (n - 2) as f64 / sxx).sqrt()
    } else {
        0.0
    };

    Some(LinearFit { slope, intercept, slope_std_err })
}


#[cfg(test)]
mod tests{
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1.0f64, 2.0, 3.0, 4.0]), 2.5);
    }


    #[test]
    fn test_population_std() {
        assert_eq!(population_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), 2.0);
        assert_eq!(population_std(&[3.0]), 0.0);
        assert_eq!(population_std(&[1.0, 3.0]), 1.0);
    }


    #[test]
    fn test_interp() {
        let xs = &[0.0, 1.0, 3.0];
        let ys = &[0.0, 2.0, 6.0];
        assert_eq!(interp(0.5, xs, ys), 1.0);
        assert_eq!(interp(2.0, xs, ys), 4.0);
        assert_eq!(interp(1.0, xs, ys), 2.0);
        assert_eq!(interp(3.0, xs, ys), 6.0);

        // clamped on both ends
        assert_eq!(interp(-1.0, xs, ys), 0.0);
        assert_eq!(interp(10.0, xs, ys), 6.0);

        assert_eq!(interp(5.0, &[2.0], &[7.0]), 7.0);
    }


    #[test]
    fn test_linear_fit() {
        let xs = &[0.0, 1.0, 2.0, 3.0];
        let ys = &[1.0, 3.0, 5.0, 7.0];
        let fit = linear_fit(xs, ys).unwrap();
        assert_eq!(fit.slope, 2.0);
        assert_eq!(fit.intercept, 1.0);
        assert_eq!(fit.slope_std_err, 0.0);

        let xs = &[0.0, 1.0, 2.0, 3.0, 4.0];
        let ys = &[0.1, 0.9, 2.2, 2.8, 4.1];
        let fit = linear_fit(xs, ys).unwrap();
        assert!((fit.slope - 0.99).abs() < 1E-12);
        assert!((fit.intercept - 0.04).abs() < 1E-12);
        // ssr = 0.107, sxx = 10
        assert!((fit.slope_std_err - (0.107f64 / 3.0 / 10.0).sqrt()).abs() < 1E-12);

        assert!(linear_fit(&[1.0, 1.0, 1.0], &[0.0, 1.0, 2.0]).is_none());
        assert!(linear_fit(&[0.1; 3], &[0.0, 1.0, 2.0]).is_none());
        assert!(linear_fit(&[0.3; 10], &[1.0; 10]).is_none());
    }
}

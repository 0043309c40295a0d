use std::fmt;

use shared::{
    log,
    DcmError,
    numeric_methods::linear_fit,
};

use crate::constants::DIFFUSION_FACTOR_2D;
use crate::core::MsdSeries;


/// Diffusion coefficient obtained from a straight-line fit of `MSD(t)`.
///
/// `slope_std_err` is the standard error of the *slope*; the uncertainty of
/// `diffusion_coefficient` is `slope_std_err / 4`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiffusionEstimate {
    pub diffusion_coefficient: f64,
    pub slope:                 f64,
    pub intercept:             f64,
    pub slope_std_err:         f64,
}


impl DiffusionEstimate {
    /// `(D, slope, slope_std_err)`
    pub fn as_tuple(&self) -> (f64, f64, f64) {
        (self.diffusion_coefficient, self.slope, self.slope_std_err)
    }

    /// Fitted `MSD` at time `t`.
    pub fn evaluate(&self, t: f64) -> f64 {
        self.slope * t + self.intercept
    }
}


impl fmt::Display for DiffusionEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, " {:>24} = {:.6E}", "diffusion coefficient", self.diffusion_coefficient)?;
        writeln!(f, " {:>24} = {:.6E}", "slope", self.slope)?;
        writeln!(f, " {:>24} = {:.6E}", "slope std error", self.slope_std_err)?;
        write!(f,   " {:>24} = {:.6E}", "intercept", self.intercept)
    }
}


/// Least-squares fit of `average_msd` against `time`, `D = slope / 4`.
///
/// The intercept is left free. Fails with `InsufficientData` for less than two
/// points and with `DegenerateFit` when every time value is the same.
pub fn estimate_diffusion_coefficient(msd: &MsdSeries) -> Result<DiffusionEstimate, DcmError> {
    if msd.time.len() != msd.average_msd.len() {
        return Err(DcmError::InsufficientData(format!(
            "time and msd have different lengths: {} != {}", msd.time.len(), msd.average_msd.len())));
    }
    if msd.time.len() < 2 {
        return Err(DcmError::InsufficientData(format!(
            "at least 2 points are required for a linear fit, got {}", msd.time.len())));
    }

    let fit = linear_fit(msd.time.to_vec(), msd.average_msd.to_vec())
        .ok_or_else(|| DcmError::DegenerateFit(
                "all time values are identical, the slope is undefined".into()))?;

    Ok(DiffusionEstimate {
        diffusion_coefficient: fit.slope / DIFFUSION_FACTOR_2D,
        slope:                 fit.slope,
        intercept:             fit.intercept,
        slope_std_err:         fit.slope_std_err,
    })
}


/// Fit `msd` and log the result, a failed fit is only reported as a warning.
pub fn fit_and_report(msd: &MsdSeries) -> Option<DiffusionEstimate> {
    match estimate_diffusion_coefficient(msd) {
        Ok(est) => {
            log::info!("Linear fit of MSD(t) with {} points:\n{}", msd.len(), est);
            Some(est)
        },
        Err(e) => {
            log::warn!("Diffusion coefficient not available: {}", e);
            None
        },
    }
}

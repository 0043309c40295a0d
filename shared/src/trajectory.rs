use crate::{DcmError, MatX2};

/// Time series of the tracked particle for one simulation run.
///
/// `times[i]` is the timestamp of `positions[i]`. A trajectory without any frame
/// is valid and means the run produced no data.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trajectory {
    pub times: Vec<f64>,
    pub positions: MatX2<f64>,
}


impl Trajectory {
    pub fn new(times: Vec<f64>, positions: MatX2<f64>) -> Result<Self, DcmError> {
        let traj = Self { times, positions };
        traj.check()?;
        Ok(traj)
    }

    /// Number of recorded frames.
    pub fn len(&self) -> usize { self.times.len() }
    pub fn is_empty(&self) -> bool { self.times.is_empty() }

    pub fn check(&self) -> Result<(), DcmError> {
        if self.times.len() != self.positions.len() {
            return Err(DcmError::InvalidEnsemble(format!(
                "trajectory has {} timestamps but {} positions",
                self.times.len(), self.positions.len()
            )));
        }
        if let Some(i) = self.times.iter().position(|t| !t.is_finite()) {
            return Err(DcmError::InvalidEnsemble(format!(
                "timestamp #{} is not a finite number: {}", i, self.times[i]
            )));
        }
        Ok(())
    }

    /// Smallest and largest timestamp, `None` for an empty trajectory.
    pub fn time_range(&self) -> Option<(f64, f64)> {
        self.times.iter().fold(None, |acc, &t| match acc {
            None => Some((t, t)),
            Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
        })
    }
}


impl From<Vec<(f64, [f64; 2])>> for Trajectory {
    fn from(dat: Vec<(f64, [f64; 2])>) -> Self {
        let (times, positions) = dat.into_iter().unzip();
        Self { times, positions }
    }
}

use shared::{
    log,
    numeric_methods::population_std,
    DcmError,
    Trajectory,
    Vector,
};

use crate::core::MsdSeries;


/// Windowed MSD of one trajectory.
///
/// Windows `[t0, t0 + interval]` start at `start_time` and advance by `interval` while
/// `t0 + interval <= max_time` (`max_time` defaults to the last timestamp). Both window
/// ends snap to the first frame at or after them. For each window the displacement
/// `d = r(j) - r(i)` gives
///
/// - `msd = (d.x² + d.y²) / 2`, the average of the two squared components;
/// - `std`, the population standard deviation of `[d.x², d.y²]`.
///
/// Windows whose ends fall past the last frame are skipped. `times` must be sorted
/// in ascending order.
pub fn compute_single_run_msd(
    traj: &Trajectory,
    start_time: f64,
    interval: f64,
    max_time: Option<f64>) -> Result<MsdSeries, DcmError> {

    traj.check()?;

    if !(interval.is_finite() && interval > 0.0) {
        return Err(DcmError::InvalidParameter(format!(
            "interval must be a positive finite number, got {}", interval)));
    }
    if !start_time.is_finite() {
        return Err(DcmError::InvalidParameter(format!(
            "start_time must be finite, got {}", start_time)));
    }
    if let Some(t) = max_time {
        if !t.is_finite() {
            return Err(DcmError::InvalidParameter(format!("max_time must be finite, got {}", t)));
        }
    }

    let Some(&last_time) = traj.times.last() else {
        log::debug!("Empty trajectory, no MSD window available.");
        return Ok(MsdSeries::default());
    };
    let max_time = max_time.unwrap_or(last_time);
    let nframes = traj.len();

    let mut time = vec![];
    let mut msd = vec![];
    let mut std = vec![];
    let mut nskipped = 0usize;

    let mut t0 = start_time;
    while t0 + interval <= max_time {
        let i = traj.times.partition_point(|&t| t < t0);
        let j = traj.times.partition_point(|&t| t < t0 + interval);

        if i < nframes && j < nframes {
            let [x0, y0] = traj.positions[i];
            let [x1, y1] = traj.positions[j];
            let dx2 = (x1 - x0).powi(2);
            let dy2 = (y1 - y0).powi(2);

            time.push(t0);
            msd.push((dx2 + dy2) / 2.0);
            std.push(population_std([dx2, dy2]));
        } else {
            nskipped += 1;
        }

        t0 += interval;
    }

    if nskipped > 0 {
        log::debug!("{} MSD window(s) beyond the last frame were skipped.", nskipped);
    }

    Ok(MsdSeries {
        time:          Vector::from(time),
        average_msd:   Vector::from(msd),
        std_deviation: Vector::from(std),
    })
}

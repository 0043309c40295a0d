
use shared::{
    log,
    ndarray::Axis,
    numeric_methods::interp,
    DcmError,
    Matrix,
    Trajectory,
    Vector,
};

use crate::core::MsdSeries;


/// Ensemble MSD on a common time grid.
///
/// The grid is `num_points` evenly spaced times from `max(start_time, t_min)` to `t_max`,
/// where `t_min` and `t_max` span every non-empty run. Each run is sorted by time and
/// its `x(t)` and `y(t)` are linearly interpolated onto the grid, clamped outside of the
/// run's own time range. The squared displacement `(x - x0)² + (y - y0)²` is measured
/// from the run's earliest sample, then averaged over runs. `std_deviation` is the
/// population standard deviation across runs.
///
/// Runs without any frame contribute zeros. If no run has a frame, or `num_points`
/// is zero, the result is empty.
///
/// Fails with `InvalidEnsemble` for an empty ensemble or a run with mismatched lengths
/// or non-finite times, with `InvalidParameter` for a NaN `start_time`, and with
/// `InsufficientData` when `start_time` is later than every recorded time.
pub fn compute_ensemble_msd(
    ensemble: &[Trajectory],
    start_time: f64,
    num_points: usize) -> Result<MsdSeries, DcmError> {

    if ensemble.is_empty() {
        return Err(DcmError::InvalidEnsemble("ensemble contains no trajectory".into()));
    }
    for (irun, traj) in ensemble.iter().enumerate() {
        traj.check().map_err(|e| DcmError::InvalidEnsemble(format!("run #{}: {}", irun, e)))?;
    }
    if start_time.is_nan() {
        return Err(DcmError::InvalidParameter("start_time cannot be NaN".into()));
    }

    let Some((tmin, tmax)) = ensemble.iter()
        .filter_map(Trajectory::time_range)
        .reduce(|(lo, hi), (l, h)| (lo.min(l), hi.max(h))) else {
        log::warn!("None of the {} runs contains any frame, the MSD is empty.", ensemble.len());
        return Ok(MsdSeries::default());
    };

    if num_points == 0 {
        return Ok(MsdSeries::default());
    }
    if start_time > tmax {
        return Err(DcmError::InsufficientData(format!(
            "start_time {} is beyond the last recorded time {}", start_time, tmax)));
    }

    let effective_start = start_time.max(tmin);
    let grid = Vector::linspace(effective_start, tmax, num_points);
    let grid_vec = grid.to_vec();

    let nsparse = ensemble.iter().filter(|t| t.len() < 2).count();
    if nsparse > 0 {
        log::debug!("{} of {} runs have less than two samples and contribute no displacement.",
            nsparse, ensemble.len());
    }

    let mut sd = Matrix::<f64>::zeros((ensemble.len(), num_points));
    for (mut row, traj) in sd.axis_iter_mut(Axis(0)).zip(ensemble.iter()) {
        row.assign(&squared_displacement(traj, &grid_vec));
    }

    let average_msd = sd.mean_axis(Axis(0))
        .ok_or_else(|| DcmError::InvalidEnsemble("ensemble contains no trajectory".into()))?;
    let std_deviation = sd.std_axis(Axis(0), 0.0);

    Ok(MsdSeries {
        time: grid,
        average_msd,
        std_deviation,
    })
}


/// Squared displacement of one run from its earliest sample, evaluated on `grid`.
fn squared_displacement(traj: &Trajectory, grid: &[f64]) -> Vector<f64> {
    let mut samples = traj.times.iter().copied()
        .zip(traj.positions.iter().copied())
        .collect::<Vec<(f64, [f64; 2])>>();
    samples.sort_by(|a, b| a.0.total_cmp(&b.0));

    match samples.as_slice() {
        [] => Vector::zeros(grid.len()),
        [(_, [x0, y0])] => Vector::from_elem(grid.len(), (x0 - x0).powi(2) + (y0 - y0).powi(2)),
        _ => {
            let ts = samples.iter().map(|s| s.0).collect::<Vec<_>>();
            let xs = samples.iter().map(|s| s.1[0]).collect::<Vec<_>>();
            let ys = samples.iter().map(|s| s.1[1]).collect::<Vec<_>>();
            let (x0, y0) = (xs[0], ys[0]);

            grid.iter()
                .map(|&t| {
                    let dx = interp(t, &ts, &xs) - x0;
                    let dy = interp(t, &ts, &ys) - y0;
                    dx * dx + dy * dy
                })
                .collect()
        },
    }
}

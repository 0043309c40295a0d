pub mod constants;
pub mod version;
pub mod logging;
pub mod cli;
pub use cli::OptProcess;

pub mod core;
pub use crate::core::{
    MsdSeries,
    DiffusionEstimate,
    estimate_diffusion_coefficient,
};

pub mod single;
pub use single::compute_single_run_msd;

pub mod ensemble;
pub use ensemble::compute_ensemble_msd;

pub mod observables;

pub use shared::{DcmError, Trajectory};
pub use sim_parsers::{
    Schema,
    parse_trajectory,
    parse_trajectory_with,
    parse_trajectories,
    parse_trajectories_with,
};

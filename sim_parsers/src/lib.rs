pub mod output;

pub use output::{
    OutputFile,
    FrameHeader,
    Schema,
    parse_trajectory,
    parse_trajectory_with,
    parse_trajectories,
    parse_trajectories_with,
};

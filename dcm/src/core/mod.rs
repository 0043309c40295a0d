pub mod config;
pub use config::*;

pub mod msd_series;
pub use msd_series::*;

pub mod diffusion;
pub use diffusion::*;

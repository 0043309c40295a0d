pub mod config;
pub use config::EnsembleConfig;

pub mod ensemble_impl;
pub use ensemble_impl::compute_ensemble_msd;

pub mod command;
pub use command::EnsembleCommand;

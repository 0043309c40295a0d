pub mod config;
pub use config::SingleConfig;

pub mod single_impl;
pub use single_impl::compute_single_run_msd;

pub mod command;
pub use command::SingleCommand;

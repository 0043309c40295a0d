pub mod config;
pub use config::ObservablesConfig;

pub mod observables_impl;
pub use observables_impl::{
    PressureSeries,
    CollisionSeries,
    CollisionSummary,
    pressure_series,
    equilibrium_pressure,
    collision_series,
    collision_summary,
};

pub mod command;
pub use command::ObservablesCommand;

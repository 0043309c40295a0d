use std::path::Path;
use std::fmt;
use serde::{
    de::Error,
    Deserialize,
    Deserializer,
};
use shared::{
    anyhow::anyhow,
    Result,
};
use sim_parsers::Schema;

pub trait DcmConfig: Clone + Sized + Default + fmt::Display + for<'a> Deserialize<'a> {
    fn from_file<P>(fname: P) -> Result<Self>
        where P: AsRef<Path>,
              Self: Sized;
    fn to_file<P>(&self, fname: P) -> Result<()>
        where P: AsRef<Path>;
}


pub fn default_schema() -> Schema { Schema::Auto }


pub fn parse_schema<'de, D>(deserializer: D) -> std::result::Result<Schema, D::Error>
where D: Deserializer<'de> {
    let s = String::deserialize(deserializer)?;
    Schema::from_str(&s).map_err(|e| D::Error::custom(e.to_string()))
}


/// Record a configuration problem in `ret`.
///
/// The first problem becomes the error, later ones are attached as context so that
/// `check_config` reports all of them at once.
pub fn append_problem<C>(ret: Result<()>, msg: C) -> Result<()>
where C: fmt::Display + Send + Sync + 'static {
    match ret {
        Ok(()) => Err(anyhow!("{}", msg)),
        Err(e) => Err(e.context(msg)),
    }
}

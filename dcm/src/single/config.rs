use std::fs;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use toml;
use shared::{
    log,
    anyhow::ensure,
    Result,
};
use sim_parsers::Schema;

use crate::core::{
    DcmConfig,
    append_problem,
    default_schema,
    parse_schema,
};


#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SingleConfig {
    trajectory: PathBuf,

    // "auto", "basic" or "extended"
    #[serde(default = "default_schema", deserialize_with = "parse_schema")]
    schema: Schema,

    #[serde(default = "SingleConfig::default_start_time")]
    start_time: f64,

    #[serde(default = "SingleConfig::default_interval")]
    interval: f64,

    // Defaults to the last timestamp of the trajectory.
    max_time: Option<f64>,

    #[serde(default = "SingleConfig::default_outdir")]
    outdir: PathBuf,
}


impl SingleConfig {
    fn default_start_time() -> f64 { 0.5 }
    fn default_interval() -> f64 { 0.2 }
    fn default_outdir() -> PathBuf { PathBuf::from(".") }

    pub fn get_trajectory(&self) -> &PathBuf { &self.trajectory }
    pub fn get_schema(&self) -> Schema { self.schema }
    pub fn get_start_time(&self) -> f64 { self.start_time }
    pub fn get_interval(&self) -> f64 { self.interval }
    pub fn get_max_time(&self) -> Option<f64> { self.max_time }
    pub fn get_outdir(&self) -> &PathBuf { &self.outdir }

    pub fn check_config(&self) -> Result<()> {
        let mut ret = Ok(());

        if !self.trajectory.is_file() {
            ret = append_problem(ret, format!("Field 'trajectory' does not point to a valid file: {:?}", self.trajectory));
        }

        if !self.start_time.is_finite() {
            ret = append_problem(ret, "Field 'start_time' must be a finite number.");
        }

        if !(self.interval.is_finite() && self.interval > 0.0) {
            ret = append_problem(ret, "Field 'interval' must be a positive number.");
        }

        if let Some(t) = self.max_time {
            if !t.is_finite() {
                ret = append_problem(ret, "Field 'max_time' must be a finite number.");
            } else if t < self.start_time + self.interval {
                log::warn!("Field 'max_time' is less than 'start_time + interval', the MSD will be empty.");
            }
        }

        if self.outdir.as_os_str().is_empty() {
            ret = append_problem(ret, "Field 'outdir' cannot be empty.");
        }

        ret
    }

    pub fn print_to_log(&self) {
        let input_print = format!("{}", self);
        let hashtag_line = "#".repeat(120);
        log::info!("Input file loaded. The formatted input is:\n\n{hashtag_line}\n{}\n{hashtag_line}\n\n", input_print);
    }
}


impl Default for SingleConfig {
    fn default() -> Self {
        Self {
            trajectory: PathBuf::from("output.txt"),
            schema:     default_schema(),
            start_time: Self::default_start_time(),
            interval:   Self::default_interval(),
            max_time:   None,
            outdir:     Self::default_outdir(),
        }
    }
}


impl fmt::Display for SingleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# DCM config for single-run MSD")?;
        writeln!(f)?;

        writeln!(f, " {:>20} = {:?}", "trajectory", self.trajectory)?;
        writeln!(f, " {:>20} = \"{}\"", "schema", self.schema)?;
        writeln!(f, " {:>20} = {:?}", "start_time", self.start_time)?;
        writeln!(f, " {:>20} = {:?}", "interval", self.interval)?;
        if let Some(t) = self.max_time {
            writeln!(f, " {:>20} = {:?}", "max_time", t)?;
        } else {
            writeln!(f, "#{:>20} = 10.0 # defaults to the last timestamp", "max_time")?;
        }
        writeln!(f, " {:>20} = {:?}", "outdir", self.outdir)?;

        Ok(())
    }
}


impl DcmConfig for SingleConfig {
    fn from_file<P>(fname: P) -> Result<Self>
    where P: AsRef<Path> {
        ensure!(fname.as_ref().is_file(), "Config file {:?} for SingleConfig not available.", fname.as_ref());
        let raw = fs::read_to_string(fname)?;
        let cfg = toml::from_str::<Self>(&raw)?;
        cfg.check_config()?;
        Ok(cfg)
    }

    fn to_file<P>(&self, fname: P) -> Result<()>
    where P: AsRef<Path> {
        if fname.as_ref().is_file() {
            log::warn!("File {:?} exists, overwriting ...", fname.as_ref());
        }
        log::info!("Writing config to file {:?}", fname.as_ref());
        fs::write(fname.as_ref(), self.to_string())?;
        Ok(())
    }
}

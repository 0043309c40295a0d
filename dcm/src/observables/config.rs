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
pub struct ObservablesConfig {
    trajectory: PathBuf,

    #[serde(default = "default_schema", deserialize_with = "parse_schema")]
    schema: Schema,

    #[serde(default = "ObservablesConfig::default_outdir")]
    outdir: PathBuf,
}


impl ObservablesConfig {
    fn default_outdir() -> PathBuf { PathBuf::from(".") }

    pub fn get_trajectory(&self) -> &PathBuf { &self.trajectory }
    pub fn get_schema(&self) -> Schema { self.schema }
    pub fn get_outdir(&self) -> &PathBuf { &self.outdir }

    pub fn check_config(&self) -> Result<()> {
        let mut ret = Ok(());

        if !self.trajectory.is_file() {
            ret = append_problem(ret, format!("Field 'trajectory' does not point to a valid file: {:?}", self.trajectory));
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


impl Default for ObservablesConfig {
    fn default() -> Self {
        Self {
            trajectory: PathBuf::from("output.txt"),
            schema:     Schema::Extended,
            outdir:     Self::default_outdir(),
        }
    }
}


impl fmt::Display for ObservablesConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# DCM config for pressure and collision observables")?;
        writeln!(f)?;

        writeln!(f, " {:>20} = {:?}", "trajectory", self.trajectory)?;
        writeln!(f, " {:>20} = \"{}\"", "schema", self.schema)?;
        writeln!(f, " {:>20} = {:?}", "outdir", self.outdir)?;

        Ok(())
    }
}


impl DcmConfig for ObservablesConfig {
    fn from_file<P>(fname: P) -> Result<Self>
    where P: AsRef<Path> {
        ensure!(fname.as_ref().is_file(), "Config file {:?} for ObservablesConfig not available.", fname.as_ref());
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

use std::fs;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use toml;
use shared::{
    log,
    anyhow::ensure,
    anyhow::Context,
    Regex,
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
pub struct EnsembleConfig {
    // Explicit list of trajectory files, one per run.
    #[serde(default)]
    files: Vec<PathBuf>,

    // Used only when `files` is empty: every file in `rundir` whose name matches
    // the regular expression `pattern` is taken, sorted by name.
    rundir: Option<PathBuf>,
    pattern: Option<String>,

    #[serde(default = "default_schema", deserialize_with = "parse_schema")]
    schema: Schema,

    #[serde(default = "EnsembleConfig::default_start_time")]
    start_time: f64,

    #[serde(default = "EnsembleConfig::default_num_points")]
    num_points: usize,

    #[serde(default = "EnsembleConfig::default_outdir")]
    outdir: PathBuf,
}


impl EnsembleConfig {
    fn default_start_time() -> f64 { 0.0 }
    fn default_num_points() -> usize { 200 }
    fn default_outdir() -> PathBuf { PathBuf::from(".") }

    pub fn get_files(&self) -> &[PathBuf] { &self.files }
    pub fn get_rundir(&self) -> Option<&PathBuf> { self.rundir.as_ref() }
    pub fn get_pattern(&self) -> Option<&str> { self.pattern.as_deref() }
    pub fn get_schema(&self) -> Schema { self.schema }
    pub fn get_start_time(&self) -> f64 { self.start_time }
    pub fn get_num_points(&self) -> usize { self.num_points }
    pub fn get_outdir(&self) -> &PathBuf { &self.outdir }


    /// Trajectory files of the ensemble, in the order they are analyzed.
    pub fn collect_files(&self) -> Result<Vec<PathBuf>> {
        if !self.files.is_empty() {
            return Ok(self.files.clone());
        }

        let rundir = self.rundir.as_ref()
            .context("Either 'files' or 'rundir' with 'pattern' is required.")?;
        let pattern = self.pattern.as_deref()
            .context("Field 'pattern' is required when 'rundir' is used.")?;
        let re = Regex::new(pattern)
            .with_context(|| format!("Invalid regular expression in 'pattern': {}", pattern))?;

        let mut ret = vec![];
        for entry in fs::read_dir(rundir)
            .with_context(|| format!("Cannot read 'rundir' {:?}", rundir))? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let matched = path.file_name()
                .and_then(|s| s.to_str())
                .map_or(false, |s| re.is_match(s));
            if matched {
                ret.push(path);
            }
        }
        ret.sort();

        ensure!(!ret.is_empty(), "No file in {:?} matches pattern {:?}.", rundir, pattern);
        log::info!("Found {} trajectory files in {:?} matching {:?}", ret.len(), rundir, pattern);
        Ok(ret)
    }


    pub fn check_config(&self) -> Result<()> {
        let mut ret = Ok(());

        if self.files.is_empty() {
            match (self.rundir.as_ref(), self.pattern.as_deref()) {
                (Some(rundir), Some(pattern)) => {
                    if !rundir.is_dir() {
                        ret = append_problem(ret, format!("Field 'rundir' does not point to a valid directory: {:?}", rundir));
                    }
                    if Regex::new(pattern).is_err() {
                        ret = append_problem(ret, format!("Field 'pattern' is not a valid regular expression: {:?}", pattern));
                    }
                },
                _ => {
                    ret = append_problem(ret, "Either 'files' or both 'rundir' and 'pattern' must be set.");
                },
            }
        } else {
            if self.rundir.is_some() || self.pattern.is_some() {
                log::warn!("Field 'files' is set, 'rundir' and 'pattern' are ignored.");
            }
            for f in self.files.iter().filter(|f| !f.is_file()) {
                ret = append_problem(ret, format!("Entry of 'files' does not point to a valid file: {:?}", f));
            }
        }

        if !self.start_time.is_finite() {
            ret = append_problem(ret, "Field 'start_time' must be a finite number.");
        }

        if self.num_points < 2 {
            ret = append_problem(ret, "Field 'num_points' must be at least 2 to fit a diffusion coefficient.");
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


impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            files:      vec![],
            rundir:     Some(PathBuf::from("../runs")),
            pattern:    Some(String::from(r"^output_\d+\.txt$")),
            schema:     default_schema(),
            start_time: Self::default_start_time(),
            num_points: Self::default_num_points(),
            outdir:     Self::default_outdir(),
        }
    }
}


impl fmt::Display for EnsembleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# DCM config for ensemble MSD over multiple runs")?;
        writeln!(f)?;

        if self.files.is_empty() {
            writeln!(f, "#{:>20} = [\"run1/output.txt\", \"run2/output.txt\"]", "files")?;
        } else {
            writeln!(f, " {:>20} = {:?}", "files", self.files)?;
        }
        if let Some(rundir) = self.rundir.as_ref() {
            writeln!(f, " {:>20} = {:?}", "rundir", rundir)?;
        }
        if let Some(pattern) = self.pattern.as_ref() {
            writeln!(f, " {:>20} = '{}'", "pattern", pattern)?;
        }
        writeln!(f, " {:>20} = \"{}\"", "schema", self.schema)?;
        writeln!(f, " {:>20} = {:?}", "start_time", self.start_time)?;
        writeln!(f, " {:>20} = {}",   "num_points", self.num_points)?;
        writeln!(f, " {:>20} = {:?}", "outdir", self.outdir)?;

        Ok(())
    }
}


impl DcmConfig for EnsembleConfig {
    fn from_file<P>(fname: P) -> Result<Self>
    where P: AsRef<Path> {
        ensure!(fname.as_ref().is_file(), "Config file {:?} for EnsembleConfig not available.", fname.as_ref());
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

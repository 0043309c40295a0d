use std::fs;
use std::path::PathBuf;

use rayon;

use clap::{Parser, ValueEnum};
use shared::{
    log,
    copy_file_to,
    Result,
};
use sim_parsers::parse_trajectories_with;
use crate::OptProcess;

use crate::core::{
    DcmConfig,
    fit_and_report,
};
use crate::ensemble;


#[derive(Debug, Parser)]
/// Average the MSD over multiple independent runs on a common time grid and fit the
/// diffusion coefficient.
pub struct EnsembleCommand {
    #[arg(short='n', long, default_value_t=0)]
    /// Number of threads for parsing the trajectory files.
    ///
    /// If 0 is set, it will fall back to the number of logic CPU cores of you machine.
    nthreads: usize,

    #[arg(short='c', long, default_value="ensemble_config.toml", aliases=["cfg", "conf"])]
    /// Config file name.
    ///
    /// Aliases: "cfg", "conf".
    config: PathBuf,

    #[arg(long, value_enum, alias="gen")]
    /// Generate auxiliary files for the analysis.
    ///
    /// The analysis will not run if this flag is set.
    ///
    /// Alias: "gen".
    generate: Option<TemplateGenerator>,
}


#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum TemplateGenerator {
    #[value(aliases=["config", "cfg", "conf"])]
    /// Generate config template for ensemble MSD.
    /// Aliases: "config", "cfg" and "conf".
    ConfigTemplate,
}


impl OptProcess for EnsembleCommand {
    fn process(&self) -> Result<()> {
        use TemplateGenerator::*;

        if let Some(g) = self.generate {
            return match g {
                ConfigTemplate => ensemble::EnsembleConfig::default().to_file("ensemble_config_template.toml"),
            }
        }

        if let Err(e) = rayon::ThreadPoolBuilder::new().num_threads(self.nthreads).build_global() {
            log::warn!("Global thread pool already set up, '--nthreads' is ignored: {}", e);
        }

        let cfg = ensemble::EnsembleConfig::from_file(&self.config)?;
        let outdir = cfg.get_outdir();
        fs::create_dir_all(outdir)?;
        crate::logging::logger_redirect(outdir)?;
        cfg.print_to_log();
        copy_file_to(&self.config, outdir)?;

        let files = cfg.collect_files()?;
        log::info!("Parsing {} trajectory files with {} threads ...", files.len(), rayon::current_num_threads());
        let runs = parse_trajectories_with(&files, cfg.get_schema())?;
        log::info!("Loaded {} runs with {} frames in total.", runs.len(), runs.iter().map(|r| r.len()).sum::<usize>());

        let msd = ensemble::compute_ensemble_msd(&runs, cfg.get_start_time(), cfg.get_num_points())?;

        let fname = outdir.join("ensemble_msd.txt");
        msd.save_to_txt(&fname)?;
        log::info!("Ensemble MSD with {} points written to {:?}", msd.len(), fname);

        fit_and_report(&msd);
        Ok(())
    }
}

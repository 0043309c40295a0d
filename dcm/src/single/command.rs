use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use shared::{
    log,
    copy_file_to,
    Result,
};
use sim_parsers::parse_trajectory_with;
use crate::OptProcess;

use crate::core::{
    DcmConfig,
    fit_and_report,
};
use crate::single;


#[derive(Debug, Parser)]
/// Compute the windowed MSD of one trajectory and fit the diffusion coefficient.
pub struct SingleCommand {
    #[arg(short='c', long, default_value="single_config.toml", aliases=["cfg", "conf"])]
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
    /// Generate config template for single-run MSD.
    /// Aliases: "config", "cfg" and "conf".
    ConfigTemplate,
}


impl OptProcess for SingleCommand {
    fn process(&self) -> Result<()> {
        use TemplateGenerator::*;

        if let Some(g) = self.generate {
            return match g {
                ConfigTemplate => single::SingleConfig::default().to_file("single_config_template.toml"),
            }
        }

        let cfg = single::SingleConfig::from_file(&self.config)?;
        let outdir = cfg.get_outdir();
        fs::create_dir_all(outdir)?;
        crate::logging::logger_redirect(outdir)?;
        cfg.print_to_log();
        copy_file_to(&self.config, outdir)?;

        let traj = parse_trajectory_with(cfg.get_trajectory(), cfg.get_schema())?;
        log::info!("Loaded {} frames from {:?}", traj.len(), cfg.get_trajectory());

        let msd = single::compute_single_run_msd(
            &traj, cfg.get_start_time(), cfg.get_interval(), cfg.get_max_time())?;

        let fname = outdir.join("single_msd.txt");
        msd.save_to_txt(&fname)?;
        log::info!("MSD with {} points written to {:?}", msd.len(), fname);

        fit_and_report(&msd);
        Ok(())
    }
}

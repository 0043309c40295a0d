use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use shared::{
    log,
    copy_file_to,
    Result,
};
use sim_parsers::OutputFile;
use crate::OptProcess;

use crate::core::DcmConfig;
use crate::observables;


#[derive(Debug, Parser)]
/// Extract pressure and collision observables from one simulation dump.
pub struct ObservablesCommand {
    #[arg(short='c', long, default_value="observables_config.toml", aliases=["cfg", "conf"])]
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
    /// Generate config template for observables extraction.
    /// Aliases: "config", "cfg" and "conf".
    ConfigTemplate,
}


impl OptProcess for ObservablesCommand {
    fn process(&self) -> Result<()> {
        use TemplateGenerator::*;

        if let Some(g) = self.generate {
            return match g {
                ConfigTemplate => observables::ObservablesConfig::default().to_file("observables_config_template.toml"),
            }
        }

        let cfg = observables::ObservablesConfig::from_file(&self.config)?;
        let outdir = cfg.get_outdir();
        fs::create_dir_all(outdir)?;
        crate::logging::logger_redirect(outdir)?;
        cfg.print_to_log();
        copy_file_to(&self.config, outdir)?;

        let output = OutputFile::from_file(cfg.get_trajectory(), cfg.get_schema())?;
        log::info!("Loaded {} frames of {} particles with {} schema from {:?}",
            output.headers.len(), output.nparticles, output.schema, cfg.get_trajectory());

        let pressure = observables::pressure_series(&output);
        let fname = outdir.join("pressure.txt");
        pressure.save_to_txt(&fname)?;
        log::info!("Pressure over time written to {:?}", fname);

        match observables::equilibrium_pressure(&pressure) {
            Some(p) => log::info!("Equilibrium pressure (last 10% of frames): {:.6E}", p),
            None    => log::warn!("No frame available, equilibrium pressure skipped."),
        }

        let Some(collisions) = observables::collision_series(&output) else {
            log::info!("The dump has no collision counters, collisions.txt is not written.");
            return Ok(());
        };
        let fname = outdir.join("collisions.txt");
        collisions.save_to_txt(&fname)?;
        log::info!("Collision counters written to {:?}", fname);

        if let Some(summary) = observables::collision_summary(&output) {
            match summary.collision_rate {
                Some(rate) => log::info!("Collision rate: {:.6E} collisions per unit time at mean temperature {:.4}",
                                         rate, summary.mean_temperature),
                None => log::warn!("Last frame is at t = 0, collision rate is undefined."),
            }
            log::info!("Obstacle collisions: {} in total, {} first-time.",
                summary.total_collisions, summary.first_time_collisions);
        }

        Ok(())
    }
}

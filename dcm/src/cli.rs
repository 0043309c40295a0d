use std::sync::OnceLock;

use clap::{
    Parser,
    builder::styling::{
        AnsiColor,
        Effects,
        Styles,
    },
};

use shared::{log, Result};
use crate::version::Version;
use crate::logging::logger_init;


pub fn get_style() -> Styles {
    static INSTANCE: OnceLock<Styles> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        Styles::styled()
            .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
            .usage(AnsiColor::Green.on_default()   | Effects::BOLD)
            .literal(AnsiColor::Green.on_default() | Effects::BOLD)
            .placeholder(AnsiColor::BrightBlue.on_default())
            .error(AnsiColor::BrightRed.on_default())
            .valid(AnsiColor::BrightYellow.on_default())
    }).to_owned()
}


pub trait OptProcess : Parser {
    fn process(&self) -> Result<()>;
}


#[derive(Debug, Parser)]
#[command(name = "dcm",
          about = Version::new().to_string(),
          long_about = format!("{:#}", Version::new()),
          version,
          author = "@Ionizing",
          styles = get_style())]
enum Opt {
    Single(crate::single::SingleCommand),
    Ensemble(crate::ensemble::EnsembleCommand),
    Observables(crate::observables::ObservablesCommand),
}


impl OptProcess for Opt {
    fn process(&self) -> Result<()> {
        use Opt::*;

        logger_init()?;
        log::info!("Global logger initialized with targets being stderr and \"./globalrun.log\"");
        log::info!("{}", Version::new());

        match self {
            Single(cmd) => cmd.process(),
            Ensemble(cmd) => cmd.process(),
            Observables(cmd) => cmd.process(),
        }
    }
}


pub fn run() -> Result<()> {
    Opt::parse().process()
}

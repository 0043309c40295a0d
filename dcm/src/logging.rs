use std::path::Path;
use std::io::IsTerminal;
use std::sync::Mutex;
use once_cell::sync::OnceCell;

use shared::{
    anyhow::anyhow,
    Result,
    log::LevelFilter,
};
use log4rs::{
    append::{
        console::{
            ConsoleAppender,
            Target,
        },
        file::FileAppender,
    },
    config::{
        Appender,
        Config,
        Root,
    },
    encode::pattern::PatternEncoder,
    init_config,
    Handle,
};


static HANDLE: OnceCell<Mutex<Handle>> = OnceCell::new();

const ENCODE_STR: &str = "{d(%Y-%m-%d %H:%M:%S)} [{h({l:>5})}] {m}{n}";


/// Console output always, `./globalrun.log` when stderr is a terminal, and
/// `<outdir>/run.log` if `outdir` is given.
fn gen_logger_config(outdir: Option<&Path>) -> Result<Config> {
    let level = LevelFilter::Info;
    let isatty = std::io::stderr().is_terminal();

    let stderr = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(ENCODE_STR)))
        .target(Target::Stderr)
        .build();

    let mut builder = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)));
    let mut root = Root::builder().appender("stderr");

    if isatty {
        let global_log = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(ENCODE_STR)))
            .build("./globalrun.log")?;
        builder = builder.appender(Appender::builder().build("global_log", Box::new(global_log)));
        root = root.appender("global_log");
    }

    if let Some(outdir) = outdir {
        let logfile = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(ENCODE_STR)))
            .build(outdir.join("run.log"))?;
        builder = builder.appender(Appender::builder().build("logfile", Box::new(logfile)));
        root = root.appender("logfile");
    }

    Ok(builder.build(root.build(level))?)
}


/// Install the global logger. Calling it more than once is harmless.
pub fn logger_init() -> Result<()> {
    HANDLE.get_or_try_init(|| -> Result<Mutex<Handle>> {
        let config = gen_logger_config(None)?;
        Ok(Mutex::new(init_config(config)?))
    })?;
    Ok(())
}


/// Additionally send the log to `<outdir>/run.log`.
pub fn logger_redirect(outdir: impl AsRef<Path>) -> Result<()> {
    logger_init()?;
    let config = gen_logger_config(Some(outdir.as_ref()))?;
    HANDLE.get()
        .ok_or_else(|| anyhow!("Global logger is not initialized."))?
        .lock()
        .map_err(|_| anyhow!("Global logger handle is poisoned."))?
        .set_config(config);
    Ok(())
}

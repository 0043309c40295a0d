use std::fmt;
use once_cell::sync::OnceCell;

pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}


const BANNER: &str = r"
+---------------------------------------------------+
|                                                   |
|     ____     ____   __  __                        |
|    |  _ \   / ___| |  \/  |    MSD & diffusion    |
|    | | | | | |     | |\/| |    of tracked         |
|    | |_| | | |___  | |  | |    particles          |
|    |____/   \____| |_|  |_|                       |
|                                                   |
+---------------------------------------------------+";


/// Build time converted to the local timezone, computed once.
fn local_build_time() -> &'static str {
    static BUILT_AT: OnceCell<String> = OnceCell::new();
    BUILT_AT.get_or_init(|| {
        built::util::strptime(built_info::BUILT_TIME_UTC)
            .with_timezone(&built::chrono::Local)
            .format("%Y-%m-%d %H:%M:%S %:z")
            .to_string()
    })
}


/// Source revision the binary was built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Revision {
    Clean(&'static str),
    Dirty(&'static str),
    Unknown,
}


impl Revision {
    fn from_build() -> Self {
        match (built_info::GIT_COMMIT_HASH_SHORT, built_info::GIT_DIRTY) {
            (Some(hash), Some(true)) => Self::Dirty(hash),
            (Some(hash), _)          => Self::Clean(hash),
            (None, _)                => Self::Unknown,
        }
    }
}


impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clean(hash) => write!(f, "{}", hash),
            Self::Dirty(hash) => write!(f, "{}-dirty", hash),
            Self::Unknown     => write!(f, "unknown revision"),
        }
    }
}


/// Banner printed by `--help` and at the top of every log.
///
/// `{}` gives the one-line summary, `{:#}` appends the toolchain the binary was
/// compiled with.
#[derive(Debug)]
pub struct Version {
    pub package:  &'static str,
    pub version:  &'static str,
    pub revision: Revision,
    pub built_at: &'static str,
    pub rustc:    &'static str,
    pub target:   &'static str,
    pub profile:  &'static str,
}


impl Version {
    pub fn new() -> Self {
        Self {
            package:  built_info::PKG_NAME,
            version:  built_info::PKG_VERSION,
            revision: Revision::from_build(),
            built_at: local_build_time(),
            rustc:    built_info::RUSTC_VERSION,
            target:   built_info::TARGET,
            profile:  built_info::PROFILE,
        }
    }
}


impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", BANNER.trim_start())?;
        writeln!(f)?;
        writeln!(f, "{} v{} ({}), built {}", self.package, self.version, self.revision, self.built_at)?;
        writeln!(f, "Mean squared displacement and diffusion coefficient of 2-D particle simulations.")?;

        if f.alternate() {
            writeln!(f)?;
            writeln!(f, "    compiled by {} for {}, '{}' profile", self.rustc, self.target, self.profile)?;
        }
        Ok(())
    }
}

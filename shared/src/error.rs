use std::fmt;

use thiserror::Error;


/// Errors raised by the trajectory reader and the MSD / diffusion analysis.
///
/// Application code usually works with [`crate::Result`] (`anyhow`), every
/// variant here converts into it with `?`.
#[derive(Debug, Error)]
pub enum DcmError {
    /// Bad or truncated simulator output.
    #[error("malformed trajectory {location}: {msg}")]
    MalformedTrajectory {
        location: Location,
        msg: String,
    },

    /// Shape mismatch inside an ensemble of trajectories.
    #[error("invalid ensemble: {0}")]
    InvalidEnsemble(String),

    /// Not enough points to build a grid or perform a regression.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// Regression input without any spread along the time axis.
    #[error("degenerate fit: {0}")]
    DegenerateFit(String),

    /// Caller supplied parameter that cannot be used.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}


/// Where in a dump file a parsing problem was found.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Location {
    /// File name, if the data came from a file.
    pub source_name: Option<String>,
    /// 1-based physical line number, `None` when the problem is end-of-file.
    pub line: Option<usize>,
}


impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.source_name.as_ref(), self.line) {
            (Some(name), Some(line)) => write!(f, "({}:{})", name, line),
            (Some(name), None)       => write!(f, "({}: end of file)", name),
            (None, Some(line))       => write!(f, "(line {})", line),
            (None, None)             => write!(f, "(end of input)"),
        }
    }
}


impl DcmError {
    pub fn malformed(line: Option<usize>, msg: impl Into<String>) -> Self {
        DcmError::MalformedTrajectory {
            location: Location { source_name: None, line },
            msg: msg.into(),
        }
    }

    /// Attach a file name to a `MalformedTrajectory` error, other variants pass through.
    pub fn with_source_name(self, name: impl Into<String>) -> Self {
        match self {
            DcmError::MalformedTrajectory { location, msg } => DcmError::MalformedTrajectory {
                location: Location { source_name: Some(name.into()), ..location },
                msg,
            },
            e => e,
        }
    }
}

use std::fs;
use std::path::Path;

pub use anyhow::{
    self,
    Result,
    Context,
    bail,
};
pub use ndarray::{
    self,
    Array1,
    Array2,
};
pub use regex::Regex;
pub use log::{
    self,
    warn,
    info,
    debug,
    error,
};

pub mod error;
pub use error::{DcmError, Location};

pub mod numeric_methods;

pub mod trajectory;
pub use trajectory::Trajectory;

// Convenient types
pub type Vector<T> = Array1<T>;  // Define this type to use broadcast operations.
pub type Matrix<T> = Array2<T>;
pub type MatX2<T> = Vec<[T;2]>;  // Nx2 matrix


/// Copies the contents of one file to another. Permission bits are preserved.
///
/// If `to` will be overwritten if it exists. If `to` is a directory, a file with same name of
/// `from` will be created and written inside it.
pub fn copy_file_to<P, Q>(from: P, to: Q) -> Result<u64>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let from = from.as_ref();
    anyhow::ensure!(from.is_file(), "Cannot copy {:?}: not a file.", from);

    if !to.as_ref().is_dir() {
        return Ok(fs::copy(from, to)?);
    }

    let fname = from.file_name()
        .with_context(|| format!("Cannot take file name of {:?}", from))?;
    let target = to.as_ref().join(fname);
    if target.canonicalize().ok() == from.canonicalize().ok() {
        return Ok(0);
    }
    Ok(fs::copy(from, target)?)
}

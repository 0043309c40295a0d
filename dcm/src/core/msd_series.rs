use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use itertools::izip;
use shared::{
    Result,
    Vector,
};


/// Mean squared displacement sampled on a time axis.
///
/// `time`, `average_msd` and `std_deviation` are index-aligned.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MsdSeries {
    pub time:          Vector<f64>,
    pub average_msd:   Vector<f64>,
    pub std_deviation: Vector<f64>,
}


impl MsdSeries {
    pub fn len(&self) -> usize { self.time.len() }
    pub fn is_empty(&self) -> bool { self.time.is_empty() }


    /// Write the series as three whitespace-separated columns.
    pub fn save_to_txt<P>(&self, fname: P) -> Result<()>
    where P: AsRef<Path> {
        let mut f = BufWriter::new(fs::File::create(fname)?);

        writeln!(f, "# {:>14} {:>16} {:>16}", "time", "msd", "std")?;
        for (t, m, s) in izip!(self.time.iter(), self.average_msd.iter(), self.std_deviation.iter()) {
            writeln!(f, "{:>16.8E} {:>16.8E} {:>16.8E}", t, m, s)?;
        }

        f.flush()?;
        Ok(())
    }
}

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use itertools::izip;
use shared::{
    ndarray::s,
    numeric_methods::mean,
    Result,
    Vector,
};
use sim_parsers::{OutputFile, Schema};

use crate::constants::EQUILIBRIUM_TAIL_START;


/// Pressure on the container walls and on the obstacle, frame by frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PressureSeries {
    pub time:     Vector<f64>,
    pub wall:     Vector<f64>,
    pub obstacle: Vector<f64>,
    /// `wall + obstacle`
    pub total:    Vector<f64>,
}


impl PressureSeries {
    pub fn len(&self) -> usize { self.time.len() }
    pub fn is_empty(&self) -> bool { self.time.is_empty() }

    pub fn save_to_txt<P>(&self, fname: P) -> Result<()>
    where P: AsRef<Path> {
        let mut f = BufWriter::new(fs::File::create(fname)?);

        writeln!(f, "# {:>14} {:>16} {:>16} {:>16}", "time", "wall", "obstacle", "total")?;
        for (t, w, o, p) in izip!(self.time.iter(), self.wall.iter(), self.obstacle.iter(), self.total.iter()) {
            writeln!(f, "{:>16.8E} {:>16.8E} {:>16.8E} {:>16.8E}", t, w, o, p)?;
        }

        f.flush()?;
        Ok(())
    }
}


pub fn pressure_series(output: &OutputFile) -> PressureSeries {
    let time     = output.headers.iter().map(|h| h.time).collect::<Vector<f64>>();
    let wall     = output.headers.iter().map(|h| h.wall_pressure).collect::<Vector<f64>>();
    let obstacle = output.headers.iter().map(|h| h.obstacle_pressure).collect::<Vector<f64>>();
    let total    = &wall + &obstacle;

    PressureSeries { time, wall, obstacle, total }
}


/// Mean total pressure over the last 10% of the frames, `None` without frames.
pub fn equilibrium_pressure(pressure: &PressureSeries) -> Option<f64> {
    let nframes = pressure.total.len();
    let istart = (EQUILIBRIUM_TAIL_START * nframes as f64).floor() as usize;
    pressure.total.slice(s![istart ..]).mean()
}


/// Collision counters recorded by the extended schema.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollisionSeries {
    pub time:                  Vec<f64>,
    pub first_time_collisions: Vec<u64>,
    pub total_collisions:      Vec<u64>,
}


impl CollisionSeries {
    pub fn len(&self) -> usize { self.time.len() }
    pub fn is_empty(&self) -> bool { self.time.is_empty() }

    pub fn save_to_txt<P>(&self, fname: P) -> Result<()>
    where P: AsRef<Path> {
        let mut f = BufWriter::new(fs::File::create(fname)?);

        writeln!(f, "# {:>14} {:>16} {:>16}", "time", "first_time", "total")?;
        for (t, first, total) in izip!(self.time.iter(), self.first_time_collisions.iter(), self.total_collisions.iter()) {
            writeln!(f, "{:>16.8E} {:>16} {:>16}", t, first, total)?;
        }

        f.flush()?;
        Ok(())
    }
}


/// `None` unless the dump carries the extended header.
pub fn collision_series(output: &OutputFile) -> Option<CollisionSeries> {
    if output.schema != Schema::Extended {
        return None;
    }

    let mut ret = CollisionSeries::default();
    for h in output.headers.iter() {
        ret.time.push(h.time);
        ret.first_time_collisions.push(h.first_time_collisions?);
        ret.total_collisions.push(h.total_collisions?);
    }
    Some(ret)
}


#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionSummary {
    /// Time of the last frame.
    pub total_time:            f64,
    pub first_time_collisions: u64,
    pub total_collisions:      u64,
    /// `total_collisions / total_time`, `None` if the last frame is at `t = 0`.
    pub collision_rate:        Option<f64>,
    /// Temperature averaged over all frames.
    pub mean_temperature:      f64,
}


/// Counters of the last frame and the temperature averaged over the run.
///
/// `None` for the basic schema or a dump without frames.
pub fn collision_summary(output: &OutputFile) -> Option<CollisionSummary> {
    if output.schema != Schema::Extended {
        return None;
    }
    let last = output.headers.last()?;

    let temperatures = output.headers.iter()
        .map(|h| h.temperature)
        .collect::<Option<Vec<f64>>>()?;

    let total_collisions = last.total_collisions?;
    let collision_rate = if last.time != 0.0 {
        Some(total_collisions as f64 / last.time)
    } else {
        None
    };

    Some(CollisionSummary {
        total_time: last.time,
        first_time_collisions: last.first_time_collisions?,
        total_collisions,
        collision_rate,
        mean_temperature: mean(&temperatures),
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use shared::Trajectory;
    use sim_parsers::FrameHeader;

    fn extended(n: usize) -> OutputFile {
        let headers = (0 .. n).map(|i| FrameHeader {
            time:                  i as f64 * 0.5,
            wall_pressure:         i as f64,
            obstacle_pressure:     1.0,
            temperature:           Some(if i % 2 == 0 { 290.0 } else { 310.0 }),
            first_time_collisions: Some(i as u64),
            total_collisions:      Some(3 * i as u64),
        }).collect::<Vec<_>>();

        OutputFile {
            nparticles: 1,
            schema: Schema::Extended,
            headers,
            trajectory: Trajectory::default(),
        }
    }

    #[test]
    fn test_pressure_series() {
        let p = pressure_series(&extended(4));
        assert_eq!(p.len(), 4);
        assert_eq!(p.time.to_vec(), vec![0.0, 0.5, 1.0, 1.5]);
        assert_eq!(p.total.to_vec(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_equilibrium_pressure() {
        // frames 18 and 19 of 20
        let p = pressure_series(&extended(20));
        assert_eq!(equilibrium_pressure(&p), Some(19.0 + 0.5));

        // floor(0.9 * 5) = 4, only the last frame
        let p = pressure_series(&extended(5));
        assert_eq!(equilibrium_pressure(&p), Some(5.0));

        let p = pressure_series(&extended(1));
        assert_eq!(equilibrium_pressure(&p), Some(1.0));

        assert_eq!(equilibrium_pressure(&PressureSeries::default()), None);
    }

    #[test]
    fn test_collision_summary() {
        let summary = collision_summary(&extended(5)).unwrap();
        assert_eq!(summary.total_time, 2.0);
        assert_eq!(summary.total_collisions, 12);
        assert_eq!(summary.first_time_collisions, 4);
        assert_eq!(summary.collision_rate, Some(6.0));
        assert_eq!(summary.mean_temperature, 298.0);

        // last frame at t = 0
        let summary = collision_summary(&extended(1)).unwrap();
        assert_eq!(summary.collision_rate, None);

        assert!(collision_summary(&extended(0)).is_none());

        let mut basic = extended(3);
        basic.schema = Schema::Basic;
        assert!(collision_summary(&basic).is_none());
        assert!(collision_series(&basic).is_none());
    }

    #[test]
    fn test_save_to_txt() {
        let dir = tempfile::tempdir().unwrap();
        let output = extended(3);

        let fname = dir.path().join("pressure.txt");
        pressure_series(&output).save_to_txt(&fname).unwrap();
        let txt = fs::read_to_string(&fname).unwrap();
        assert_eq!(txt.lines().count(), 4);
        let last = txt.lines().last().unwrap()
            .split_ascii_whitespace()
            .map(|s| s.parse::<f64>().unwrap())
            .collect::<Vec<_>>();
        assert_eq!(last, vec![1.0, 2.0, 1.0, 3.0]);

        let fname = dir.path().join("collisions.txt");
        let collisions = collision_series(&output).unwrap();
        assert_eq!(collisions.total_collisions, vec![0, 3, 6]);
        collisions.save_to_txt(&fname).unwrap();
        let txt = fs::read_to_string(&fname).unwrap();
        assert_eq!(txt.lines().nth(2).unwrap().split_ascii_whitespace().skip(1).collect::<Vec<_>>(),
                   vec!["1", "3"]);
    }
}

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use rayon::prelude::*;

use shared::{
    debug,
    DcmError,
    Trajectory,
};


/// Layout of the scalar header that precedes the particle block of each frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Schema {
    /// Detect from the first frame.
    Auto,
    /// `time`, `wall_pressure`, `obstacle_pressure`.
    Basic,
    /// `time`, `wall_pressure`, `obstacle_pressure`, `temperature`,
    /// `firstTimeCollisions`, `totalCollisions`.
    Extended,
}


impl Schema {
    /// Number of header lines per frame, `None` if not yet detected.
    pub fn nheaders(self) -> Option<usize> {
        match self {
            Schema::Auto     => None,
            Schema::Basic    => Some(3),
            Schema::Extended => Some(6),
        }
    }

    pub fn from_str(s: &str) -> shared::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto"     => Ok(Schema::Auto),
            "basic"    => Ok(Schema::Basic),
            "extended" => Ok(Schema::Extended),
            _ => shared::bail!("Invalid schema: {}, available schemas: auto, basic, extended", s),
        }
    }
}


impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", match self {
            Schema::Auto     => "auto",
            Schema::Basic    => "basic",
            Schema::Extended => "extended",
        })
    }
}


/// Scalars written once per frame before the particle block.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameHeader {
    pub time:                  f64,
    pub wall_pressure:         f64,
    pub obstacle_pressure:     f64,
    pub temperature:           Option<f64>,
    pub first_time_collisions: Option<u64>,
    pub total_collisions:      Option<u64>,
}


/// Parsed simulator dump: frame headers and the trajectory of the first
/// (tracked) particle.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputFile {
    pub nparticles: usize,
    /// Never `Schema::Auto`, detection is resolved while parsing.
    pub schema:     Schema,
    pub headers:    Vec<FrameHeader>,
    pub trajectory: Trajectory,
}


type Line<'a> = (usize, &'a str);   // (1-based line number, trimmed content)


impl OutputFile {
    pub fn from_file<P>(path: P, schema: Schema) -> Result<Self, DcmError>
    where P: AsRef<Path> {
        let path = path.as_ref();
        let name = path.display().to_string();

        let file = File::open(path)?;
        let ret = if path.extension().map_or(false, |ext| ext == "gz") {
            Self::from_reader(BufReader::new(GzDecoder::new(file)), schema)
        } else {
            Self::from_reader(BufReader::new(file), schema)
        };

        let ret = ret.map_err(|e| e.with_source_name(&name))?;
        debug!("Parsed {} frame(s) of {} particle(s) from {:?} with {} schema.",
               ret.headers.len(), ret.nparticles, path, ret.schema);
        Ok(ret)
    }


    pub fn from_reader<R>(mut reader: R, schema: Schema) -> Result<Self, DcmError>
    where R: BufRead {
        let mut txt = String::new();
        reader.read_to_string(&mut txt)?;
        Self::from_txt(&txt, schema)
    }


    pub fn from_txt(txt: &str, schema: Schema) -> Result<Self, DcmError> {
        let lines = txt.lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty())
            .collect::<Vec<Line>>();

        let (nline, ntoken) = *lines.first()
            .ok_or_else(|| DcmError::malformed(None, "input is empty, particle count is missing"))?;
        let nparticles = match ntoken.parse::<usize>() {
            Ok(n) if n > 0 => n,
            _ => return Err(DcmError::malformed(Some(nline),
                    format!("particle count must be a positive integer, found '{}'", ntoken))),
        };

        let frames = &lines[1..];
        let schema = match schema {
            Schema::Auto => Self::detect_schema(frames)?,
            s => s,
        };
        let nheaders = schema.nheaders().unwrap_or(3);
        let frame_len = nheaders + nparticles;

        let nframes = frames.len() / frame_len;
        let mut headers   = Vec::with_capacity(nframes);
        let mut times     = Vec::with_capacity(nframes);
        let mut positions = Vec::with_capacity(nframes);

        for frame in frames.chunks(frame_len) {
            if frame.len() < frame_len {
                return Err(DcmError::malformed(None, format!(
                    "file ends in the middle of a frame starting at line {}: {} line(s) left while {} expected",
                    frame[0].0, frame.len(), frame_len)));
            }

            let header = Self::parse_header(&frame[.. nheaders], schema)?;
            let pos = Self::parse_particle(frame[nheaders])?;
            // the remaining `nparticles - 1` lines are skipped

            times.push(header.time);
            positions.push(pos);
            headers.push(header);
        }

        Ok(Self {
            nparticles,
            schema,
            headers,
            trajectory: Trajectory { times, positions },
        })
    }


    /// Count the single-token lines leading the first frame.
    fn detect_schema(frames: &[Line]) -> Result<Schema, DcmError> {
        let nsingle = frames.iter()
            .take_while(|(_, l)| l.split_ascii_whitespace().count() == 1)
            .count();

        match nsingle {
            _ if frames.is_empty() => Ok(Schema::Basic),
            3 => Ok(Schema::Basic),
            6 => Ok(Schema::Extended),
            n => Err(DcmError::malformed(frames.get(n).map(|l| l.0).or(Some(frames[0].0)),
                    format!("cannot detect schema: first frame has {} scalar header line(s), \
                             expected 3 (basic) or 6 (extended)", n))),
        }
    }


    fn parse_header(lines: &[Line], schema: Schema) -> Result<FrameHeader, DcmError> {
        let mut header = FrameHeader {
            time:                  parse_scalar(lines[0])?,
            wall_pressure:         parse_scalar(lines[1])?,
            obstacle_pressure:     parse_scalar(lines[2])?,
            temperature:           None,
            first_time_collisions: None,
            total_collisions:      None,
        };

        if !header.time.is_finite() {
            return Err(DcmError::malformed(Some(lines[0].0), format!(
                "frame time must be a finite number, found '{}'", lines[0].1)));
        }

        if schema == Schema::Extended {
            header.temperature           = Some(parse_scalar(lines[3])?);
            header.first_time_collisions = Some(parse_scalar(lines[4])?);
            header.total_collisions      = Some(parse_scalar(lines[5])?);
        }

        Ok(header)
    }


    /// Parses `x y vx vy [radius] [mass]` and returns `[x, y]`.
    fn parse_particle((iline, line): Line) -> Result<[f64; 2], DcmError> {
        let fields = line.split_ascii_whitespace()
            .map(|s| s.parse::<f64>()
                 .map_err(|_| DcmError::malformed(Some(iline), format!("cannot parse '{}' as float", s))))
            .collect::<Result<Vec<f64>, DcmError>>()?;

        if !(4 ..= 6).contains(&fields.len()) {
            return Err(DcmError::malformed(Some(iline), format!(
                "particle line should contain 4 to 6 fields (x y vx vy [radius] [mass]), found {}",
                fields.len())));
        }

        Ok([fields[0], fields[1]])
    }
}


fn parse_scalar<T>((iline, line): Line) -> Result<T, DcmError>
where T: std::str::FromStr {
    line.parse::<T>()
        .map_err(|_| DcmError::malformed(Some(iline), format!(
            "cannot parse '{}' as {}", line, std::any::type_name::<T>())))
}


/// Read the tracked-particle trajectory from one dump, detecting the schema.
pub fn parse_trajectory<P>(path: P) -> Result<Trajectory, DcmError>
where P: AsRef<Path> {
    parse_trajectory_with(path, Schema::Auto)
}


pub fn parse_trajectory_with<P>(path: P, schema: Schema) -> Result<Trajectory, DcmError>
where P: AsRef<Path> {
    Ok(OutputFile::from_file(path, schema)?.trajectory)
}


/// Read one trajectory per file; the result keeps the order of `paths`.
///
/// Files are parsed in parallel. On failure the error of the first bad file
/// (in input order) is returned.
pub fn parse_trajectories<P>(paths: &[P]) -> Result<Vec<Trajectory>, DcmError>
where P: AsRef<Path> + Sync {
    parse_trajectories_with(paths, Schema::Auto)
}


pub fn parse_trajectories_with<P>(paths: &[P], schema: Schema) -> Result<Vec<Trajectory>, DcmError>
where P: AsRef<Path> + Sync {
    paths.par_iter()
        .map(|p| parse_trajectory_with(p, schema))
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::fs;

    const BASIC: &str = "
        3
        0.000e+00
        1.500e+01
        2.000e+00
        0.500 0.500 0.000 0.000
        0.100 0.200 1.000 -1.000
        0.300 0.400 -1.000 1.000

        1.000e-02
        1.600e+01
        2.500e+00
        0.510 0.505 1.000 0.500
        0.110 0.190 1.000 -1.000
        0.290 0.410 -1.000 1.000
        ";

    const EXTENDED: &str = "
        2
        0.0
        10.0
        1.0
        300.0
        0
        0
        0.05 0.05 0.0 0.0 0.005 3.0
        0.02 0.03 1.0 1.0 0.001 1.0
        0.5
        12.0
        2.0
        301.5
        4
        9
        0.06 0.04 0.0 0.0 0.005 3.0
        0.03 0.02 1.0 1.0 0.001 1.0
        ";

    #[test]
    fn test_basic() {
        let out = OutputFile::from_txt(BASIC, Schema::Basic).unwrap();
        assert_eq!(out.nparticles, 3);
        assert_eq!(out.schema, Schema::Basic);
        assert_eq!(out.headers.len(), 2);
        assert_eq!(out.headers[1].wall_pressure, 16.0);
        assert_eq!(out.headers[1].obstacle_pressure, 2.5);
        assert_eq!(out.headers[1].temperature, None);
        assert_eq!(out.trajectory.times, vec![0.0, 0.01]);
        assert_eq!(out.trajectory.positions, vec![[0.5, 0.5], [0.51, 0.505]]);
    }

    #[test]
    fn test_extended() {
        let out = OutputFile::from_txt(EXTENDED, Schema::Extended).unwrap();
        assert_eq!(out.headers.len(), 2);
        assert_eq!(out.headers[1].temperature, Some(301.5));
        assert_eq!(out.headers[1].first_time_collisions, Some(4));
        assert_eq!(out.headers[1].total_collisions, Some(9));
        assert_eq!(out.trajectory.positions, vec![[0.05, 0.05], [0.06, 0.04]]);
    }

    #[test]
    fn test_detect_schema() {
        assert_eq!(OutputFile::from_txt(BASIC, Schema::Auto).unwrap().schema, Schema::Basic);
        assert_eq!(OutputFile::from_txt(EXTENDED, Schema::Auto).unwrap().schema, Schema::Extended);

        let out = OutputFile::from_txt("  5\n\n", Schema::Auto).unwrap();
        assert!(out.trajectory.is_empty());

        let err = OutputFile::from_txt("1\n0.0\n1.0\n0.1 0.1 0.0 0.0\n", Schema::Auto).unwrap_err();
        assert!(matches!(err, DcmError::MalformedTrajectory { .. }));
    }

    #[test]
    fn test_wrong_schema_fails() {
        // extended file read as basic: 'temperature' line is taken as a particle line
        assert!(OutputFile::from_txt(EXTENDED, Schema::Basic).is_err());
    }

    #[test]
    fn test_malformed() {
        let check = |txt: &str, line: Option<usize>| {
            match OutputFile::from_txt(txt, Schema::Basic) {
                Err(DcmError::MalformedTrajectory { location, .. }) => assert_eq!(location.line, line, "{}", txt),
                other => panic!("expected MalformedTrajectory for {:?}, got {:?}", txt, other),
            }
        };

        check("", None);
        check("\n   \n", None);
        check("0\n", Some(1));
        check("-3\n", Some(1));
        check("two\n", Some(1));
        check("1\n0.0\n1.0\nabc\n0.1 0.1 0.0 0.0\n", Some(4));
        check("1\n0.0\n1.0\n2.0\n0.1 oops 0.0 0.0\n", Some(5));
        check("1\n0.0\n1.0\n2.0\n0.1 0.1 0.0\n", Some(5));
        check("1\n0.0\n1.0\n2.0\n0.1 0.1 0.0 0.0 1 2 3\n", Some(5));
        // truncated second frame
        check("1\n0.0\n1.0\n2.0\n0.1 0.1 0.0 0.0\n0.1\n1.0\n", None);
        // non-finite frame times
        check("1\nnan\n1.0\n2.0\n0.1 0.1 0.0 0.0\n", Some(2));
        check("1\n0.0\n1.0\n2.0\n0.1 0.1 0.0 0.0\ninf\n1.0\n2.0\n0.2 0.2 0.0 0.0\n", Some(6));
        // integer field
        assert!(OutputFile::from_txt(&EXTENDED.replace("\n        9\n", "\n        9.5\n"), Schema::Extended).is_err());
    }

    #[test]
    fn test_skip_remaining_particles_unparsed() {
        let txt = "2\n0.0\n1.0\n2.0\n0.1 0.2 0.0 0.0\nnot a particle line\n";
        let out = OutputFile::from_txt(txt, Schema::Basic).unwrap();
        assert_eq!(out.trajectory.positions, vec![[0.1, 0.2]]);
    }

    #[test]
    fn test_from_file_and_determinism() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output-3.txt");
        fs::write(&path, BASIC).unwrap();

        let t1 = parse_trajectory(&path).unwrap();
        let t2 = parse_trajectory(&path).unwrap();
        assert_eq!(t1.times.iter().map(|t| t.to_bits()).collect::<Vec<_>>(),
                   t2.times.iter().map(|t| t.to_bits()).collect::<Vec<_>>());
        assert_eq!(t1, t2);

        let gz_path = dir.path().join("output-3.txt.gz");
        let mut enc = flate2::write::GzEncoder::new(fs::File::create(&gz_path).unwrap(), flate2::Compression::default());
        enc.write_all(BASIC.as_bytes()).unwrap();
        enc.finish().unwrap();
        assert_eq!(parse_trajectory(&gz_path).unwrap(), t1);

        let bad = dir.path().join("bad.txt");
        fs::write(&bad, "1\n0.0\n").unwrap();
        let msg = parse_trajectory(&bad).unwrap_err().to_string();
        assert!(msg.contains("bad.txt"), "{}", msg);

        assert!(matches!(parse_trajectory(dir.path().join("missing.txt")), Err(DcmError::Io(_))));
    }

    #[test]
    fn test_parse_trajectories() {
        let dir = tempfile::tempdir().unwrap();
        let paths = (0 .. 4).map(|i| {
            let p = dir.path().join(format!("run{}.txt", i));
            let txt = format!("1\n0.0\n1.0\n2.0\n{} 0.0 0.0 0.0\n", i);
            fs::write(&p, txt).unwrap();
            p
        }).collect::<Vec<_>>();

        let trajs = parse_trajectories(&paths).unwrap();
        assert_eq!(trajs.len(), 4);
        for (i, t) in trajs.iter().enumerate() {
            assert_eq!(t.positions, vec![[i as f64, 0.0]]);
        }

        fs::write(&paths[1], "x\n").unwrap();
        fs::write(&paths[3], "1\n").unwrap();
        fs::write(&paths[2], "1\n0.0\n").unwrap();
        let msg = parse_trajectories(&paths).unwrap_err().to_string();
        assert!(msg.contains("run1.txt"), "{}", msg);
    }

    #[test]
    fn test_schema_from_str() {
        assert_eq!(Schema::from_str("Extended").unwrap(), Schema::Extended);
        assert_eq!(Schema::from_str(" auto ").unwrap(), Schema::Auto);
        assert!(Schema::from_str("full").is_err());
    }
}

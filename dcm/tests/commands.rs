use std::fs;
use std::path::Path;

use clap::Parser;
use dcm::OptProcess;
use dcm::single::SingleCommand;
use dcm::ensemble::EnsembleCommand;
use dcm::observables::ObservablesCommand;


fn write_extended_dump(path: &Path, velocity: [f64; 2], nframes: usize) {
    let mut txt = String::from("1\n");
    for i in 0 .. nframes {
        let t = i as f64 * 0.125;
        txt += &format!("{:.3e}\n{:.3e}\n{:.3e}\n{:.3e}\n{}\n{}\n", t, 2.0, 1.0, 300.0, i / 2, i);
        txt += &format!("{:e} {:e} {:e} {:e} {:e}\n", velocity[0] * t, velocity[1] * t, velocity[0], velocity[1], 5.0E-3);
    }
    fs::write(path, txt).unwrap();
}


fn read_table(path: &Path) -> Vec<Vec<f64>> {
    fs::read_to_string(path).unwrap()
        .lines()
        .filter(|l| !l.starts_with('#'))
        .map(|l| l.split_ascii_whitespace().map(|s| s.parse::<f64>().unwrap()).collect())
        .collect()
}


#[test]
fn test_single_command() {
    let dir = tempfile::tempdir().unwrap();
    let traj = dir.path().join("output.txt");
    write_extended_dump(&traj, [1.0, 0.0], 41);

    let outdir = dir.path().join("single");
    let cfg = dir.path().join("single_config.toml");
    fs::write(&cfg, format!(
        "trajectory = {:?}\nstart_time = 0.5\ninterval = 0.25\noutdir = {:?}\n", traj, outdir)).unwrap();

    let cmd = SingleCommand::try_parse_from(["single", "-c", cfg.to_str().unwrap()]).unwrap();
    cmd.process().unwrap();

    let table = read_table(&outdir.join("single_msd.txt"));
    // windows start at 0.5, 0.75, ... while the window end stays within t = 5.0
    assert_eq!(table.len(), 18);
    assert!(table.iter().all(|row| row.len() == 3 && row[1] == 0.03125));
    assert!(outdir.join("single_config.toml").is_file());
    assert!(outdir.join("run.log").is_file());
}


#[test]
fn test_ensemble_command() {
    let dir = tempfile::tempdir().unwrap();
    let rundir = dir.path().join("runs");
    fs::create_dir(&rundir).unwrap();
    write_extended_dump(&rundir.join("output_0.txt"), [1.0, 0.0], 17);
    write_extended_dump(&rundir.join("output_1.txt"), [0.0, 1.0], 17);
    fs::write(rundir.join("README"), "not a dump\n").unwrap();

    let outdir = dir.path().join("ensemble");
    let cfg = dir.path().join("ensemble_config.toml");
    fs::write(&cfg, format!(
        "rundir = {:?}\npattern = '^output_\\d+\\.txt$'\nnum_points = 17\noutdir = {:?}\n", rundir, outdir)).unwrap();

    let cmd = EnsembleCommand::try_parse_from(["ensemble", "-n", "2", "-c", cfg.to_str().unwrap()]).unwrap();
    cmd.process().unwrap();

    let table = read_table(&outdir.join("ensemble_msd.txt"));
    assert_eq!(table.len(), 17);
    for row in table.iter() {
        // both runs move ballistically with unit speed
        assert_eq!(row[1], row[0] * row[0]);
        assert_eq!(row[2], 0.0);
    }
}


#[test]
fn test_observables_command() {
    let dir = tempfile::tempdir().unwrap();
    let traj = dir.path().join("output.txt");
    write_extended_dump(&traj, [1.0, 0.0], 9);

    let outdir = dir.path().join("observables");
    let cfg = dir.path().join("observables_config.toml");
    fs::write(&cfg, format!("trajectory = {:?}\noutdir = {:?}\n", traj, outdir)).unwrap();

    let cmd = ObservablesCommand::try_parse_from(["observables", "--config", cfg.to_str().unwrap()]).unwrap();
    cmd.process().unwrap();

    let pressure = read_table(&outdir.join("pressure.txt"));
    assert_eq!(pressure.len(), 9);
    assert!(pressure.iter().all(|row| row[3] == 3.0));

    let collisions = read_table(&outdir.join("collisions.txt"));
    assert_eq!(collisions.last().unwrap(), &vec![1.0, 4.0, 8.0]);
}


#[test]
fn test_invalid_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("single_config.toml");
    fs::write(&cfg, "trajectory = \"no_such_file.txt\"\ninterval = -1.0\n").unwrap();

    let cmd = SingleCommand::try_parse_from(["single", "-c", cfg.to_str().unwrap()]).unwrap();
    let err = cmd.process().unwrap_err();
    assert_eq!(err.chain().count(), 2);
}

use std::{fs, path::Path};

use approx::assert_relative_eq;
use clap::Parser;
use huginn::{
    Error,
    cli::locate::Locate,
    config::HuginnConfig,
    report::{Outcome, Report},
};
use nalgebra::Point2;
use tempfile::tempdir;

const CITY_BLOCK: &str = "\
0;0;10
0;10;10
10;0;10
10;10;10
500;500;20
3;3;0
";

fn evaluate(data: &Path, flags: &[&str]) -> huginn::Result<Report> {
    let mut args = vec!["locate", data.to_str().unwrap()];
    args.extend_from_slice(flags);

    Locate::try_parse_from(args)
        .unwrap()
        .evaluate(&HuginnConfig::default())
}

fn location(outcome: &Outcome) -> Point2<f64> {
    match outcome {
        Outcome::Reference(location) | Outcome::Estimate { location, .. } => *location,
        Outcome::Failed(reason) => panic!("expected a location, estimation failed: {reason}"),
    }
}

#[test]
fn compares_every_method() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("recording.csv");
    fs::write(&data, CITY_BLOCK).unwrap();

    let report = evaluate(
        &data,
        &[
            "--seed",
            "5",
            "--iterations",
            "20",
            "--inlier-threshold",
            "0.5",
            "--actual",
            "5,5",
        ],
    )
    .unwrap();

    let methods: Vec<&str> = report.rows().iter().map(|row| row.method.as_str()).collect();
    assert_eq!(
        methods,
        [
            "Actual location",
            "Nonlinear least squares (unweighted)",
            "Nonlinear least squares (weighted)",
            "RANSAC (unweighted)",
            "RANSAC (weighted, 4/5 points)",
        ]
    );

    // the outlier pulls both plain fits away from the block
    assert_relative_eq!(
        location(&report.rows()[1].outcome),
        Point2::new(104.0, 104.0),
        epsilon = 1e-5
    );
    let weighted = location(&report.rows()[2].outcome);
    assert!(report.error(&weighted).unwrap() > 5.0);

    // unweighted residuals are plain distances, no corner is within the threshold
    assert!(matches!(report.rows()[3].outcome, Outcome::Failed(_)));

    let robust = location(&report.rows()[4].outcome);
    assert_relative_eq!(robust, Point2::new(5.0, 5.0), epsilon = 1e-6);
    assert!(report.error(&robust).unwrap() < 1e-6);
}

#[test]
fn config_location_is_the_fallback() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("recording.csv");
    fs::write(&data, CITY_BLOCK).unwrap();

    let mut config = HuginnConfig::default();
    config.report.actual_location = Some(Point2::new(1.0, 2.0));
    config.ransac.seed = Some(5);

    let report = Locate::try_parse_from(["locate", data.to_str().unwrap()])
        .unwrap()
        .evaluate(&config)
        .unwrap();

    assert_eq!(
        report.rows()[0].outcome,
        Outcome::Reference(Point2::new(1.0, 2.0))
    );
}

#[test]
fn invalid_solver_config_is_an_error() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("recording.csv");
    fs::write(&data, CITY_BLOCK).unwrap();

    let mut config = HuginnConfig::default();
    config.solver.patience = 0;

    let result = Locate::try_parse_from(["locate", data.to_str().unwrap()])
        .unwrap()
        .evaluate(&config);

    assert!(matches!(
        result,
        Err(Error::Estimation(vegvisir::Error::InvalidConfig(_)))
    ));
}

#[test]
fn recording_errors_are_reported() {
    let dir = tempdir().unwrap();

    let missing = dir.path().join("missing.csv");
    assert!(matches!(evaluate(&missing, &[]), Err(Error::Io(_))));

    let empty = dir.path().join("empty.csv");
    fs::write(&empty, "1;2;0\n").unwrap();
    assert!(matches!(
        evaluate(&empty, &[]),
        Err(Error::NoSamples { .. })
    ));

    let malformed = dir.path().join("malformed.csv");
    fs::write(&malformed, "1;2;3\n1;2\n").unwrap();
    assert!(matches!(
        evaluate(&malformed, &[]),
        Err(Error::MalformedRecord { line: 2, .. })
    ));
}

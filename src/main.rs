//! Phasesync - phase synchronization verification tool
//!
//! Entry point for the command-line verifier.

use anyhow::{bail, Context, Result};
use phasesync::config::AppConfig;
use phasesync::estimate::estimator::{EstimatorConfig, PhaseEstimator};
use phasesync::estimate::fft::BinSelection;
use phasesync::report::{PlotData, Report};
use phasesync::signal::generator::synthetic_pair;
use phasesync::signal::loader::load_pair;
use phasesync::signal::SignalPair;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

/// Frequency of the synthetic test tone in Hz
const SYNTHETIC_FREQUENCY: f64 = 1024.0;

/// Periods covered by a synthetic record
const SYNTHETIC_PERIODS: f64 = 3.0;

/// Default synthetic sample count per Hz of tone frequency
const SYNTHETIC_SAMPLES_PER_HZ: usize = 5;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("phasesync=info".parse()?)
                .add_directive("phasesync_core=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match parse_args(&args)? {
        Command::Help => print_help(),
        Command::Version => {
            println!("phasesync {} ({})", phasesync::VERSION, phasesync::BUILD_DATE)
        }
        Command::Run(options) => run(options)?,
    }
    Ok(())
}

/// Parsed command-line options; `None` keeps the config file value
#[derive(Debug, Default, PartialEq)]
struct Options {
    config: Option<PathBuf>,
    directory: Option<PathBuf>,
    file1: Option<String>,
    file2: Option<String>,
    column: Option<usize>,
    samples: Option<usize>,
    sample_rate: Option<f64>,
    frequency: Option<f64>,
    signed: Option<bool>,
    strict_bin: bool,
    synthetic: Option<f64>,
    plot_data: Option<PathBuf>,
    json: bool,
    save_config: bool,
}

#[derive(Debug, PartialEq)]
enum Command {
    Help,
    Version,
    Run(Options),
}

fn parse_args(args: &[String]) -> Result<Command> {
    let mut options = Options::default();
    let mut i = 0;

    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--help" | "-h" => return Ok(Command::Help),
            "--version" | "-v" => return Ok(Command::Version),
            "--config" | "-c" => options.config = Some(value(args, i, flag)?),
            "--dir" | "-d" => options.directory = Some(value(args, i, flag)?),
            "--file1" => options.file1 = Some(value(args, i, flag)?),
            "--file2" => options.file2 = Some(value(args, i, flag)?),
            "--column" => options.column = Some(value(args, i, flag)?),
            "--samples" | "-n" => options.samples = Some(value(args, i, flag)?),
            "--sample-rate" | "-r" => options.sample_rate = Some(value(args, i, flag)?),
            "--frequency" | "-f" => options.frequency = Some(value(args, i, flag)?),
            "--synthetic" => options.synthetic = Some(value(args, i, flag)?),
            "--plot-data" => options.plot_data = Some(value(args, i, flag)?),
            "--signed" => options.signed = Some(true),
            "--unsigned" => options.signed = Some(false),
            "--strict-bin" => options.strict_bin = true,
            "--json" => options.json = true,
            "--save-config" => options.save_config = true,
            _ => bail!("Unknown argument: {} (see --help)", flag),
        }
        i += if takes_value(flag) { 2 } else { 1 };
    }

    Ok(Command::Run(options))
}

fn takes_value(flag: &str) -> bool {
    !matches!(
        flag,
        "--signed" | "--unsigned" | "--strict-bin" | "--json" | "--save-config"
    )
}

/// Parse the value following the flag at `i`
fn value<T: FromStr>(args: &[String], i: usize, flag: &str) -> Result<T> {
    let raw = args
        .get(i + 1)
        .with_context(|| format!("{} requires a value", flag))?;
    raw.parse()
        .map_err(|_| anyhow::anyhow!("Invalid value for {}: {}", flag, raw))
}

fn print_help() {
    println!("Usage: phasesync [OPTIONS]");
    println!();
    println!("Compares the same waveform recorded by two acquisition units and");
    println!("reports their phase difference with three independent methods.");
    println!();
    println!("Options:");
    println!("  -c, --config FILE       Config file (default: ./phasesync.json)");
    println!("  -d, --dir DIR           Directory holding both recordings");
    println!("      --file1 NAME        Recording of the first unit");
    println!("      --file2 NAME        Recording of the second unit");
    println!("      --column N          Zero-based channel column");
    println!("  -n, --samples N         Samples to read (synthetic: samples generated)");
    println!("  -r, --sample-rate HZ    Sample rate of the recordings");
    println!("  -f, --frequency HZ      Signal frequency, enables the cross-correlation phase");
    println!("      --signed            Keep the sign of the Hilbert estimate");
    println!("      --unsigned          Report the Hilbert estimate as a magnitude");
    println!("      --strict-bin        Fail when the dominant FFT bin is ambiguous");
    println!("      --synthetic DEG     Run on a generated sine pair shifted by DEG degrees");
    println!("      --plot-data FILE    Write plot series as JSON");
    println!("      --json              Print the report as JSON");
    println!("      --save-config       Store the effective settings in the config file");
    println!("  -v, --version           Show version");
    println!("  -h, --help              Show this help");
    println!();
    println!("Examples:");
    println!("  phasesync -d ./recordings --file1 master.csv --file2 slave.csv -f 1000");
    println!("  phasesync --synthetic 25");
}

/// Merge command-line overrides into the stored configuration
fn apply_overrides(config: &mut AppConfig, options: &Options) {
    let loader = &mut config.loader;
    if let Some(dir) = &options.directory {
        loader.directory = dir.clone();
    }
    if let Some(name) = &options.file1 {
        loader.file1 = name.clone();
    }
    if let Some(name) = &options.file2 {
        loader.file2 = name.clone();
    }
    if let Some(column) = options.column {
        loader.column = column;
    }
    if let Some(samples) = options.samples {
        loader.samples = samples;
    }
    if let Some(rate) = options.sample_rate {
        loader.sample_rate = rate;
    }

    let estimator = &mut config.estimator;
    if let Some(frequency) = options.frequency {
        estimator.period = Some(1.0 / frequency);
    }
    if let Some(signed) = options.signed {
        estimator.discard_sign = !signed;
    }
    if options.strict_bin {
        estimator.bin_selection = BinSelection::Strict;
    }
}

fn run(options: Options) -> Result<()> {
    let config_path = options.config.clone().unwrap_or_else(AppConfig::path);
    let mut config = AppConfig::load(&config_path);
    apply_overrides(&mut config, &options);

    if options.save_config {
        config.save(&config_path)?;
    }

    let (pair, estimator_config) = match options.synthetic {
        Some(degrees) => synthetic_run(degrees, &options, &config.estimator)?,
        None => {
            let pair = load_pair(&config.loader).context("Cannot load recordings")?;
            (pair, config.estimator.clone())
        }
    };

    let estimator = PhaseEstimator::new(pair.sample_rate, estimator_config.clone());
    let estimation = estimator
        .run(&pair.signal1, &pair.signal2)
        .context("Phase estimation failed")?;
    let report = Report::new(
        estimation.results.clone(),
        pair.len(),
        pair.sample_rate,
        &estimator_config,
    );

    if let Some(path) = &options.plot_data {
        let plot = PlotData::build(&pair, &estimation)?;
        std::fs::write(path, plot.to_json()?)
            .with_context(|| format!("writing plot data to {}", path.display()))?;
        info!(path = %path.display(), "Plot data written");
    }

    if options.json {
        println!("{}", report.to_json()?);
    } else {
        for line in report.summary_lines() {
            println!("{}", line);
        }
    }

    Ok(())
}

/// Build the synthetic pair and the signed, 4-digit estimator settings
/// used for self-tests
fn synthetic_run(
    degrees: f64,
    options: &Options,
    base: &EstimatorConfig,
) -> Result<(SignalPair, EstimatorConfig)> {
    if !degrees.is_finite() {
        bail!("Invalid phase shift: {} degrees", degrees);
    }
    let frequency = options.frequency.unwrap_or(SYNTHETIC_FREQUENCY);
    if !frequency.is_finite() || frequency <= 0.0 {
        bail!("Frequency must be finite and positive, got {} Hz", frequency);
    }
    let samples = match options.samples {
        Some(samples) => samples,
        None => (frequency.round() as usize)
            .checked_mul(SYNTHETIC_SAMPLES_PER_HZ)
            .with_context(|| format!("Frequency {} Hz is too large", frequency))?,
    };
    if samples < 2 {
        bail!("Synthetic runs need at least 2 samples, got {}", samples);
    }
    let t_stop = SYNTHETIC_PERIODS / frequency;

    let pair = synthetic_pair(frequency, degrees.to_radians(), samples, t_stop);
    let config = EstimatorConfig {
        discard_sign: options.signed == Some(false),
        period: pair.period,
        precision: phasesync::TEST_PRECISION,
        ..base.clone()
    };

    let inserted = phasesync::PhaseEstimate::from_degrees(degrees);
    let (deg, rad) = inserted.rounded(config.precision);
    println!("Inserted phase shift: {} Deg    ( {} Rad)", deg, rad);
    println!();

    Ok((pair, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_help_and_version() {
        assert_eq!(parse_args(&args(&["-h"])).unwrap(), Command::Help);
        assert_eq!(parse_args(&args(&["--version"])).unwrap(), Command::Version);
    }

    #[test]
    fn test_parse_run_options() {
        let command = parse_args(&args(&[
            "-d",
            "/data",
            "--file1",
            "a.csv",
            "--column",
            "2",
            "-f",
            "1000",
            "--signed",
            "--json",
        ]))
        .unwrap();

        let Command::Run(options) = command else {
            panic!("expected run command");
        };
        assert_eq!(options.directory, Some(PathBuf::from("/data")));
        assert_eq!(options.file1.as_deref(), Some("a.csv"));
        assert_eq!(options.column, Some(2));
        assert_eq!(options.frequency, Some(1000.0));
        assert_eq!(options.signed, Some(true));
        assert!(options.json);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(&args(&["--bogus"])).is_err());
        assert!(parse_args(&args(&["--column"])).is_err());
        assert!(parse_args(&args(&["--column", "x"])).is_err());
    }

    #[test]
    fn test_overrides_apply() {
        let mut config = AppConfig::default();
        let options = Options {
            samples: Some(1024),
            frequency: Some(500.0),
            signed: Some(true),
            strict_bin: true,
            ..Default::default()
        };
        apply_overrides(&mut config, &options);

        assert_eq!(config.loader.samples, 1024);
        assert_eq!(config.estimator.period, Some(0.002));
        assert!(!config.estimator.discard_sign);
        assert_eq!(config.estimator.bin_selection, BinSelection::Strict);
    }

    #[test]
    fn test_synthetic_run_is_signed_by_default() {
        let options = Options {
            synthetic: Some(25.0),
            ..Default::default()
        };
        let (pair, config) =
            synthetic_run(25.0, &options, &AppConfig::default().estimator).unwrap();

        assert_eq!(pair.len(), 5120);
        assert!(!config.discard_sign);
        assert_eq!(config.precision, 4);
        assert_eq!(config.period, Some(1.0 / 1024.0));
    }

    #[test]
    fn test_synthetic_run_rejects_bad_frequency() {
        let base = AppConfig::default().estimator;
        for frequency in [0.0, -100.0, f64::NAN, f64::INFINITY] {
            let options = Options {
                frequency: Some(frequency),
                ..Default::default()
            };
            let err = synthetic_run(25.0, &options, &base).unwrap_err();
            assert!(
                err.to_string().contains("Frequency"),
                "unexpected error for {} Hz: {}",
                frequency,
                err
            );
        }
    }

    #[test]
    fn test_synthetic_run_rejects_short_records() {
        let base = AppConfig::default().estimator;
        for samples in [0, 1] {
            let options = Options {
                samples: Some(samples),
                ..Default::default()
            };
            assert!(synthetic_run(25.0, &options, &base).is_err());
        }

        // Rounds to zero samples
        let options = Options {
            frequency: Some(0.1),
            ..Default::default()
        };
        assert!(synthetic_run(25.0, &options, &base).is_err());
    }

    #[test]
    fn test_synthetic_run_rejects_oversized_default() {
        let options = Options {
            frequency: Some(1e300),
            ..Default::default()
        };
        let err = synthetic_run(25.0, &options, &AppConfig::default().estimator).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn test_parse_then_synthetic_reports_error() {
        let command = parse_args(&args(&["--synthetic", "25", "-f", "0"])).unwrap();
        let Command::Run(options) = command else {
            panic!("expected run command");
        };
        assert!(synthetic_run(25.0, &options, &AppConfig::default().estimator).is_err());
    }
}

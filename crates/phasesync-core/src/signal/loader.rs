//! Fixed-point CSV channel loading
//!
//! Acquisition units dump one CSV file per unit: a few header rows followed
//! by one line per sample, each channel's raw 24-bit integer in its own
//! comma-separated (and space-padded) column. Raw values are divided by
//! the fixed-point full scale to obtain normalized floats. Blank lines and
//! `#` comments after the header are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::SignalPair;

/// Raw value of a full-scale 24-bit sample (2^23)
pub const DEFAULT_FULL_SCALE: f64 = 8_388_608.0;

/// Sample rate of the acquisition recordings in Hz
pub const DEFAULT_SAMPLE_RATE: f64 = 65_536.0;

/// Errors raised while locating or reading channel files
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Invalid path: {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("File not found: '{}'", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: column {column} is missing", .path.display())]
    MissingColumn {
        path: PathBuf,
        line: usize,
        column: usize,
    },

    #[error("{}:{line}: column {column} is not an integer: '{value}'", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        value: String,
    },

    #[error("{}: expected {expected} samples, found {found}", .path.display())]
    TooFewSamples {
        path: PathBuf,
        expected: usize,
        found: usize,
    },
}

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_file1() -> String {
    "master.csv".to_string()
}

fn default_file2() -> String {
    "slave.csv".to_string()
}

fn default_samples() -> usize {
    4096
}

fn default_header_rows() -> usize {
    3
}

fn default_full_scale() -> f64 {
    DEFAULT_FULL_SCALE
}

fn default_sample_rate() -> f64 {
    DEFAULT_SAMPLE_RATE
}

/// Where and how to read the two channel files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Directory holding both files
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
    /// File name of the first unit's recording
    #[serde(default = "default_file1")]
    pub file1: String,
    /// File name of the second unit's recording
    #[serde(default = "default_file2")]
    pub file2: String,
    /// Zero-based column holding the channel to compare
    #[serde(default)]
    pub column: usize,
    /// Number of samples to read from each file
    #[serde(default = "default_samples")]
    pub samples: usize,
    /// Leading rows to skip before the sample data
    #[serde(default = "default_header_rows")]
    pub header_rows: usize,
    /// Raw integer value corresponding to 1.0
    #[serde(default = "default_full_scale")]
    pub full_scale: f64,
    /// Sample rate of the recordings in Hz
    #[serde(default = "default_sample_rate")]
    pub sample_rate: f64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            file1: default_file1(),
            file2: default_file2(),
            column: 0,
            samples: default_samples(),
            header_rows: default_header_rows(),
            full_scale: default_full_scale(),
            sample_rate: default_sample_rate(),
        }
    }
}

impl LoaderConfig {
    pub fn path1(&self) -> PathBuf {
        self.directory.join(&self.file1)
    }

    pub fn path2(&self) -> PathBuf {
        self.directory.join(&self.file2)
    }
}

/// Check that the directory and both files exist
///
/// Checks run in order (directory, file 1, file 2) and stop at the first
/// failure.
pub fn validate_paths(config: &LoaderConfig) -> Result<(PathBuf, PathBuf), LoadError> {
    if !config.directory.is_dir() {
        return Err(LoadError::InvalidPath(config.directory.clone()));
    }

    let path1 = config.path1();
    if !path1.is_file() {
        return Err(LoadError::FileNotFound(PathBuf::from(&config.file1)));
    }

    let path2 = config.path2();
    if !path2.is_file() {
        return Err(LoadError::FileNotFound(PathBuf::from(&config.file2)));
    }

    Ok((path1, path2))
}

/// Read one channel from a CSV file and normalize it
pub fn load_channel(path: &Path, config: &LoaderConfig) -> Result<Vec<f64>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let mut samples = Vec::with_capacity(config.samples);
    for (index, line) in reader.lines().enumerate().skip(config.header_rows) {
        if samples.len() == config.samples {
            break;
        }
        let line = line.map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let line_number = index + 1;

        // Blank lines and `#` comments carry no sample
        let data = line.split('#').next().unwrap_or_default();
        if data.trim().is_empty() {
            continue;
        }

        let field = data
            .split(',')
            .nth(config.column)
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .ok_or_else(|| LoadError::MissingColumn {
                path: path.to_path_buf(),
                line: line_number,
                column: config.column,
            })?;

        let raw: i64 = field.parse().map_err(|_| LoadError::Parse {
            path: path.to_path_buf(),
            line: line_number,
            column: config.column,
            value: field.to_string(),
        })?;

        samples.push(raw as f64 / config.full_scale);
    }

    if samples.len() < config.samples {
        return Err(LoadError::TooFewSamples {
            path: path.to_path_buf(),
            expected: config.samples,
            found: samples.len(),
        });
    }

    tracing::info!(
        path = %path.display(),
        samples = samples.len(),
        column = config.column,
        "Loaded channel from recording"
    );

    Ok(samples)
}

/// Validate the paths and load both channels
pub fn load_pair(config: &LoaderConfig) -> Result<SignalPair, LoadError> {
    let (path1, path2) = validate_paths(config)?;
    let signal1 = load_channel(&path1, config)?;
    let signal2 = load_channel(&path2, config)?;

    Ok(SignalPair {
        signal1,
        signal2,
        sample_rate: config.sample_rate,
        period: None,
    })
}

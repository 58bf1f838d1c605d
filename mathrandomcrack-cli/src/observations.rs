//! Reads a leaked-values file into the shape the chosen recovery method
//! expects.
//!
//! Mirrors the input format of the tool this crate is modeled on: one
//! observation per line, `#`-prefixed lines are comments, and a blank line
//! marks a call position whose output was not observed (it still advances
//! the position counter, it just contributes no [`mathrandomcrack::KnownBits`]).

use std::fs;
use std::path::Path;

use clap::ValueEnum;

use crate::error::CliError;

/// Which shape of leaked value the input file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Method {
    /// One exact `Math.random()` output per line.
    Doubles,
    /// One `floor(r * factor + translation)` integer per line.
    Scaled,
    /// One space-separated `lo hi` bound pair per line.
    Bounds,
}

/// Parsed leaked values, still tagged by the method that produced them.
#[derive(Debug, Clone)]
pub enum Observations {
    /// See [`Method::Doubles`].
    Doubles(Vec<f64>),
    /// See [`Method::Scaled`].
    Scaled(Vec<u64>),
    /// See [`Method::Bounds`].
    Bounds(Vec<(f64, f64)>),
}

/// Reads `path` under the given `method`, returning the parsed observations
/// and the call position each one occupies (skipping blank "unknown" lines).
pub fn parse_file(path: &Path, method: Method) -> Result<(Observations, Vec<u64>), CliError> {
    let contents = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let mut positions = Vec::new();
    let mut doubles = Vec::new();
    let mut scaled = Vec::new();
    let mut bounds = Vec::new();
    let mut position = 0u64;

    for (line_no, raw_line) in contents.lines().enumerate() {
        let line_no = line_no + 1;
        let line = raw_line.trim();
        if line.starts_with('#') {
            continue;
        }
        if line.is_empty() {
            position += 1;
            continue;
        }
        match method {
            Method::Doubles => {
                let value: f64 = line.parse().map_err(|_| CliError::BadLine {
                    line: line_no,
                    message: format!("expected a float in [0.0, 1.0], got {line:?}"),
                })?;
                doubles.push(value);
            }
            Method::Scaled => {
                let value: u64 = line.parse().map_err(|_| CliError::BadLine {
                    line: line_no,
                    message: format!("expected a non-negative integer, got {line:?}"),
                })?;
                scaled.push(value);
            }
            Method::Bounds => {
                let mut parts = line.split_whitespace();
                let lo = parts.next().and_then(|s| s.parse::<f64>().ok());
                let hi = parts.next().and_then(|s| s.parse::<f64>().ok());
                let (Some(lo), Some(hi)) = (lo, hi) else {
                    return Err(CliError::BadLine {
                        line: line_no,
                        message: format!("expected \"lo hi\", got {line:?}"),
                    });
                };
                bounds.push((lo, hi));
            }
        }
        positions.push(position);
        position += 1;
    }

    let observations = match method {
        Method::Doubles => Observations::Doubles(doubles),
        Method::Scaled => Observations::Scaled(scaled),
        Method::Bounds => Observations::Bounds(bounds),
    };
    Ok((observations, positions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct TempFile(PathBuf);

    impl TempFile {
        fn new(name: &str, contents: &str) -> Self {
            let mut path = std::env::temp_dir();
            path.push(format!("mathrandomcrack-cli-test-{}-{name}", std::process::id()));
            std::fs::write(&path, contents).unwrap();
            Self(path)
        }
    }

    impl Drop for TempFile {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    #[test]
    fn parses_doubles_skipping_comments_and_blank_lines() {
        let file = TempFile::new("doubles", "# comment\n0.5\n\n0.25\n");
        let (obs, positions) = parse_file(&file.0, Method::Doubles).unwrap();
        assert_eq!(positions, vec![0, 2]);
        match obs {
            Observations::Doubles(values) => assert_eq!(values, vec![0.5, 0.25]),
            _ => panic!("expected Doubles"),
        }
    }

    #[test]
    fn parses_bounds_pairs() {
        let file = TempFile::new("bounds", "0.1 0.2\n0.3 0.4\n");
        let (obs, positions) = parse_file(&file.0, Method::Bounds).unwrap();
        assert_eq!(positions, vec![0, 1]);
        match obs {
            Observations::Bounds(values) => assert_eq!(values, vec![(0.1, 0.2), (0.3, 0.4)]),
            _ => panic!("expected Bounds"),
        }
    }

    #[test]
    fn rejects_malformed_line() {
        let file = TempFile::new("malformed", "not-a-number\n");
        assert!(parse_file(&file.0, Method::Doubles).is_err());
    }
}

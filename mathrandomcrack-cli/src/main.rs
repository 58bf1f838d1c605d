//! Command-line front end for recovering V8 `Math.random()` state.

mod error;
mod observations;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use mathrandomcrack::MathRandom;
use observations::{Method, Observations};

/// Recovers the internal XorShift128 state behind V8's Math.random() and
/// predicts previous and next values of Math.random() calls.
#[derive(Parser)]
#[command(name = "mathrandomcrack")]
#[command(about = "Recovers V8 Math.random() state from leaked outputs")]
#[command(after_help = "Example usages:\n  \
    mathrandomcrack --method doubles --next 10 ./samples/doubles.txt\n  \
    mathrandomcrack --method scaled --next 5 --previous 5 --factor 36 --output-fmt scaled ./samples/scaled_values.txt\n  \
    mathrandomcrack --method bounds --next 10 ./samples/bounds.txt --debug")]
struct Cli {
    /// The kind of leaked values to use to recover possible Math.random() states.
    #[arg(long, value_enum)]
    method: Method,

    /// The factor to use for method/output-fmt "scaled".
    #[arg(long, default_value_t = 1)]
    factor: i64,

    /// The translation to use for method/output-fmt "scaled".
    #[arg(long, default_value_t = 0)]
    translation: i64,

    /// How many next Math.random() outputs to predict.
    #[arg(long, default_value_t = 10)]
    next: usize,

    /// How many previous Math.random() outputs to predict.
    #[arg(long, default_value_t = 0)]
    previous: usize,

    /// Show the recovered leaked values corresponding to the input file.
    #[arg(long)]
    show_leaks: bool,

    /// The format of the predicted values.
    #[arg(long, value_enum, default_value = "doubles")]
    output_fmt: OutputFormat,

    /// Cap on the number of candidate states considered, to bound runtime on
    /// severely under-determined inputs.
    #[arg(long)]
    max_candidates: Option<usize>,

    /// Raise log level to debug.
    #[arg(long)]
    debug: bool,

    /// The file containing the leaked random values.
    file: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Doubles,
    Scaled,
}

fn format_random(value: f64, fmt: OutputFormat, factor: i64, translation: i64) -> String {
    match fmt {
        OutputFormat::Doubles => value.to_string(),
        OutputFormat::Scaled => {
            let scaled = (value * factor as f64 + translation as f64).floor();
            scaled.to_string()
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(if cli.debug {
        "debug"
    } else {
        "info"
    }))
    .init();

    if cli.method == Method::Scaled && cli.factor < 2 {
        anyhow::bail!("--factor should be specified and larger than 1 when using method \"scaled\"");
    }

    let (observations, positions) = observations::parse_file(&cli.file, cli.method)
        .with_context(|| format!("failed to parse {}", cli.file.display()))?;

    let max_position = positions.iter().copied().max();

    let candidates: Box<dyn Iterator<Item = MathRandom>> = match observations {
        Observations::Doubles(values) => {
            mathrandomcrack::recover_from_doubles(&values, Some(positions), cli.max_candidates)?
        }
        Observations::Scaled(values) => mathrandomcrack::recover_from_scaled(
            &values,
            cli.factor,
            cli.translation,
            Some(positions),
            cli.max_candidates,
        )?,
        Observations::Bounds(values) => {
            mathrandomcrack::recover_from_bounds(&values, Some(positions), cli.max_candidates)?
        }
    };

    let mut found = false;
    for mut state in candidates {
        found = true;
        println!("Found a possible Math.random internal state");

        if cli.previous > 0 {
            let mut predicted: Vec<String> = (0..cli.previous)
                .map(|_| format_random(state.previous(), cli.output_fmt, cli.factor, cli.translation))
                .collect();
            predicted.reverse();
            println!("Predicted previous {} values: {:?}", cli.previous, predicted);
            for _ in 0..cli.previous {
                state.next();
            }
        }

        let replay_count = max_position.map(|p| p + 1).unwrap_or(0);
        if cli.show_leaks {
            let leaked: Vec<String> = (0..replay_count)
                .map(|_| format_random(state.next(), cli.output_fmt, cli.factor, cli.translation))
                .collect();
            println!("Recovered leaked values: {:?}", leaked);
        } else {
            for _ in 0..replay_count {
                state.next();
            }
        }

        if cli.next > 0 {
            let predicted: Vec<String> = (0..cli.next)
                .map(|_| format_random(state.next(), cli.output_fmt, cli.factor, cli.translation))
                .collect();
            println!("Predicted next {} values: {:?}", cli.next, predicted);
        }
        println!();
    }

    if !found {
        println!("Couldn't recover any possible Math.random internal state. Please check your values file.");
    }

    Ok(())
}

use std::{num::NonZeroUsize, time::Duration};

use caim_discretize::{DEFAULT_TIMEOUT, DiscretizerConfig, OutputFormat};
use clap::{Parser, Subcommand};

use self::{apply::ApplyArg, discretize::DiscretizeArg, fit::FitArg};

mod apply;
mod discretize;
mod fit;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Fit a discretization scheme and save it
    Fit(#[clap(flatten)] FitArg),
    /// Fit a scheme and write the discretized dataset
    Discretize(#[clap(flatten)] DiscretizeArg),
    /// Discretize a dataset with a saved scheme
    Apply(#[clap(flatten)] ApplyArg),
}

/// Discretizer options shared by the fitting commands.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DiscretizerArg {
    /// Attributes to discretize, e.g. "first-3,5,last"
    #[arg(short = 'R', long = "range", default_value = "first-last")]
    range: String,
    /// Output bin indices instead of interval labels
    #[arg(short = 'O', long)]
    numeric_output: bool,
    /// Name of the nominal class attribute
    #[arg(short = 'C', long = "class", default_value = "class")]
    class: String,
    /// Number of worker threads [default: available parallelism]
    #[arg(long)]
    threads: Option<NonZeroUsize>,
    /// Seconds to wait for the boundary searches
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout_secs: u64,
}

impl DiscretizerArg {
    pub(crate) fn to_config(&self) -> DiscretizerConfig {
        DiscretizerConfig {
            attribute_range: self.range.clone(),
            output_format: if self.numeric_output {
                OutputFormat::Index
            } else {
                OutputFormat::Interval
            },
            class_attribute: self.class.clone(),
            threads: self.threads,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Fit(arg) => fit::run(&arg)?,
        Mode::Discretize(arg) => discretize::run(&arg)?,
        Mode::Apply(arg) => apply::run(&arg)?,
    }
    Ok(())
}

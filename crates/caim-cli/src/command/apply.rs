use std::path::PathBuf;

use anyhow::Context as _;
use caim_discretize::CaimDiscretizer;
use tracing::info;

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ApplyArg {
    /// Scheme file written by `caim fit`
    scheme: PathBuf,
    /// Dataset JSON file to discretize
    dataset: PathBuf,
    /// Output file path for the discretized dataset [default: stdout]
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ApplyArg) -> anyhow::Result<()> {
    let file = util::read_scheme_file(&arg.scheme)?;
    info!(
        relation = %file.relation,
        fitted_at = %file.fitted_at,
        attributes = file.scheme.fitted().count(),
        "loaded scheme"
    );
    let dataset = util::read_dataset_file(&arg.dataset)?;

    let discretizer = CaimDiscretizer::from_scheme(file.config, file.scheme)?;
    let discretized = discretizer.transform(&dataset).with_context(|| {
        format!(
            "Failed to apply {} to {}",
            arg.scheme.display(),
            arg.dataset.display()
        )
    })?;
    Output::save_json(&discretized, arg.output.clone())?;
    Ok(())
}

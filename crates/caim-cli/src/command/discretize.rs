use std::path::PathBuf;

use caim_discretize::CaimDiscretizer;

use crate::{
    command::{DiscretizerArg, fit},
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DiscretizeArg {
    /// Dataset JSON file
    dataset: PathBuf,
    #[clap(flatten)]
    pub(crate) discretizer: DiscretizerArg,
    /// Output file path for the discretized dataset [default: stdout]
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &DiscretizeArg) -> anyhow::Result<()> {
    let dataset = util::read_dataset_file(&arg.dataset)?;
    let mut discretizer = CaimDiscretizer::new(arg.discretizer.to_config())?;
    let scheme = discretizer.fit(&dataset)?;
    fit::print_summary(&dataset, scheme);

    let discretized = discretizer.transform(&dataset)?;
    Output::save_json(&discretized, arg.output.clone())?;
    Ok(())
}

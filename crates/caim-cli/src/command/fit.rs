use std::path::PathBuf;

use caim_dataset::{Dataset, DatasetView as _, Value};
use caim_discretize::{AttributeSlot, CaimDiscretizer, DiscretizationScheme};
use caim_stats::descriptive::ColumnSummary;
use chrono::Utc;

use crate::{
    command::DiscretizerArg,
    schema::SchemeFile,
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct FitArg {
    /// Dataset JSON file
    dataset: PathBuf,
    #[clap(flatten)]
    pub(crate) discretizer: DiscretizerArg,
    /// Output file path for the scheme [default: stdout]
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &FitArg) -> anyhow::Result<()> {
    let dataset = util::read_dataset_file(&arg.dataset)?;
    let config = arg.discretizer.to_config();
    let mut discretizer = CaimDiscretizer::new(config.clone())?;
    let scheme = discretizer.fit(&dataset)?;

    print_summary(&dataset, scheme);

    let file = SchemeFile {
        fitted_at: Utc::now(),
        relation: dataset.relation().to_owned(),
        config,
        scheme: scheme.clone(),
    };
    Output::save_json(&file, arg.output.clone())?;
    Ok(())
}

/// Prints one line per discretized attribute to stderr.
pub(crate) fn print_summary(dataset: &Dataset, scheme: &DiscretizationScheme) {
    eprintln!(
        "{:<20} {:>9} {:>10} {:>7} {:>8} {:>12} {:>12} {:>12} {:>12}",
        "attribute", "intervals", "caim", "missing", "distinct", "min", "max", "mean", "std_dev"
    );
    for (index, slot) in scheme.slots.slots().iter().enumerate() {
        let name = &dataset.attribute(index).name;
        let summary = ColumnSummary::new(dataset.column(index).map(Value::as_number));
        match (slot, summary) {
            (AttributeSlot::Skipped, _) => {}
            (AttributeSlot::Fitted(attribute), Some(summary)) => eprintln!(
                "{name:<20} {:>9} {:>10.4} {:>7} {:>8} {:>12.4} {:>12.4} {:>12.4} {:>12.4}",
                attribute.num_intervals(),
                attribute.score(),
                summary.missing,
                summary.distinct,
                summary.min,
                summary.max,
                summary.mean,
                summary.std_dev,
            ),
            (AttributeSlot::Fitted(_) | AttributeSlot::Empty, _) => {
                eprintln!("{name:<20} {:>9} {:>10}", 1, "-");
            }
        }
    }
}

//! Command line tool to train the spam classifier

use anyhow::anyhow;
use burn::config::Config as _;
use pico_args::Arguments;
use sms_spam_detector::{
    datasets::{sms, LoadableDataset},
    pipelines::text_classification::{train, TrainingConfig},
    utils::Renderer,
};

const HELP: &str = "\
Usage: train DATASET [OPTIONS]

Arguments:
  DATASET                Path to a labelled CSV file (e.g., 'spam.csv')

Options:
  -h, --help             Print help
  -c, --config           Load training settings from a saved config.json
  -o, --artifact-dir     Directory to write the model to (defaults to 'artifacts')
  -f, --max-features     Maximum vocabulary size (defaults to 3000)
  -t, --test-ratio       Share of the dataset held out for evaluation (defaults to 0.2)
  -s, --seed             Seed for the stratified split (defaults to 42)
  -a, --alpha            Naive Bayes smoothing (defaults to 1.0)
";

#[derive(Debug)]
struct Args {
    dataset: String,
    config: Option<String>,
    artifact_dir: Option<String>,
    max_features: Option<usize>,
    test_ratio: Option<f64>,
    seed: Option<u64>,
    alpha: Option<f64>,
}

impl Args {
    fn parse() -> anyhow::Result<Option<Self>> {
        let mut pargs = Arguments::from_env();

        // Help has a higher priority and should be handled separately.
        if pargs.contains(["-h", "--help"]) {
            return Ok(None);
        }

        let args = Args {
            config: pargs.opt_value_from_str(["-c", "--config"])?,
            artifact_dir: pargs.opt_value_from_str(["-o", "--artifact-dir"])?,
            max_features: pargs.opt_value_from_str(["-f", "--max-features"])?,
            test_ratio: pargs.opt_value_from_str(["-t", "--test-ratio"])?,
            seed: pargs.opt_value_from_str(["-s", "--seed"])?,
            alpha: pargs.opt_value_from_str(["-a", "--alpha"])?,
            dataset: pargs.free_from_str().map_err(|e| match e {
                pico_args::Error::MissingArgument => anyhow!("Missing required argument: DATASET"),
                _ => anyhow!("{}", e),
            })?,
        };

        Ok(Some(args))
    }

    fn config(&self) -> anyhow::Result<TrainingConfig> {
        let mut config = match &self.config {
            Some(path) => TrainingConfig::load(path)
                .map_err(|e| anyhow!("Unable to load config file {}: {}", path, e))?,
            None => TrainingConfig::new(),
        };

        if let Some(artifact_dir) = &self.artifact_dir {
            config.artifact_dir = artifact_dir.to_string();
        }

        if let Some(max_features) = self.max_features {
            config.vectorizer.max_features = max_features;
        }

        if let Some(test_ratio) = self.test_ratio {
            config.test_ratio = test_ratio;
        }

        if let Some(seed) = self.seed {
            config.seed = seed;
        }

        if let Some(alpha) = self.alpha {
            config.classifier.alpha = alpha;
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let Some(args) = Args::parse()? else {
        print!("{}", HELP);

        return Ok(());
    };

    let config = args.config()?;

    let dataset = sms::Dataset::load(&args.dataset).await?;
    let counts = dataset.class_counts();

    log::info!(
        "Class distribution: {} ham, {} spam",
        counts.ham,
        counts.spam
    );

    let report = train(&dataset, &config)?;

    print!("{}", Renderer::new()?.report(&report)?);
    println!("\nModel saved to {}", config.artifact_dir);

    Ok(())
}

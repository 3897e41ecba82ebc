//! HTTP server exposing the spam classifier

use std::sync::Arc;

use anyhow::{anyhow, Result};
use burn::config::Config as _;
use pico_args::Arguments;
use sms_spam_detector::{
    pipelines::text_classification::SpamDetector,
    server::{serve, shutdown_on, ServerConfig},
};
use tokio::net::TcpListener;

const HELP: &str = "\
Usage: serve [OPTIONS]

Options:
  -h, --help           Print help
  -c, --config         Load server settings from a saved config file
  -a, --artifact-dir   Directory holding the trained model (defaults to 'artifacts')
  -b, --bind           Address to listen on (defaults to '0.0.0.0:5000')
";

#[derive(Debug)]
struct Args {
    config: Option<String>,
    artifact_dir: Option<String>,
    bind: Option<String>,
}

impl Args {
    fn parse() -> Result<Option<Self>> {
        let mut pargs = Arguments::from_env();

        // Help has a higher priority and should be handled separately.
        if pargs.contains(["-h", "--help"]) {
            return Ok(None);
        }

        Ok(Some(Args {
            config: pargs.opt_value_from_str(["-c", "--config"])?,
            artifact_dir: pargs.opt_value_from_str(["-a", "--artifact-dir"])?,
            bind: pargs.opt_value_from_str(["-b", "--bind"])?,
        }))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init();

    let Some(args) = Args::parse()? else {
        print!("{}", HELP);

        return Ok(());
    };

    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)
            .map_err(|e| anyhow!("Unable to load config file {}: {}", path, e))?,
        None => ServerConfig::new(),
    };

    if let Some(artifact_dir) = args.artifact_dir {
        config.artifact_dir = artifact_dir;
    }

    if let Some(bind) = args.bind {
        config.bind = bind;
    }

    // No model, no service
    let detector = SpamDetector::load(&config.artifact_dir)
        .map_err(|e| anyhow!("Unable to load model from {}: {}", config.artifact_dir, e))?;

    log::info!("Loaded model from {}", config.artifact_dir);

    let listener = TcpListener::bind(&config.bind)
        .await
        .map_err(|e| anyhow!("Unable to bind {}: {}", config.bind, e))?;

    serve(listener, Arc::new(detector), shutdown_on(tokio::signal::ctrl_c())).await?;

    Ok(())
}

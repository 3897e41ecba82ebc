//! Command line tool for classifying messages

use anyhow::{anyhow, bail, Result};
use pico_args::Arguments;
use sms_spam_detector::{
    pipelines::text_classification::{ClassifyError, SpamDetector},
    server::api::{ErrorResponse, PredictResponse},
    utils::{files::read_messages, Renderer},
};

const HELP: &str = "\
Usage: infer [OPTIONS] [MESSAGE]...

Arguments:
  MESSAGE              One or more messages to classify

Options:
  -h, --help           Print help
  -a, --artifact-dir   Directory holding the trained model (defaults to 'artifacts')
  -f, --file           Classify every non-blank line of a file
  --json               Print the API response envelope instead of the verdict
";

#[derive(Debug)]
struct Args {
    /// Prints the usage menu
    help: bool,

    /// Where the model lives
    artifact_dir: String,

    /// A file of messages, one per line
    file: Option<String>,

    /// Print JSON
    json: bool,

    /// Messages given on the command line
    messages: Vec<String>,
}

fn parse_args() -> Result<Args> {
    let mut pargs = Arguments::from_env();

    let help = pargs.contains(["-h", "--help"]);
    let json = pargs.contains("--json");
    let artifact_dir = pargs
        .opt_value_from_str(["-a", "--artifact-dir"])?
        .unwrap_or_else(|| "artifacts".to_string());
    let file = pargs.opt_value_from_str(["-f", "--file"])?;

    let messages = pargs
        .finish()
        .into_iter()
        .map(|arg| {
            arg.into_string()
                .map_err(|arg| anyhow!("Message is not valid UTF-8: {:?}", arg))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Args {
        help,
        artifact_dir,
        file,
        json,
        messages,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init();

    let args = parse_args()?;

    if args.help {
        println!("{}", HELP);
        return Ok(());
    }

    let mut messages = args.messages;

    if let Some(file) = &args.file {
        messages.extend(
            read_messages(file)
                .await
                .map_err(|e| anyhow!("Unable to read {}: {}", file, e))?,
        );
    }

    if messages.is_empty() {
        bail!("No messages to classify, see --help");
    }

    let detector = SpamDetector::load(&args.artifact_dir)
        .map_err(|e| anyhow!("Unable to load model from {}: {}", args.artifact_dir, e))?;

    let renderer = Renderer::new()?;

    for message in messages {
        match detector.classify(&message) {
            Ok(result) if args.json => {
                println!("{}", serde_json::to_string(&PredictResponse::from(&result))?)
            }
            Ok(result) => println!("{}", renderer.verdict(&message, &result)?),
            Err(err @ ClassifyError::EmptyMessage) if args.json => {
                println!("{}", serde_json::to_string(&ErrorResponse::new(err.to_string()))?)
            }
            Err(err) => eprintln!("Unable to classify {:?}: {}", message, err),
        }
    }

    Ok(())
}

use std::path::Path;

use clap::Args;
use focusflow_core::Classifier;

#[derive(Args)]
pub struct ClassifyArgs {
    /// Destination to classify (usually a URL)
    destination: String,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: ClassifyArgs, config: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config)?;
    let classification = Classifier::from_config(&config.classifier).classify(&args.destination);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&classification)?);
    } else if classification.is_distraction {
        println!("{} (distraction)", classification.category);
    } else {
        println!("{}", classification.category);
    }
    Ok(())
}

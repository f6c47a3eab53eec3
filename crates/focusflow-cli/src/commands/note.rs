use clap::Args;
use focusflow_core::summarize_note;

#[derive(Args)]
pub struct SummarizeArgs {
    /// Note text
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    text: Vec<String>,
}

pub fn run(args: SummarizeArgs) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", summarize_note(&args.text.join(" ")));
    Ok(())
}

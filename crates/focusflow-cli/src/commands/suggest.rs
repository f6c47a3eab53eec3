use clap::Args;
use focusflow_core::{suggest, RandomPicker, TaskStore};

#[derive(Args)]
pub struct SuggestArgs {
    /// Task as "Title:priority" (priority defaults to 3 when omitted)
    #[arg(long = "task", value_name = "TITLE:PRIORITY")]
    tasks: Vec<String>,
}

pub fn run(args: SuggestArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = TaskStore::new();
    for raw in &args.tasks {
        let (title, priority) = parse_task(raw)?;
        store.add_task(title, priority)?;
    }
    println!("{}", suggest(store.list(), &RandomPicker));
    Ok(())
}

/// Split on the last ':' so titles may contain colons.
fn parse_task(raw: &str) -> Result<(&str, u8), Box<dyn std::error::Error>> {
    match raw.rsplit_once(':') {
        Some((title, priority)) => {
            let priority = priority
                .trim()
                .parse::<u8>()
                .map_err(|_| format!("invalid priority in {raw:?}"))?;
            Ok((title, priority))
        }
        None => Ok((raw, 3)),
    }
}

//! Interactive shell over a live engine.
//!
//! Each stdin line is parsed with clap into a [`ShellCommand`]. Background
//! events (distraction warnings, tip refreshes) are printed as they arrive.

use std::path::Path;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use focusflow_core::{
    CyclingPicker, DestinationOpener, Event, FocusFlow, NoopOpener, RandomPicker, Suggestion,
    SystemOpener, TaskId, TemplatePicker,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Args)]
pub struct ShellArgs {
    /// Do not open destinations in the system viewer
    #[arg(long)]
    no_viewer: bool,
    /// Rotate tips in a fixed order instead of at random
    #[arg(long)]
    cycle_tips: bool,
}

#[derive(Parser)]
#[command(
    name = "focusflow",
    no_binary_name = true,
    disable_version_flag = true,
    help_template = "{subcommands}"
)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand)]
enum ShellCommand {
    /// Add or remove tasks
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },
    /// List tasks
    Tasks,
    /// Start, pause or resume the focus timer
    Timer,
    /// Reset the focus timer
    Reset,
    /// Show the timer and the active session
    Status,
    /// Open a focus session, closing the current one
    Open {
        /// Destination to focus on (the configured default when omitted)
        destination: Option<String>,
    },
    /// Close the active focus session
    Close,
    /// Show finished sessions and where the time went
    History,
    /// Add or remove notes
    Note {
        #[command(subcommand)]
        action: NoteAction,
    },
    /// List notes grouped by tag
    Notes,
    /// Show the current coaching tip
    Tip,
    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

#[derive(Subcommand)]
enum TaskAction {
    /// Add a task
    Add {
        /// Priority from 1 (low) to 5 (high)
        priority: u8,
        /// Task title
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        title: Vec<String>,
    },
    /// Remove a task by its position in `tasks`
    Rm { index: usize },
    /// Mark a task as done
    Done { index: usize },
}

#[derive(Subcommand)]
enum NoteAction {
    /// Add a note
    Add {
        /// Note text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
        /// Comma-separated tags
        #[arg(long, default_value = "")]
        tags: String,
    },
    /// Remove a note by its position in `notes`
    Rm { index: usize },
}

enum Control {
    Continue,
    Quit,
}

pub fn run(args: ShellArgs, config: Option<&Path>) -> CliResult<()> {
    let config = super::load_config(config)?;
    let opener: Arc<dyn DestinationOpener> = if args.no_viewer {
        Arc::new(NoopOpener)
    } else {
        Arc::new(SystemOpener)
    };
    let picker: Arc<dyn TemplatePicker> = if args.cycle_tips {
        Arc::new(CyclingPicker::new())
    } else {
        Arc::new(RandomPicker)
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async {
        let flow = Arc::new(FocusFlow::with_collaborators(config, opener, picker));
        let result = read_loop(&flow).await;
        flow.shutdown().await;
        result
    })
}

async fn read_loop(flow: &Arc<FocusFlow>) -> CliResult<()> {
    let printer = tokio::spawn(print_events(flow.clone()));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("FocusFlow shell. Type 'help' for commands.");
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            // The undecodable line has been consumed; keep reading.
            Err(err) if err.kind() == std::io::ErrorKind::InvalidData => {
                eprintln!("error: {err}");
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }
        let command = match ShellLine::try_parse_from(words) {
            Ok(parsed) => parsed.command,
            Err(err) => {
                err.print()?;
                continue;
            }
        };
        match execute(flow, command).await {
            Ok(Control::Continue) => {}
            Ok(Control::Quit) => break,
            Err(e) => eprintln!("error: {e}"),
        }
    }

    printer.abort();
    Ok(())
}

async fn print_events(flow: Arc<FocusFlow>) {
    let mut rx = flow.subscribe();
    loop {
        match rx.recv().await {
            Ok(Event::DistractionDetected { destination, .. }) => {
                println!("! {}", Suggestion::Distracted(destination));
            }
            Ok(Event::SuggestionRefreshDue { .. }) => {
                println!("tip: {}", flow.suggestion());
            }
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!("shell event printer skipped {skipped} events");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

async fn execute(flow: &FocusFlow, command: ShellCommand) -> CliResult<Control> {
    match command {
        ShellCommand::Task { action } => match action {
            TaskAction::Add { priority, title } => {
                let task = flow.add_task(&title.join(" "), priority)?;
                println!("Added task: {} (priority {})", task.title, task.priority);
            }
            TaskAction::Rm { index } => {
                if let Some(removed) = flow.remove_task(task_at(flow, index)?) {
                    println!("Removed task: {}", removed.title);
                }
            }
            TaskAction::Done { index } => {
                if let Some(done) = flow.complete_task(task_at(flow, index)?) {
                    println!("Completed task: {}", done.title);
                }
            }
        },
        ShellCommand::Tasks => {
            let tasks = flow.tasks();
            if tasks.is_empty() {
                println!("No tasks yet.");
            }
            for (i, task) in tasks.iter().enumerate() {
                println!("{}. {} (priority {})", i + 1, task.title, task.priority);
            }
        }
        ShellCommand::Timer => {
            let snapshot = flow.start_pause_timer().await;
            println!("Timer {}: {}", snapshot.status, snapshot.display);
        }
        ShellCommand::Reset => {
            let snapshot = flow.reset_timer().await;
            println!("Timer {}: {}", snapshot.status, snapshot.display);
        }
        ShellCommand::Status => {
            let snapshot = flow.timer();
            println!("Timer {}: {}", snapshot.status, snapshot.display);
            match flow.active_session() {
                Some(session) => println!(
                    "Session: {} ({}, {}s)",
                    session.destination,
                    flow.classifier().category_of(&session.destination),
                    session.elapsed_secs
                ),
                None => println!("No active session."),
            }
        }
        ShellCommand::Open { destination } => {
            if let Some(closed) = flow
                .open_focus_session(destination.as_deref().unwrap_or_default())
                .await
            {
                println!("Closed: {closed}");
            }
            if let Some(session) = flow.active_session() {
                println!("Focusing on {}", session.destination);
            }
        }
        ShellCommand::Close => match flow.close_focus_session().await {
            Some(closed) => println!("Closed: {closed}"),
            None => println!("No active session."),
        },
        ShellCommand::History => {
            for entry in flow.history() {
                println!("{entry}");
            }
            println!("{}", flow.history_summary());
        }
        ShellCommand::Note { action } => match action {
            NoteAction::Add { text, tags } => {
                let note = flow.add_note(&text.join(" "), &tags)?;
                println!("Added note #{}: {}", note.primary_tag(), note.summary);
            }
            NoteAction::Rm { index } => {
                let note = flow
                    .notes()
                    .into_iter()
                    .nth(position(index)?)
                    .ok_or_else(|| format!("no note at index {index}"))?;
                if let Some(removed) = flow.remove_note(note.id) {
                    println!("Removed note: {}", removed.summary);
                }
            }
        },
        ShellCommand::Notes => {
            for (i, note) in flow.notes().iter().enumerate() {
                println!("{}. [{}] {}", i + 1, note.tags.join(", "), note.text);
            }
            println!("{}", flow.global_summary());
        }
        ShellCommand::Tip => println!("{}", flow.suggestion()),
        ShellCommand::Quit => return Ok(Control::Quit),
    }
    Ok(Control::Continue)
}

fn task_at(flow: &FocusFlow, index: usize) -> CliResult<TaskId> {
    flow.tasks()
        .get(position(index)?)
        .map(|task| task.id)
        .ok_or_else(|| format!("no task at index {index}").into())
}

/// Listings are numbered from 1.
fn position(index: usize) -> CliResult<usize> {
    index
        .checked_sub(1)
        .ok_or_else(|| "indexes start at 1".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<ShellCommand, clap::Error> {
        ShellLine::try_parse_from(line.split_whitespace()).map(|l| l.command)
    }

    #[test]
    fn test_task_add_joins_title_words() {
        match parse("task add 4 write the - report").unwrap() {
            ShellCommand::Task {
                action: TaskAction::Add { priority, title },
            } => {
                assert_eq!(priority, 4);
                assert_eq!(title.join(" "), "write the - report");
            }
            _ => panic!("expected task add"),
        }
    }

    #[test]
    fn test_note_add_with_tags() {
        match parse("note add call the bank --tags work,personal").unwrap() {
            ShellCommand::Note {
                action: NoteAction::Add { text, tags },
            } => {
                assert_eq!(text, ["call", "the", "bank"]);
                assert_eq!(tags, "work,personal");
            }
            _ => panic!("expected note add"),
        }
    }

    #[test]
    fn test_open_without_destination_and_exit_alias() {
        assert!(matches!(
            parse("open").unwrap(),
            ShellCommand::Open { destination: None }
        ));
        assert!(matches!(parse("exit").unwrap(), ShellCommand::Quit));
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        assert!(parse("launch").is_err());
        assert!(parse("task add high essay").is_err());
    }

    #[test]
    fn test_position_is_one_based() {
        assert_eq!(position(1).unwrap(), 0);
        assert!(position(0).is_err());
    }
}

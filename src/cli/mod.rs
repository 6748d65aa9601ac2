pub mod commands;
pub mod output;

use std::{io::IsTerminal, path::PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::process_command;
use tracing::{debug, level_filters::LevelFilter};

use crate::{
    controller::Controller,
    model::Size,
    storage::{object_store::FileObjectStore, task_store::RecordTaskStore},
    utils::{
        clock::DefaultClock,
        dir::{create_application_default_path, ensure_dir},
        logging::{enable_logging, CLI_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "Tasktimer", version, long_about = None)]
#[command(about = "Track time spent on tasks", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub commands: Commands,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    pub dir: Option<PathBuf>,
    #[arg(long, global = true, help = "Enable logging to the console")]
    pub log: bool,
    #[arg(long = "log-filter", global = true, help = "Level of logs written to the log files")]
    pub log_filter: Option<LevelFilter>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
#[command(version, about, long_about = None)]
pub enum Commands {
    #[command(about = "Create a new task")]
    Add {
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long, value_enum, ignore_case = true, help = "Defaults to None")]
        size: Option<Size>,
        #[arg(short, long = "tag", help = "Tag of the task. Can be repeated")]
        tags: Vec<String>,
    },
    #[command(about = "Start tracking time on a task")]
    Start { id: u32 },
    #[command(about = "Stop tracking time on a task")]
    Stop { id: u32 },
    #[command(about = "Delete a task and everything tracked on it")]
    Delete { id: u32 },
    #[command(about = "List all tasks with their tracked time")]
    List {},
    #[command(about = "Summarize tracked time. Filters by at most one of size or tag")]
    Summary {
        #[arg(
            long,
            value_enum,
            ignore_case = true,
            num_args = 0..=1,
            default_missing_value = "s",
            conflicts_with = "tag",
            help = "Only tasks of this size. Just --size means S"
        )]
        size: Option<Size>,
        #[arg(long, help = "Only tasks with this tag")]
        tag: Option<String>,
    },
    #[command(about = "List tags used by tasks")]
    Tags {},
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = args
        .dir
        .map_or_else(create_application_default_path, ensure_dir)?;

    let logging_level = args.log_filter.or(args.log.then_some(LevelFilter::TRACE));
    enable_logging(CLI_PREFIX, &app_dir, logging_level, args.log)?;
    debug!("Using application directory {app_dir:?}");

    let store = RecordTaskStore::new(FileObjectStore::new(app_dir)?);
    let mut controller = Controller::load(store, Box::new(DefaultClock)).await?;

    let mut stdout = std::io::stdout();
    let color = stdout.is_terminal();
    process_command(&mut controller, args.commands, &mut stdout, color).await
}

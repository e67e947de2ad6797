pub mod dates;
pub mod report;
pub mod transfer;

use std::path::PathBuf;

use anyhow::Result;
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use dates::{parse_moment, parse_optional_moment, DateStyle, SelectionArgs};
use tracing::level_filters::LevelFilter;

use crate::{
    aggregation::{summary::summarize, weekly::group_by_week},
    session::tracker::Tracker,
    storage::session_storage::FileSessionStorage,
    utils::{
        clock::DefaultClock,
        dir::{create_application_default_path, ensure_dir},
        logging::{enable_logging, CLI_PREFIX},
        time::format_clock_duration,
    },
};

#[derive(Parser, Debug)]
#[command(name = "Punchclock", version, long_about = None)]
#[command(about = "Track your working hours and see weekly, night and holiday totals", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, global = true, help = "Enable logging")]
    log: bool,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        default_value_t = DateStyle::Uk,
        help = "Whether 05/03 means the 5th of March (uk) or the 3rd of May (us)"
    )]
    date_style: DateStyle,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Start a work session")]
    In {
        #[arg(long, help = "When the session started. Defaults to now")]
        at: Option<String>,
    },
    #[command(about = "Finish the running work session")]
    Out {
        #[arg(long, help = "When the session ended. Defaults to now")]
        at: Option<String>,
    },
    #[command(about = "Show the running work session")]
    Status {},
    #[command(about = "List finished sessions, newest first")]
    List {
        #[command(flatten)]
        selection: SelectionArgs,
    },
    #[command(about = "Change when a finished session started and ended")]
    Edit {
        id: i64,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },
    #[command(about = "Remove a finished session")]
    Delete { id: i64 },
    #[command(about = "Totals per Monday to Sunday week")]
    Weeks {
        #[command(flatten)]
        selection: SelectionArgs,
    },
    #[command(about = "Totals with night and holiday hours")]
    Summary {
        #[command(flatten)]
        selection: SelectionArgs,
    },
    #[command(about = "Save all sessions into a JSON file")]
    Export {
        #[arg(
            short,
            long,
            help = "Where to write the backup. \"-\" prints it. Defaults to punchclock-<month>-<day>.json"
        )]
        output: Option<PathBuf>,
    },
    #[command(about = "Replace all sessions with the contents of an exported file")]
    Import { path: PathBuf },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = match args.dir {
        Some(dir) => ensure_dir(dir)?,
        None => create_application_default_path()?,
    };

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(CLI_PREFIX, &app_dir, logging_level, args.log)?;

    let tracker = Tracker::new(
        Box::new(FileSessionStorage::new(app_dir)?),
        Box::new(DefaultClock),
    );
    let style = args.date_style;
    let now = tracker.now().with_timezone(&Local);

    match args.commands {
        Commands::In { at } => {
            let at = parse_optional_moment(at.as_deref(), style, now)?;
            let active = tracker.clock_in(at).await?;
            println!(
                "Clocked in at {}",
                active.start_time.with_timezone(&Local).format("%H:%M")
            );
        }
        Commands::Out { at } => {
            let at = parse_optional_moment(at.as_deref(), style, now)?;
            let session = tracker.clock_out(at).await?;
            println!(
                "Clocked out at {} after {}",
                session.end_time.with_timezone(&Local).format("%H:%M"),
                format_clock_duration(session.elapsed())
            );
        }
        Commands::Status {} => {
            let active = tracker.status().await?;
            report::print_status(active.as_ref(), tracker.now());
        }
        Commands::List { selection } => {
            let selection = selection.resolve(style, now)?;
            report::print_sessions(&selection.select(&tracker.sessions().await?));
        }
        Commands::Edit { id, start, end } => {
            let start = parse_moment(&start, style, now)?.with_timezone(&Utc);
            let end = parse_moment(&end, style, now)?.with_timezone(&Utc);
            let session = tracker.edit(id, start, end).await?;
            report::print_session(&session);
        }
        Commands::Delete { id } => {
            let session = tracker.delete(id).await?;
            println!("Deleted");
            report::print_session(&session);
        }
        Commands::Weeks { selection } => {
            let selection = selection.resolve(style, now)?;
            let sessions = selection.select(&tracker.sessions().await?);
            report::print_weeks(&group_by_week(&sessions, &Local));
        }
        Commands::Summary { selection } => {
            let selection = selection.resolve(style, now)?;
            let sessions = selection.select(&tracker.sessions().await?);
            report::print_summary(&summarize(&sessions, &Local));
        }
        Commands::Export { output } => {
            if let Some(path) = transfer::export_to(&tracker, output, now).await? {
                println!("Exported to {}", path.display());
            }
        }
        Commands::Import { path } => {
            let imported = transfer::import_from(&tracker, &path).await?;
            println!("Imported {imported} sessions");
        }
    }
    Ok(())
}

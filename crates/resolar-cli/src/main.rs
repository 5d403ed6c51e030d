//! Resolar CLI - Command-line interface for the Resolar daemon.

mod commands;
mod output;

use clap::{Args, Parser, Subcommand, ValueEnum};
use resolar_config_and_utils::{init_logging, Paths};
use resolar_dispatch::PageEndpoint;
use std::path::PathBuf;
use tracing::debug;

/// Resolar CLI - Send pages and highlights to your notes.
#[derive(Parser)]
#[command(name = "resolar")]
#[command(about = "Resolar CLI for authenticated page and highlight capture")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", global = true)]
    format: output::OutputFormat,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// Base directory shared with the daemon. Defaults to ~/.resolar
    #[arg(long, global = true, env = "RESOLAR_HOME")]
    base_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Login with username and password
    Login {
        /// Username (prompted when omitted)
        #[arg(short, long)]
        username: Option<String>,
    },

    /// Logout and clear the stored session
    Logout,

    /// Check daemon and authentication status
    Status,

    /// Submit the text of a page
    Submit(SubmitArgs),

    /// Submit highlighted passages, one per line
    Highlights(SubmitArgs),

    /// Manage subjects
    Subjects {
        #[command(subcommand)]
        command: SubjectCommands,
    },

    /// Turn highlighting on or off for a page
    Highlighting {
        #[command(subcommand)]
        command: HighlightingCommands,
    },
}

/// Where the captured content comes from and where it goes.
#[derive(Args, Debug, Clone)]
pub struct SubmitArgs {
    /// Page URL
    #[arg(long)]
    pub url: String,

    /// Page title
    #[arg(short, long)]
    pub title: Option<String>,

    /// Subject to file the capture under (defaults to none)
    #[arg(short, long)]
    pub subject_id: Option<i64>,

    /// Service endpoint for the submission
    #[arg(short, long, value_enum)]
    pub endpoint: Option<EndpointArg>,

    /// File to read; stdin when omitted or "-"
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EndpointArg {
    Pages,
    Highlight,
    HighlightLarge,
}

impl From<EndpointArg> for PageEndpoint {
    fn from(arg: EndpointArg) -> Self {
        match arg {
            EndpointArg::Pages => PageEndpoint::Pages,
            EndpointArg::Highlight => PageEndpoint::Highlight,
            EndpointArg::HighlightLarge => PageEndpoint::HighlightLarge,
        }
    }
}

#[derive(Subcommand)]
enum SubjectCommands {
    /// List subjects
    List {
        /// Use the cached listing when one exists
        #[arg(long)]
        cached: bool,
    },
    /// Add a subject
    Add {
        /// Subject name
        name: String,
    },
    /// Remember a subject for later captures
    Select {
        /// Subject ID
        #[arg(required_unless_present = "clear")]
        id: Option<i64>,
        /// Clear the remembered subject
        #[arg(long, conflicts_with = "id")]
        clear: bool,
    },
}

#[derive(Subcommand)]
enum HighlightingCommands {
    /// Enable highlighting for a page
    On {
        #[arg(long)]
        page: String,
    },
    /// Disable highlighting for a page
    Off {
        #[arg(long)]
        page: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let paths = match Paths::resolve(cli.base_dir.clone()) {
        Ok(paths) => paths,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // The CLI logs to the shared file only; stdout is for results.
    init_logging("cli", &cli.log_level, &paths, false);
    debug!(base_dir = %paths.base_dir().display(), "CLI started");

    let format = cli.format;
    let result = match cli.command {
        Commands::Login { username } => commands::login(&paths, username, &format).await,
        Commands::Logout => commands::logout(&paths, &format).await,
        Commands::Status => commands::status(&paths, &format).await,
        Commands::Submit(args) => commands::submit_page(&paths, args, &format).await,
        Commands::Highlights(args) => commands::submit_highlights(&paths, args, &format).await,
        Commands::Subjects { command } => match command {
            SubjectCommands::List { cached } => {
                commands::subjects_list(&paths, cached, &format).await
            }
            SubjectCommands::Add { name } => commands::subjects_add(&paths, &name, &format).await,
            SubjectCommands::Select { id, clear } => {
                let id = if clear { None } else { id };
                commands::subjects_select(&paths, id, &format).await
            }
        },
        Commands::Highlighting { command } => match command {
            HighlightingCommands::On { page } => {
                commands::highlighting(&paths, &page, true, &format).await
            }
            HighlightingCommands::Off { page } => {
                commands::highlighting(&paths, &page, false, &format).await
            }
        },
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            output::print_error(&e.to_string(), &format);
            std::process::exit(1);
        }
    }
}

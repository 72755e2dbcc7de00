// Rust guideline compliant 2026-10-19

//! Threadswap CLI Application
//!
//! Command-line interface for the Threadswap clothing exchange.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use threadswap_app::RepoContext;
use threadswap_cli::commands::{
    self, item::ItemAction, ledger::LedgerAction, swap::SwapAction, user::UserAction, Session,
};
use threadswap_cli::{create_formatter, should_use_color, OutputFormatter};
use threadswap_core::OutputFormat;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "tsw",
    version,
    about = "Threadswap: community clothing exchange",
    long_about = "Threadswap lets members list garments, earn points when a moderator approves them, spend points on other listings, and trade items one for one. All state lives in .threadswap/store.jsonl.",
    after_help = "Examples:\n  tsw init --admin moderator\n  tsw user register alice\n  tsw --as alice item submit \"Denim jacket\" --description \"Light wash, barely worn\" --category outerwear --type jacket --size M --condition good --color blue --image jacket.jpg\n  tsw --as moderator item approve itm-3f2\n  tsw --as bob item redeem itm-3f2\n  tsw --as bob swap create itm-91c itm-3f2 --message \"Trade?\"\n  tsw doctor\n"
)]
struct Cli {
    /// Enable JSON output
    #[arg(long, global = true)]
    json: bool,

    /// Output format
    #[arg(long, value_enum, global = true)]
    format: Option<FormatArg>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Display timestamps as absolute UTC times
    #[arg(long, global = true)]
    absolute_time: bool,

    /// Directory containing .threadswap (defaults to the current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Act as this user (username or user ID); falls back to THREADSWAP_USER
    #[arg(long = "as", global = true, value_name = "USER")]
    acting_as: Option<String>,

    /// Log level (error, warn, info, debug); overrides config.toml
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum FormatArg {
    Json,
    Table,
    Plain,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Table => OutputFormat::Table,
            FormatArg::Plain => OutputFormat::Plain,
        }
    }
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Initialize a new Threadswap data directory
    Init {
        /// Create an administrator with this username
        #[arg(long)]
        admin: Option<String>,
    },

    /// Manage accounts and bonus points
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Submit, moderate, browse and redeem items
    Item {
        #[command(subcommand)]
        action: ItemAction,
    },

    /// Propose and settle one-for-one swaps
    Swap {
        #[command(subcommand)]
        action: SwapAction,
    },

    /// Inspect ledgers and refund redemptions
    Ledger {
        #[command(subcommand)]
        action: LedgerAction,
    },

    /// Show your statistics
    Stats {
        /// Show platform-wide totals instead (admin only)
        #[arg(long)]
        platform: bool,
    },

    /// Audit balances, ledger entries, items and swaps
    Doctor,

    /// Run the MCP server on stdio
    Serve {
        /// Disable mutating tools
        #[arg(long)]
        read_only: bool,

        /// Write JSON logs to this file instead of stderr
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = RepoContext::discover(cli.root.as_deref())
        .and_then(|repo| repo.load_config())
        .ok();

    let format = match (cli.json, cli.format) {
        (true, _) => OutputFormat::Json,
        (false, Some(format)) => format.into(),
        (false, None) => config
            .as_ref()
            .map(|config| config.output_format)
            .unwrap_or_default(),
    };
    let use_color = !cli.no_color && should_use_color();
    let formatter = create_formatter(format, use_color, cli.absolute_time);

    // The MCP server installs its own JSON subscriber.
    if !matches!(cli.command, Some(Commands::Serve { .. })) {
        let level = cli
            .log_level
            .clone()
            .or_else(|| config.as_ref().map(|config| config.log_level.clone()))
            .unwrap_or_else(|| "warn".to_string());
        init_tracing(&level);
    }

    match run(cli, formatter.as_ref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let rendered = formatter.format_error(&err);
            if format == OutputFormat::Json {
                println!("{}", rendered);
            } else {
                eprintln!("{}", rendered);
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli, formatter: &dyn OutputFormatter) -> anyhow::Result<()> {
    let Cli {
        root,
        acting_as,
        log_level,
        command,
        ..
    } = cli;
    let session = || Session::open(root.as_deref(), acting_as.clone());

    match command {
        Some(Commands::Init { admin }) => {
            let root = match &root {
                Some(root) => root.clone(),
                None => std::env::current_dir()?,
            };
            commands::init::execute(&root, admin, formatter)
        }
        Some(Commands::User { action }) => commands::user::execute(&session()?, action, formatter),
        Some(Commands::Item { action }) => commands::item::execute(&session()?, action, formatter),
        Some(Commands::Swap { action }) => commands::swap::execute(&session()?, action, formatter),
        Some(Commands::Ledger { action }) => {
            commands::ledger::execute(&session()?, action, formatter)
        }
        Some(Commands::Stats { platform }) => {
            commands::stats::execute(&session()?, platform, formatter)
        }
        Some(Commands::Doctor) => commands::doctor::execute(&session()?, formatter),
        Some(Commands::Serve {
            read_only,
            log_file,
        }) => commands::serve::execute(
            root.clone(),
            read_only,
            log_level.unwrap_or_else(|| "info".to_string()),
            log_file,
        ),
        None => {
            println!("Use --help for usage information");
            Ok(())
        }
    }
}

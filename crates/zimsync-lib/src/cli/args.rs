use crate::transfer::MatcherDef;
use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use tracing::Level;

#[derive(Debug, Clone)]
pub enum Command {
    Verify(SyncArgs),
    Download(SyncArgs),
}

#[derive(Debug, Clone, Default)]
pub struct SyncArgs {
    pub config_path: Option<String>,
    pub source_url: Option<String>,
    pub output_dir: Option<String>,
    pub deny: Vec<MatcherDef>,
    pub connect_timeout_secs: Option<u64>,
    pub read_timeout_secs: Option<u64>,
    pub dry_run: bool,
}

pub struct Args {
    pub command: Command,
    pub log_level: Level,
}

#[derive(Debug, Parser)]
#[command(
    name = "zimsync",
    version,
    about = "Mirror the ZIM archives linked from a web index page and keep local copies complete"
)]
struct Cli {
    #[arg(
        short = 'v',
        long = "verbose",
        help = "Sets the level of verbosity",
        action = ArgAction::Count,
        global = true
    )]
    verbose: u8,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Check every listed archive against its remote size and refetch missing or incomplete ones
    Verify(CliSyncArgs),

    /// Download listed archives that are not present locally, trusting existing files
    Download(CliSyncArgs),
}

#[derive(Debug, ClapArgs)]
struct CliSyncArgs {
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Optional config file (YAML, TOML or JSON)"
    )]
    config: Option<String>,

    #[arg(
        short = 'u',
        long = "url",
        value_name = "URL",
        help = "Index page listing the archives (overrides source_url from the config)"
    )]
    url: Option<String>,

    #[arg(
        short = 'o',
        long = "output-dir",
        value_name = "DIR",
        help = "Directory archives are stored in (default: output.path from the config, else the current directory)"
    )]
    output_dir: Option<String>,

    #[arg(
        short = 'd',
        long = "deny",
        value_name = "MATCHER",
        help = "Never download URLs matching this entry: contains:<s>, prefix:<s>, regex:<re>, or a bare substring (repeatable, appended to the config denylist)",
        action = ArgAction::Append
    )]
    deny: Vec<MatcherDef>,

    #[arg(
        long = "connect-timeout",
        value_name = "SECS",
        help = "Connection timeout in seconds"
    )]
    connect_timeout: Option<u64>,

    #[arg(
        long = "read-timeout",
        value_name = "SECS",
        help = "Abort a transfer when no data arrives for this many seconds"
    )]
    read_timeout: Option<u64>,

    #[arg(
        short = 'n',
        long = "dry-run",
        help = "Report what would be done without deleting or downloading anything"
    )]
    dry_run: bool,
}

impl From<CliSyncArgs> for SyncArgs {
    fn from(args: CliSyncArgs) -> Self {
        Self {
            config_path: args.config,
            source_url: args.url,
            output_dir: args.output_dir,
            deny: args.deny,
            connect_timeout_secs: args.connect_timeout,
            read_timeout_secs: args.read_timeout,
            dry_run: args.dry_run,
        }
    }
}

pub fn parse_args() -> Args {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy()
                .add_directive("hyper_util=info".parse().unwrap())
                .add_directive("h2=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let command = match cli.command {
        CliCommand::Verify(args) => Command::Verify(args.into()),
        CliCommand::Download(args) => Command::Download(args.into()),
    };

    Args { command, log_level }
}

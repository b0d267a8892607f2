use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crumb::crumb::Section;
use crumb::depth::CompressionDepth;
use crumb::logging::{LogFormat, init_logging};

mod cmd;

#[derive(Parser)]
#[command(name = "crumb")]
#[command(version, about = "Compress AI conversations into portable crumb files")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log line format (logs go to stderr)
    #[arg(long, value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormat,

    /// Path to crumb.toml. Defaults to $CRUMB_HOME/crumb.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compress a conversation into a crumb file
    Compress {
        /// Conversation transcript ("-" or omitted reads stdin)
        input: Option<PathBuf>,

        /// Compression depth: snapshot, memory, full
        #[arg(short, long)]
        depth: Option<CompressionDepth>,

        /// Credential slot to use (1, 2 or 3)
        #[arg(short, long)]
        server: Option<usize>,

        /// Merge into an existing crumb file instead of starting fresh
        #[arg(short, long)]
        update: Option<PathBuf>,

        /// Write the crumb file here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Do not record the result in the vault
        #[arg(long)]
        no_save: bool,
    },
    /// Show the sections, tagged lines and confidence of a crumb file
    Inspect {
        file: PathBuf,

        /// Only print this section (e.g. mission, dead-ends, next-step)
        #[arg(long)]
        section: Option<Section>,
    },
    /// Show statistics for a conversation transcript
    Stats {
        /// Conversation transcript ("-" or omitted reads stdin)
        input: Option<PathBuf>,
    },
    /// Browse saved crumb files
    Vault {
        #[command(subcommand)]
        command: VaultCommands,
    },
    /// Run the HTTP compression endpoint
    Serve {
        /// Port to serve on (defaults to the [server] port in crumb.toml)
        #[arg(short, long)]
        port: Option<u16>,

        /// Enable dev mode (CORS permissive for a local frontend)
        #[arg(long)]
        dev: bool,
    },
    /// View or initialize configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum VaultCommands {
    /// List saved crumb files, newest first
    List,
    /// Print a saved crumb file
    Show { id: String },
    /// Remove a saved crumb file
    Delete { id: String },
    /// Write a saved crumb file to crumb-<timestamp>.md
    Export {
        id: String,

        /// Directory to write into (defaults to the current directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Initialize a default crumb.toml file
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_format);

    match &cli.command {
        Commands::Compress {
            input,
            depth,
            server,
            update,
            output,
            no_save,
        } => {
            cmd::cmd_compress(
                &cli,
                cmd::CompressArgs {
                    input: input.as_deref(),
                    depth: *depth,
                    server: *server,
                    update: update.as_deref(),
                    output: output.as_deref(),
                    save: !*no_save,
                },
            )
            .await?
        }
        Commands::Inspect { file, section } => cmd::cmd_inspect(file, *section)?,
        Commands::Stats { input } => cmd::cmd_stats(input.as_deref())?,
        Commands::Vault { command } => cmd::cmd_vault(&cli, command.clone())?,
        Commands::Serve { port, dev } => cmd::cmd_serve(&cli, *port, *dev).await?,
        Commands::Config { command } => cmd::cmd_config(&cli, command.clone())?,
    }

    Ok(())
}

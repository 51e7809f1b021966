use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mirrorgate::cli::{Commands, run_serve, run_sync, run_sync_keys, run_sync_repos};
use mirrorgate::config::{DEFAULT_CONFIG_FILE, MirrorConfig};

#[derive(Parser)]
#[command(name = "mirrorgate", version)]
#[command(about = "Serve GitLab mirrors over a restricted SSH forced command", long_about = None)]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Configuration file
    #[arg(long, short, global = true, env = "MIRRORGATE_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

fn init_tracing(directive: &str) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .init();
    Ok(())
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version go to stdout with success; everything else is a usage error.
            let code = if err.use_stderr() { 1 } else { 0 };
            err.print()?;
            return Ok(ExitCode::from(code));
        }
    };

    init_tracing(cli.command.log_directive())?;

    let config = MirrorConfig::load(&cli.config)?;

    match cli.command {
        Commands::Serve { user_id } => return run_serve(&config, user_id),
        Commands::Sync => run_sync(&config)?,
        Commands::SyncKeys => run_sync_keys(&config)?,
        Commands::SyncRepos => run_sync_repos(&config)?,
    }

    Ok(ExitCode::SUCCESS)
}

use std::process;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use playport::{cli, config::Config, error, logger::SessionLog};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Also append every message to the session log file (LOG_FILE)
    #[clap(long, global = true)]
    log: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Export Spotify playlists and recreate them on YouTube Music
    Migrate,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    let config = match Config::load().await {
        Ok(config) => config,
        Err(e) => {
            error!("Cannot load configuration. Err: {}", e);
            process::exit(1);
        }
    };

    let log = SessionLog::new(cli.log.then(|| config.log_file.clone()));

    let result = match cli.command {
        Command::Auth => cli::auth(&config, &log).await,
        Command::Migrate => cli::migrate(&config, &log).await,
        Command::Completions(_) => Ok(()),
    };

    if let Err(e) = result {
        log.error(e.to_string());
        process::exit(1);
    }
}

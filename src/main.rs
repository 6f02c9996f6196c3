use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use podcastify::{cli, config, warning};

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
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Log in to Spotify and show the authenticated user
    Auth(AuthOptions),

    /// List the unique episodes known to the scraping provider
    Episodes(EpisodesOptions),

    /// List the music played in one episode
    Tracks(TracksOptions),

    /// Add the music played in every episode to the playlist
    Sync(SyncOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct AuthOptions {
    /// Print the login URL instead of opening a browser
    #[clap(long)]
    pub no_browser: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct EpisodesOptions {
    /// Ask the scraping provider for a fresh crawl
    #[clap(long)]
    pub run_now: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct TracksOptions {
    /// Episode link as listed by `episodes`
    pub link: String,

    /// Ask the scraping provider for a fresh crawl
    #[clap(long)]
    pub run_now: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct SyncOptions {
    /// Ask the scraping provider for a fresh crawl
    #[clap(long)]
    pub run_now: bool,

    /// Search and check the playlist, but never add tracks
    #[clap(long)]
    pub dry_run: bool,

    /// Print the login URL instead of opening a browser
    #[clap(long)]
    pub no_browser: bool,

    /// Target playlist (overrides SPOTIFY_PLAYLIST_ID)
    #[clap(long)]
    pub playlist: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment file. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth(opt) => cli::auth(opt.no_browser).await,
        Command::Episodes(opt) => cli::episodes(opt.run_now).await,
        Command::Tracks(opt) => cli::tracks(opt.link, opt.run_now).await,
        Command::Sync(opt) => {
            cli::sync(opt.run_now, opt.dry_run, opt.no_browser, opt.playlist).await
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};

use crate::auth::{self, User};
use crate::client::{ApiError, GameClient, GameLocator};
use crate::game;

/// Overrides the prod/test server choice when set.
const SERVER_ENV_VAR: &str = "GH_WORDLE_SERVER";

#[derive(Parser)]
#[command(name = "wordle", version, about = "Play the daily Wordle on an org or repo")]
struct Cli {
    /// Org or org/repo hosting the game
    locator: String,

    /// Target the test server instead of production
    #[arg(long, global = true)]
    test: bool,

    /// Game server host[:port] (overrides --test and the default)
    #[arg(long, global = true)]
    server: Option<String>,

    /// GitHub token (overrides env vars; use '-' to read from stdin)
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show today's game so far
    Status,
    /// Submit a guess
    Guess {
        /// The word to guess
        word: String,
    },
}

fn resolve_identity(cli_token: Option<&str>) -> Result<User> {
    let token = auth::resolve_token_or(cli_token)?;
    auth::resolve_user(&token)
}

fn resolve_server(flag: Option<String>, locator: &GameLocator) -> String {
    resolve_server_with(flag, locator, |k| std::env::var(k))
}

fn resolve_server_with(
    flag: Option<String>,
    locator: &GameLocator,
    env_var: impl Fn(&str) -> Result<String, std::env::VarError>,
) -> String {
    if let Some(server) = flag
        && !server.is_empty()
    {
        return server;
    }
    if let Ok(server) = env_var(SERVER_ENV_VAR)
        && !server.is_empty()
    {
        return server;
    }
    locator.default_server().to_string()
}

// -- command handlers --

fn handle_status(client: &GameClient, locator: &GameLocator) {
    match client.fetch_status(locator) {
        Ok(Some(game)) => {
            game::render(&game);
            match game.status.as_str() {
                "won" => println!("You already won today!"),
                "lost" => println!("Out of guesses. Better luck tomorrow."),
                _ => {}
            }
        }
        Ok(None) => println!("No game running today. Yet..."),
        Err(e) => print_client_error(&e),
    }
}

fn handle_guess(client: &GameClient, locator: &GameLocator, word: &str) {
    match client.submit_guess(locator, word) {
        Ok(Some(game)) => {
            if let Some(latest) = game.guesses.last() {
                println!("{}", game::comment_for(latest));
            }
            game::render(&game);
        }
        Ok(None) => println!("Hmmm, that was an invalid guess"),
        Err(e) => print_client_error(&e),
    }
}

fn print_client_error(e: &ApiError) {
    eprintln!("Error getting your Wordle game");
    eprintln!("{e}");
}

// -- main dispatch --

/// Parse CLI arguments, resolve the caller's identity, and play.
pub fn run<I, T>(args: I) -> Result<ExitCode>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
            e.print().context("failed to print usage")?;
            return Ok(code);
        }
    };

    let user = resolve_identity(cli.token.as_deref())
        .context("Couldn't figure out who you are. Did you log in?")?;

    let locator = GameLocator {
        host: cli.locator,
        test: cli.test,
    };
    let server = resolve_server(cli.server, &locator);
    let client = GameClient::new(&user, server);

    match cli.command {
        Commands::Status => handle_status(&client, &locator),
        Commands::Guess { word } => handle_guess(&client, &locator, &word),
    }
    Ok(ExitCode::SUCCESS)
}

use std::io::Read;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use ureq::Agent;

const ENV_VARS: &[&str] = &["GH_TOKEN", "GITHUB_TOKEN"];

const USER_URL: &str = "https://api.github.com/user";
const TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = concat!("gh-wordle/", env!("CARGO_PKG_VERSION"));

/// The authenticated GitHub user. Obtained once per invocation and used
/// only to tag game requests.
#[derive(Clone, Debug, Deserialize)]
pub struct User {
    pub id: u64,
    pub login: String,
}

/// Resolve token: CLI flag takes precedence over env vars.
/// Pass `Some("-")` to read from stdin.
pub fn resolve_token_or(cli_token: Option<&str>) -> Result<String> {
    resolve_token_or_with(cli_token, |k| std::env::var(k), std::io::stdin())
}

fn resolve_token_or_with(
    cli_token: Option<&str>,
    env_var: impl Fn(&str) -> Result<String, std::env::VarError>,
    stdin: impl Read,
) -> Result<String> {
    if let Some(token) = cli_token {
        if token == "-" {
            return read_token_from_reader(stdin);
        }
        let trimmed = token.trim();
        anyhow::ensure!(!trimmed.is_empty(), "--token value must not be empty");
        return Ok(trimmed.to_string());
    }
    resolve_token_with(env_var)
}

fn read_token_from_reader(mut reader: impl Read) -> Result<String> {
    let mut buf = String::new();
    reader
        .read_to_string(&mut buf)
        .context("failed to read token from stdin")?;
    let trimmed = buf.trim().to_string();
    anyhow::ensure!(!trimmed.is_empty(), "stdin was empty; expected a token");
    Ok(trimmed)
}

fn resolve_token_with(
    env_var: impl Fn(&str) -> Result<String, std::env::VarError>,
) -> Result<String> {
    for var in ENV_VARS {
        if let Ok(val) = env_var(var)
            && !val.is_empty()
        {
            return Ok(val);
        }
    }

    bail!("No GitHub token found. Set one of: {}", ENV_VARS.join(", "))
}

/// Look up who the token belongs to. One shot, no retries.
pub fn resolve_user(token: &str) -> Result<User> {
    let agent: Agent = Agent::config_builder()
        .timeout_global(Some(TIMEOUT))
        .http_status_as_error(false)
        .build()
        .into();

    let mut resp = agent
        .get(USER_URL)
        .header("Authorization", &format!("Bearer {token}"))
        .header("Accept", "application/vnd.github+json")
        .header("User-Agent", USER_AGENT)
        .call()
        .context("identity lookup failed")?;
    let status = resp.status().as_u16();
    let text = resp
        .body_mut()
        .read_to_string()
        .context("failed to read identity response")?;
    parse_user(status, &text)
}

fn parse_user(status: u16, text: &str) -> Result<User> {
    if !(200..300).contains(&status) {
        bail!("identity lookup failed ({status}): {text}");
    }
    serde_json::from_str(text).context("identity endpoint sent an unexpected response")
}

use std::time::Duration;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use thiserror::Error;
use ureq::{Agent, http};

use crate::auth::User;
use crate::game::GameState;

pub const PROD_HOST: &str = "extendocompute.eastus.cloudapp.azure.com:3000";
pub const TEST_HOST: &str = "extendotest.eastus.cloudapp.azure.com:3000";

const TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = concat!("gh-wordle/", env!("CARGO_PKG_VERSION"));

const LOGIN_HEADER: &str = "Extendo-ActorLogin";
const ID_HEADER: &str = "Extendo-ActorId";

/// Characters that must be percent-encoded in a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS.add(b' ').add(b'#').add(b'%').add(b'/').add(b'?');

fn encode_path(s: &str) -> String {
    utf8_percent_encode(s, PATH_SEGMENT).to_string()
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("couldn't reach the game server: {0}")]
    Network(#[source] Box<ureq::Error>),
    #[error("game server error ({status}): {body}")]
    Server { status: u16, body: String },
    #[error("game server sent a response that couldn't be decoded: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Which game to target: an `org` or `org/repo`, and prod vs test server.
#[derive(Clone, Debug)]
pub struct GameLocator {
    pub host: String,
    pub test: bool,
}

impl GameLocator {
    fn kind(&self) -> &'static str {
        if self.host.contains('/') { "repos" } else { "orgs" }
    }

    pub fn default_server(&self) -> &'static str {
        if self.test { TEST_HOST } else { PROD_HOST }
    }
}

pub struct GameClient {
    agent: Agent,
    server: String,
    login: String,
    id: u64,
}

impl GameClient {
    pub fn new(user: &User, server: String) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(TIMEOUT))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            server,
            login: user.login.clone(),
            id: user.id,
        }
    }

    /// Fetch today's game. `None` means no game is running yet.
    pub fn fetch_status(&self, locator: &GameLocator) -> Result<Option<GameState>, ApiError> {
        let url = format!("{}/status", self.game_url(locator));
        let resp = self
            .agent
            .get(&url)
            .header(LOGIN_HEADER, &self.login)
            .header(ID_HEADER, &self.id.to_string())
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| ApiError::Network(Box::new(e)))?;
        handle_response(resp)
    }

    /// Submit a guess. `None` means the server rejected it (or there is no game).
    pub fn submit_guess(
        &self,
        locator: &GameLocator,
        word: &str,
    ) -> Result<Option<GameState>, ApiError> {
        let url = format!("{}/{}", self.game_url(locator), encode_path(word));
        let resp = self
            .agent
            .post(&url)
            .header(LOGIN_HEADER, &self.login)
            .header(ID_HEADER, &self.id.to_string())
            .header("User-Agent", USER_AGENT)
            .send_empty()
            .map_err(|e| ApiError::Network(Box::new(e)))?;
        handle_response(resp)
    }

    fn game_url(&self, locator: &GameLocator) -> String {
        format!(
            "http://{}/rest/{}/{}/wordle",
            self.server,
            locator.kind(),
            locator.host
        )
    }
}

fn handle_response(mut resp: http::Response<ureq::Body>) -> Result<Option<GameState>, ApiError> {
    let status = resp.status().as_u16();
    let text = resp
        .body_mut()
        .read_to_string()
        .map_err(|e| ApiError::Network(Box::new(e)))?;
    interpret_response(status, &text)
}

fn interpret_response(status: u16, body: &str) -> Result<Option<GameState>, ApiError> {
    // The server answers 400 both for "no playable game" and "guess rejected";
    // the two are indistinguishable on the wire.
    if status == 400 {
        return Ok(None);
    }
    if !(200..300).contains(&status) {
        return Err(ApiError::Server {
            status,
            body: body.to_string(),
        });
    }
    serde_json::from_str(body).map(Some).map_err(ApiError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(server: &str) -> GameClient {
        let user = User {
            id: 42,
            login: "alice".to_string(),
        };
        GameClient::new(&user, server.to_string())
    }

    fn locator(host: &str) -> GameLocator {
        GameLocator {
            host: host.to_string(),
            test: false,
        }
    }

    // -- URL composition --

    #[test]
    fn org_locator_uses_orgs_path() {
        let url = client(PROD_HOST).game_url(&locator("my-org"));
        assert_eq!(
            url,
            "http://extendocompute.eastus.cloudapp.azure.com:3000/rest/orgs/my-org/wordle"
        );
    }

    #[test]
    fn org_repo_locator_uses_repos_path() {
        let url = client(PROD_HOST).game_url(&locator("my-org/my-repo"));
        assert_eq!(
            url,
            "http://extendocompute.eastus.cloudapp.azure.com:3000/rest/repos/my-org/my-repo/wordle"
        );
    }

    #[test]
    fn default_server_honors_test_flag() {
        let mut loc = locator("my-org");
        assert_eq!(loc.default_server(), PROD_HOST);
        loc.test = true;
        assert_eq!(loc.default_server(), TEST_HOST);
    }

    #[test]
    fn encode_path_preserves_safe_chars() {
        assert_eq!(encode_path("tears"), "tears");
    }

    #[test]
    fn encode_path_encodes_unsafe_chars() {
        assert_eq!(encode_path("a/b?c#d e"), "a%2Fb%3Fc%23d%20e");
    }

    // -- response interpretation --

    #[test]
    fn bad_request_is_no_game_not_an_error() {
        let result = interpret_response(400, "").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn server_error_surfaces_status_and_body() {
        let err = interpret_response(500, "boom").unwrap_err();
        match err {
            ApiError::Server { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected Server error, got {other:?}"),
        }
    }

    #[test]
    fn not_found_is_a_server_error() {
        assert!(matches!(
            interpret_response(404, "").unwrap_err(),
            ApiError::Server { status: 404, .. }
        ));
    }

    #[test]
    fn success_parses_game_state() {
        let body = r#"{"status": "running", "guesses": [{"guess": "tears", "matches": ["gray","yellow","green","gray","gray"], "isMatch": false}]}"#;
        let game = interpret_response(200, body).unwrap().unwrap();
        assert_eq!(game.status, "running");
        assert_eq!(game.guesses.len(), 1);
        assert_eq!(game.guesses[0].guess, "tears");
    }

    #[test]
    fn garbage_body_is_a_decode_error() {
        let err = interpret_response(200, "<!doctype html>").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn decode_and_server_errors_read_differently() {
        let decode = interpret_response(200, "nope").unwrap_err().to_string();
        let server = interpret_response(502, "nope").unwrap_err().to_string();
        assert!(decode.contains("decoded"));
        assert!(server.contains("502"));
    }
}

use colored::{ColoredString, Colorize};
use serde::Deserialize;

/// Per-letter feedback: green = right spot, yellow = wrong spot, gray = absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    Green,
    Yellow,
    Gray,
}

#[derive(Clone, Debug, Deserialize)]
pub struct GuessResult {
    pub guess: String,
    pub matches: Vec<Mark>,
    #[serde(rename = "isMatch", default)]
    pub is_match: bool,
}

/// The server's view of today's game. The client only displays it.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GameState {
    #[serde(default)]
    pub guesses: Vec<GuessResult>,
    #[serde(default)]
    pub status: String,
}

/// A short reaction to the latest guess, scored 2 per green and 1 per yellow.
pub fn comment_for(latest: &GuessResult) -> &'static str {
    if latest.is_match {
        return "Awesome! You won!";
    }
    let score: u32 = latest
        .matches
        .iter()
        .map(|m| match m {
            Mark::Green => 2,
            Mark::Yellow => 1,
            Mark::Gray => 0,
        })
        .sum();
    if score > 6 {
        "Pretty good. You're getting there"
    } else if score > 3 {
        "Not too shabby."
    } else {
        "Bummer. Try something like 'tears'"
    }
}

fn styled(mark: Mark, letter: char) -> ColoredString {
    let letter = letter.to_string();
    match mark {
        Mark::Green => letter.green(),
        Mark::Yellow => letter.yellow(),
        Mark::Gray => letter.bright_black(),
    }
}

fn guess_line(guess: &GuessResult) -> String {
    guess
        .guess
        .chars()
        .zip(guess.matches.iter())
        .map(|(letter, mark)| format!(" {}", styled(*mark, letter)))
        .collect()
}

/// Print the board, one colorized line per guess in order.
pub fn render(game: &GameState) {
    for guess in &game.guesses {
        println!("{}", guess_line(guess));
    }
}

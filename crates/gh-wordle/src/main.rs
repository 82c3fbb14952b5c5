use std::process::ExitCode;

fn main() -> ExitCode {
    match gh_wordle::run(std::env::args()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

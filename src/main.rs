use std::process::ExitCode;

fn main() -> ExitCode {
    match precedence::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            precedence::ui::output::error(format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

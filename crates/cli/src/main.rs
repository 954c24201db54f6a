use std::process::ExitCode;

fn main() -> ExitCode {
    octopilot_cli::run()
}

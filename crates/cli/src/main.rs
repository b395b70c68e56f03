use std::process::ExitCode;

fn main() -> ExitCode {
    spendlens_cli::run()
}

use std::process::ExitCode;

fn main() -> ExitCode {
    kinship::cli::run()
}

//! mcol - Inspect and exercise board column values

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = moncli_columns::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

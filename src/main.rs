//! CLI entry point for the textget tool.

use clap::Parser;
use clap::error::ErrorKind;
use textget_core::FailureCode;

mod app;
mod cli;

use app::exit_handler::ProcessExit;
use cli::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => FailureCode::InvalidArguments.code(),
            };
            std::process::exit(code);
        }
    };

    let exit = match app::runtime::run_textget(args).await {
        Ok(exit) => exit,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ProcessExit::Failed(FailureCode::Internal)
        }
    };
    std::process::exit(exit.code());
}

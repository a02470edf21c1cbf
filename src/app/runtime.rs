use anyhow::{Context, Result};
use textget_core::{
    DownloadError, Downloader, FailureCode, Target, destination_file_name, destination_path,
    ensure_absent,
};
use tracing::{debug, info, warn};

use crate::app::exit_handler::{self, ProcessExit};
use crate::app::terminal;
use crate::cli::Args;

pub(crate) async fn run_textget(args: Args) -> Result<ProcessExit> {
    let default_level = terminal::resolve_default_log_level(args.verbose, args.quiet);
    terminal::init_tracing(default_level, terminal::is_no_color_requested());

    debug!(?args, "CLI arguments parsed");

    if destination_file_name(&args.path).is_none() {
        eprintln!("Error: path '{}' does not name a file", args.path);
        return Ok(ProcessExit::Failed(FailureCode::InvalidArguments));
    }

    let config = args.download_config();

    // The local file is checked before any network traffic.
    let destination = match destination_path(&config.output_dir, &args.path)
        .and_then(|path| ensure_absent(&path).map(|()| path))
    {
        Ok(path) => path,
        Err(err) => return Ok(report_failure(&err)),
    };
    debug!(destination = %destination.display(), "Destination is free");

    let downloader = match Downloader::new(config) {
        Ok(downloader) => downloader,
        Err(err) => {
            eprintln!("Error: {err}");
            return Ok(ProcessExit::Failed(FailureCode::InvalidArguments));
        }
    };

    let target = Target::new(args.server, args.path);
    let shutdown = shutdown_signal()?;

    let result = downloader.fetch_until(&target, shutdown).await;
    let exit = exit_handler::determine_exit_outcome(&result);
    match result {
        Ok(report) => {
            info!(
                path = %report.path.display(),
                bytes = report.body_bytes,
                "Download complete"
            );
        }
        Err(err) => {
            if matches!(err, DownloadError::Interrupted { .. }) {
                warn!("Interrupted, download abandoned");
            }
            report_failure(&err);
        }
    }
    Ok(exit)
}

fn report_failure(err: &DownloadError) -> ProcessExit {
    eprintln!("Error: {err}");
    ProcessExit::Failed(err.failure_code())
}

/// Resolves when the process receives Ctrl-C or, on Unix, SIGTERM.
fn shutdown_signal() -> Result<impl std::future::Future<Output = ()>> {
    #[cfg(unix)]
    let mut terminate =
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .context("failed to install SIGTERM handler")?;

    Ok(async move {
        #[cfg(unix)]
        {
            tokio::select! {
                result = tokio::signal::ctrl_c() => {
                    if let Err(err) = result {
                        warn!(error = %err, "Ctrl-C handler failed");
                        std::future::pending::<()>().await;
                    }
                }
                _ = terminate.recv() => {}
            }
        }
        #[cfg(not(unix))]
        {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!(error = %err, "Ctrl-C handler failed");
                std::future::pending::<()>().await;
            }
        }
    })
}

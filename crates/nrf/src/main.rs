mod config;
mod error;
mod run;
mod signal;

use std::fmt;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use tracing_subscriber::fmt::time::FormatTime;

struct Elapsed(Instant);

impl FormatTime for Elapsed {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> fmt::Result {
        let d = self.0.elapsed();
        let total_secs = d.as_secs();
        let mins = total_secs / 60;
        let secs = total_secs % 60;
        let millis = d.subsec_millis();
        write!(w, "[{mins:02}:{secs:02}:{millis:03}]")
    }
}

/// Network redundancy fault-injector.
///
/// Groups non-loopback interfaces by IPv4 subnet and keeps taking a random
/// subset of each subnet out of service for `NRF_BOUNCE_SEC` seconds
/// (default 20). SIGINT or SIGTERM restores every interface before exit.
#[derive(Parser)]
#[command(name = "nrf", version)]
struct Cli {
    #[command(flatten)]
    run: run::RunArgs,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_timer(Elapsed(Instant::now()))
        .init();

    let cli = Cli::parse();

    match run::run(cli.run).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

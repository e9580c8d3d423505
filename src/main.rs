use std::panic;
use std::process::ExitCode;

use clap::Parser;

use rusty_dashboard::app;
use rusty_dashboard::config::Args;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    match panic::catch_unwind(|| app::run(&args)) {
        Ok(Ok(path)) => {
            log::info!("Analysis complete! Dashboard saved to: {}", path.display());
            println!("Open {} in your web browser to view the dashboard", path.display());
            ExitCode::SUCCESS
        }
        Ok(Err(e)) => {
            log::error!("Analysis failed: {e}");
            ExitCode::FAILURE
        }
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            log::error!("Unexpected error: {reason}");
            ExitCode::FAILURE
        }
    }
}

//! Headless entry point: replays a JSON script against the drawing engine.

use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        eprintln!("usage: sketchpad <script.json>");
        return ExitCode::from(2);
    };

    log::info!("Starting Sketchpad with {}", path.display());
    match sketchpad_app::run_script_file(&path) {
        Ok(report) => {
            for export in &report.exports {
                println!("{}", export.display());
            }
            log::info!(
                "{} commands replayed, {} snapshots auto-saved",
                report.commands,
                report.autosaved
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

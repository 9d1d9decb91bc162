use std::process::ExitCode;

use ledge_engine::run_app;
use tracing::error;

use super::bootstrap::AppWiring;

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let AppWiring {
        config,
        start_level,
        tuning,
        navigator,
    } = app;
    let build_simulation = move |viewport| start_level.into_simulation(tuning, viewport);

    if let Err(err) = run_app(config, build_simulation, navigator) {
        error!(error = %err, "startup_failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

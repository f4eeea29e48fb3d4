use std::process::ExitCode;

use tracing::error;

use cadshell::{cli::Cli, platform::linux};

fn main() -> ExitCode {
    cadshell::logging::init();
    let cli = Cli::from_args(std::env::args_os());

    match linux::run(&cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            // Startup failed before or during the main loop.
            error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}

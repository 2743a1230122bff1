use ostress_core::logging::LogHandle;

mod cli;

use crate::cli::CliCommand;

fn main() {
    // Built once here; every thread that logs enters it.
    let log = LogHandle::stdout();
    let code = {
        let _guard = log.enter();
        match CliCommand::run_from_args(&log) {
            Ok(()) => 0,
            Err(err) => {
                tracing::error!("{:#}", err);
                eprintln!("ostress error: {:#}", err);
                1
            }
        }
    };
    std::process::exit(code);
}

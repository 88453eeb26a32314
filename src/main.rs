use ork::logger::{Logger, StdLogger};
use ork::runner::CancellationToken;
use std::process;

fn main() {
    let logger = StdLogger::new();
    let cancel = CancellationToken::new();

    // C-c sets the flag; the running child receives the signal through the
    // process group and the engine declines to start further work
    let handler_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.fire()) {
        logger.error(&format!("failed to install signal handler: {e}"));
        process::exit(1);
    }

    let args: Vec<String> = std::env::args().collect();
    if let Err(e) = ork::cli::run_app(args, &logger, &cancel) {
        logger.error(&e.to_string());
        process::exit(1);
    }
}

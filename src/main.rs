use gedai_log::init::startup_from_env;
use std::process::ExitCode;

fn main() -> ExitCode {
    let logger = match startup_from_env() {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("failed to build logger: {}", e);
            return ExitCode::FAILURE;
        }
    };

    logger.info("Hi there! I`m a log kind of INFO ...");

    logger.warn("Hey pay attention! I`m a log kind of WARN :o ...");

    // Labelled ERR but emitted at WARN; kept as-is until the owner of the
    // log contract decides otherwise.
    logger.warn("OH NO! I`m a log kind of ERR :o ...");

    let _ = logger.sync();
    ExitCode::SUCCESS
}

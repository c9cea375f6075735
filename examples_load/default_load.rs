use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use gedai_log::init::init_tracing;
use gedai_log::noop_sink::NoopSink;
use gedai_log::{Logger, LoggerConfig};

fn main() {
    let logger = Logger::with_sinks(LoggerConfig::default(), Arc::new(NoopSink), Arc::new(NoopSink))
        .unwrap_or_else(|e| {
            eprintln!("failed to build logger: {}", e);
            std::process::exit(1);
        });

    let n: u64 = 100_000;

    let start = Instant::now();
    for i in 0..n {
        logger.emit(gedai_log::Level::Info, "direct load test", &[("iteration", i.into())]);
    }
    report("direct", n, start);

    if let Err(e) = init_tracing(logger.clone()) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let start = Instant::now();
    for i in 0..n {
        if i % 10 == 0 {
            error!(iteration = i, "tracing load test error");
        } else {
            info!(iteration = i, "tracing load test");
        }
    }
    report("tracing", n, start);

    println!("{:?}", logger.stats());
}

fn report(label: &str, n: u64, start: Instant) {
    let elapsed = start.elapsed();
    println!(
        "{}: encoded {} records in {:?} (~{:.0} rec/s)",
        label,
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
}

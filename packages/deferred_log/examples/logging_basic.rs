//! Loggers writing through background sink workers, with a custom template.

use deferred_log::{LogRegistry, Severity};

fn main() {
    let registry = LogRegistry::new();

    let engine = registry.logger("engine");
    let network = registry.logger("network");

    engine.info("engine spun up");
    network.info("listening on 0.0.0.0:7000");

    network.set_template("{time}s {component} | {level} | {message}");
    network.warn("peer sent malformed frame");

    engine.set_max_severity(Severity::Warn);
    engine.info("this line is suppressed");
    engine.error("this one is not");

    // Dropping the loggers and registry stops the sink workers and flushes
    // every queued record before main returns.
    drop(engine);
    drop(network);
    drop(registry);
}

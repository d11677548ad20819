use std::time::Instant;

/// Run `task` and log how long it took at debug level.
pub fn debug_time<T>(label: &str, task: impl FnOnce() -> T) -> T {
    let started = Instant::now();
    let result = task();
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    tracing::debug!(elapsed_ms, "{label} took {elapsed_ms:.3} ms");
    result
}

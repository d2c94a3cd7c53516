use std::time::{Duration, Instant};

/// Granularity at which a silence checks for a stop request.
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Elapsed,
    Cancelled,
}

/// Sleep for `wait_s` seconds in steps of at most `tick`, polling `cancelled`
/// before every step. Returns as soon as a poll reports cancellation.
///
/// Non-positive or non-finite waits still poll once.
pub fn wait(wait_s: f64, tick: Duration, mut cancelled: impl FnMut() -> bool) -> WaitOutcome {
    let span = Duration::try_from_secs_f64(wait_s).unwrap_or(Duration::ZERO);
    let start = Instant::now();
    loop {
        if cancelled() {
            return WaitOutcome::Cancelled;
        }
        let elapsed = start.elapsed();
        if elapsed >= span {
            return WaitOutcome::Elapsed;
        }
        std::thread::sleep((span - elapsed).min(tick));
    }
}

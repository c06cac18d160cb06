use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Install a tracing subscriber that writes through the test harness.
///
/// `quiet` keeps only failures; otherwise captured panics are logged too.
/// The filter is fixed here rather than read from the environment. Calling
/// this more than once in a test binary is harmless: the first subscriber
/// wins.
pub fn init_logging(quiet: bool) {
    let directive = if quiet { "isok=error" } else { "isok=debug" };

    let layer = fmt::layer()
        .with_test_writer()
        .with_target(false)
        .with_filter(EnvFilter::new(directive));

    // Another test may already have installed a subscriber.
    let _ = tracing_subscriber::registry().with(layer).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice() {
        init_logging(false);
        init_logging(true);
        tracing::error!(event = "isok.logging.test", "still works");
    }
}

//! Browser console logging
//!
//! Native hosts use `athena_core::tracing::init_tracing` instead.

/// Route `tracing` events to the browser console
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_browser_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // std time is unavailable in the browser, so timestamps are left off
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(tracing_web::MakeWebConsoleWriter::new());

    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}

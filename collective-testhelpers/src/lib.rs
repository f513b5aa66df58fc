#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![warn(clippy::std_instead_of_alloc)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

use std::sync::LazyLock;
use std::time::Instant;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the log filter, in `Targets` syntax
/// (`collective=trace`, `warn`, ...).
pub const LOG_ENV: &str = "COLLECTIVE_LOG";

static START_TIME: LazyLock<Instant> = LazyLock::new(Instant::now);

struct Uptime;

impl FormatTime for Uptime {
    fn format_time(&self, w: &mut Writer<'_>) -> core::fmt::Result {
        let elapsed = START_TIME.elapsed();
        write!(w, "{:4}.{:03}s", elapsed.as_secs(), elapsed.subsec_millis())
    }
}

fn is_harness_frame(name: &str) -> bool {
    const NOISE: &[&str] = &[
        "test::run_test",
        "test::__rust_begin_short_backtrace",
        "std::panicking::",
        "std::panic::",
        "core::panicking::",
        "std::sys::",
        "core::ops::function::FnOnce::call_once",
        "<alloc::boxed::Box<F,A> as core::ops::function::FnOnce<Args>>::call_once",
        "__pthread",
    ];
    NOISE.iter().any(|prefix| name.starts_with(prefix))
}

fn filter_from_env() -> Targets {
    std::env::var(LOG_ENV)
        .ok()
        .and_then(|s| s.parse::<Targets>().ok())
        .unwrap_or_else(|| Targets::new().with_default(tracing::Level::DEBUG))
}

static SUBSCRIBER_INIT: LazyLock<()> = LazyLock::new(|| {
    let _ = *START_TIME;

    color_backtrace::BacktracePrinter::new()
        .verbosity(color_backtrace::Verbosity::Medium)
        .add_frame_filter(Box::new(|frames| {
            frames.retain(|frame| !frame.name.as_deref().is_some_and(is_harness_frame))
        }))
        .install(Box::new(termcolor::StandardStream::stderr(
            termcolor::ColorChoice::Auto,
        )));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_test_writer()
                .with_timer(Uptime)
                .with_target(true)
                .with_level(true)
                .compact(),
        )
        .with(filter_from_env())
        .try_init()
        .ok();
});

/// Set up logging and panic backtraces for a test.
///
/// Call it first thing in every test; only the first call in a process does
/// anything. Log output goes through the test harness's capture, so it only
/// shows for failing tests (or with `--nocapture`). Filter it with
/// [`LOG_ENV`].
pub fn setup() {
    #[allow(clippy::let_unit_value)]
    let _ = *SUBSCRIBER_INIT;
}

/// An error type that panics when it's built (such as when you use `?`
/// to coerce to it), so tests can use `?` and still point at the failing line.
#[derive(Debug)]
pub struct IPanic;

impl<E> From<E> for IPanic
where
    E: core::error::Error + Send + Sync,
{
    #[track_caller]
    fn from(value: E) -> Self {
        panic!("from: {}: {value}", core::panic::Location::caller())
    }
}

//! Tracing setup. Component: `boxes-cli` diagnostics.
//!
//! Adapted from the teacher's `ox_bin::AppStartup::configure_logging`
//! (`tracing_appender::non_blocking` feeding `tracing_subscriber::fmt`), but
//! writing to stderr instead of a log file: unlike the teacher's TUI, whose
//! stdout is the terminal canvas, this tool's stdout is the actual box
//! output, so diagnostics can never share it.
//!
//! `-x debug:<areas>` (spec.md §6.1) turns on debug-level filtering for the
//! named tracing targets. The targets in this codebase
//! (`input`, `generate`, `detect`, `remove`, `sizing:horiz`, `sizing:vert`)
//! don't correspond to the original tool's five log areas
//! (`MAIN`, `REGEXP`, `PARSER`, `LEXER`, `DISCOVERY` in
//! `examples/original_source/src/logging.c`) since this implementation
//! folds config parsing into `boxes-design` without its own tracing target
//! and splits sizing into horizontal/vertical passes the original didn't
//! separate; `-x debug:<areas>` names targets by this codebase's own scheme.
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Holds the guard returned by `tracing_appender::non_blocking` so buffered
/// log lines are flushed before the process exits.
pub struct LogGuard(#[allow(dead_code)] WorkerGuard);

/// Builds an `EnvFilter` directive string from the debug areas named by
/// `-x debug:<areas>`, e.g. `["generate", "detect"]` -> `"warn,generate=debug,detect=debug"`.
fn filter_directives(areas: &[String]) -> String {
    if areas.is_empty() {
        return "warn".to_string();
    }
    let mut directive = String::from("warn");
    for area in areas {
        directive.push(',');
        directive.push_str(area);
        directive.push_str("=debug");
    }
    directive
}

/// Installs the global tracing subscriber. `areas` comes from `-x debug:...`;
/// an empty slice means no area was requested and only warnings surface.
/// `RUST_LOG`, if set, overrides this entirely (matches the teacher's use of
/// `EnvFilter::from_default_env`-style precedence).
pub fn init(areas: &[String]) -> LogGuard {
    let (nb_writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|v| EnvFilter::try_new(v).ok())
        .unwrap_or_else(|| EnvFilter::new(filter_directives(areas)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(nb_writer)
        .with_target(true)
        .try_init();
    LogGuard(guard)
}

use std::io::{self, IsTerminal};
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, filter, fmt};

/// Target prefixes whose events the layer renders: the workspace crates plus
/// the HTTP request traces emitted by `tower_http`.
pub const TARGET_PREFIXES: &[&str] = &[
    "handbook_qa",
    "ai_llm_service",
    "corpus_store",
    "contextor",
    "api",
    "tower_http",
];

/// RFC3339 UTC timer implemented via `chrono`.
/// Example output: `2025-09-12T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        let s = now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        w.write_str(&s)
    }
}

/// Whether an event target matches one of [`TARGET_PREFIXES`].
pub fn is_workspace_target(target: &str) -> bool {
    TARGET_PREFIXES.iter().any(|p| {
        target == *p
            || target
                .strip_prefix(p)
                .is_some_and(|rest| rest.starts_with("::"))
    })
}

/// Build a formatting layer that renders only events from [`TARGET_PREFIXES`].
///
/// - RFC3339 UTC timestamps
/// - Compact single-line format with `file:line` and target
/// - Span close events (durations of instrumented functions)
/// - ANSI colors only when stdout is a terminal
///
/// Compose it in the binary together with an [`EnvFilter`].
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let use_ansi = io::stdout().is_terminal();
    let only_workspace = filter::filter_fn(|meta| is_workspace_target(meta.target()));

    fmt::layer()
        .with_timer(ChronoRfc3339Utc)
        .with_level(true)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(use_ansi)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .event_format(fmt::format().compact().with_source_location(true))
        .with_filter(only_workspace)
}

/// Level directive for a single workspace crate, e.g. `contextor=debug`.
pub fn level_directive(target: &str, level: Level) -> Option<Directive> {
    let s = format!("{target}={}", level.as_str().to_lowercase());
    Directive::from_str(&s).ok()
}

/// Creates an [`EnvFilter`] from `RUST_LOG`.
///
/// Without `RUST_LOG` the filter is `default` plus `tower_http=debug`, which
/// is the level `TraceLayer` logs requests and responses at.
pub fn env_filter(default: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let base = EnvFilter::new(default);
    match level_directive("tower_http", Level::DEBUG) {
        Some(d) => base.add_directive(d),
        None => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_only_workspace_crates() {
        assert!(is_workspace_target("contextor"));
        assert!(is_workspace_target("contextor::prompt"));
        assert!(is_workspace_target("api::routes::ask"));
        assert!(!is_workspace_target("apiary"));
        assert!(!is_workspace_target("hyper::proto"));
    }

    #[test]
    fn renders_http_request_traces() {
        assert!(is_workspace_target("tower_http::trace::on_request"));
        assert!(is_workspace_target("tower_http::trace::on_response"));
        let d = level_directive("tower_http", Level::DEBUG).unwrap();
        assert_eq!(d.to_string(), "tower_http=debug");
    }

    #[test]
    fn builds_directive() {
        let d = level_directive("contextor", Level::DEBUG).unwrap();
        assert_eq!(d.to_string(), "contextor=debug");
    }
}

use std::sync::Once;

use log::LevelFilter;

/// Filter that turns on the per-flush `trace!` lines of the scheduler while
/// keeping everything else at `info`.
pub const TICK_TRACE_FILTER: &str = "info,cadence_engine::time=trace";

/// Settings for the stderr logger a host binary installs.
///
/// `env_filter` uses `env_logger` directives, e.g. `"cadence_engine=debug"`
/// to see timers being created, started and killed. Left unset, `RUST_LOG`
/// decides, and without that only `info` and above is shown.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self {
            env_filter: Some(filter.into()),
            ..Self::default()
        }
    }

    /// Config that logs every scheduler flush. Very chatty at 60 ticks/s.
    pub fn tick_trace() -> Self {
        Self::with_filter(TICK_TRACE_FILTER)
    }

    fn resolve_filter(&self, rust_log: Option<String>) -> FilterSource {
        match (&self.env_filter, rust_log) {
            (Some(directives), _) => FilterSource::Directives(directives.clone()),
            (None, Some(directives)) => FilterSource::Directives(directives),
            (None, None) => FilterSource::Level(LevelFilter::Info),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum FilterSource {
    Directives(String),
    Level(LevelFilter),
}

static INIT: Once = Once::new();

/// Installs an `env_logger` backend for the `log` calls made by timers and
/// dispatchers.
///
/// Only the first call does anything. If the embedding program already set a
/// global logger this leaves it in place, so libraries and tests that never
/// call it still get their output wherever that logger sends it.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        match config.resolve_filter(std::env::var("RUST_LOG").ok()) {
            FilterSource::Directives(directives) => builder.parse_filters(&directives),
            FilterSource::Level(level) => builder.filter_level(level),
        };
        builder
            .write_style(config.write_style)
            .format_timestamp_millis();

        if builder.try_init().is_err() {
            return;
        }
        log::debug!("logging initialized");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── filter resolution ─────────────────────────────────────────────────

    #[test]
    fn config_filter_beats_rust_log() {
        let config = LoggingConfig::with_filter("cadence_engine=debug");
        assert_eq!(
            config.resolve_filter(Some("warn".into())),
            FilterSource::Directives("cadence_engine=debug".into()),
        );
    }

    #[test]
    fn rust_log_used_when_config_is_silent() {
        let config = LoggingConfig::default();
        assert_eq!(
            config.resolve_filter(Some("trace".into())),
            FilterSource::Directives("trace".into()),
        );
    }

    #[test]
    fn falls_back_to_info() {
        assert_eq!(
            LoggingConfig::default().resolve_filter(None),
            FilterSource::Level(LevelFilter::Info),
        );
    }

    #[test]
    fn tick_trace_targets_scheduler_module() {
        assert_eq!(
            LoggingConfig::tick_trace().env_filter.as_deref(),
            Some(TICK_TRACE_FILTER),
        );
    }

    // ── init ──────────────────────────────────────────────────────────────

    #[test]
    fn repeated_init_is_harmless() {
        init_logging(LoggingConfig::default());
        init_logging(LoggingConfig::tick_trace());
        log::info!("still logging");
    }
}

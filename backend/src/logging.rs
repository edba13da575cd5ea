// Logging module, powered by tracing-subscriber
//
// `tracing_log::LogTracer` bridges the `log::*` macros used across the
// workspace crates into the tracing subscriber.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::path::Path;

use querypad_configs::LoggingSettings;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact text format: timestamp LEVEL target - message
    Compact,
    /// JSON Lines format for structured logging
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" | "jsonl" => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

/// Build the filter directive string from the base level, noisy-crate
/// overrides, and per-target overrides from config.
fn filter_directives(level: &str, target_levels: Option<&HashMap<String, String>>) -> String {
    let mut directives = vec![level.to_string()];

    // Suppress noisy third-party crates
    let noisy: &[(&str, &str)] = &[
        ("actix_server", "warn"),
        ("actix_web", "warn"),
        ("h2", "warn"),
        ("hyper", "warn"),
        ("reqwest", "warn"),
        ("rustls", "warn"),
    ];
    for (target, lvl) in noisy {
        directives.push(format!("{}={}", target, lvl));
    }

    // Per-target overrides from config.toml; sorted so the result is stable
    if let Some(map) = target_levels {
        let mut targets: Vec<_> = map.iter().collect();
        targets.sort();
        for (target, lvl) in targets {
            directives.push(format!("{}={}", target, lvl));
        }
    }

    directives.join(",")
}

fn build_env_filter(
    level: &str,
    target_levels: Option<&HashMap<String, String>>,
) -> anyhow::Result<EnvFilter> {
    let filter_str = filter_directives(level, target_levels);
    EnvFilter::try_new(&filter_str)
        .map_err(|e| anyhow::anyhow!("Invalid tracing filter '{}': {}", filter_str, e))
}

/// Initialize logging from the `[logging]` settings.
///
/// Sets up `tracing-subscriber` with:
///  - Colored console layer (when `log_to_console` is true)
///  - File layer at `<logs_path>/server.log` (compact text or JSON lines)
///  - `tracing_log::LogTracer` bridge so that all `log::*` calls are captured
pub fn init_logging(settings: &LoggingSettings) -> anyhow::Result<()> {
    let log_format = LogFormat::parse(&settings.format);
    let file_path = Path::new(&settings.logs_path).join("server.log");
    let target_levels = Some(&settings.targets);

    fs::create_dir_all(&settings.logs_path)?;
    let log_file = OpenOptions::new().create(true).append(true).open(&file_path)?;

    // ok() in case already initialized
    tracing_log::LogTracer::init().ok();

    let console_layer = if settings.log_to_console {
        Some(
            tracing_subscriber::fmt::layer()
                .with_ansi(true)
                .with_target(true)
                .with_thread_names(true)
                .with_span_events(FmtSpan::CLOSE)
                .with_filter(build_env_filter(&settings.level, target_levels)?),
        )
    } else {
        None
    };

    let file_layer = if log_format == LogFormat::Json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(log_file)
            .with_target(true)
            .with_thread_names(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_span_list(true)
            .with_filter(build_env_filter(&settings.level, target_levels)?)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(log_file)
            .with_target(true)
            .with_thread_names(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(build_env_filter(&settings.level, target_levels)?)
            .boxed()
    };

    tracing_subscriber::registry().with(console_layer).with(file_layer).init();

    tracing::trace!(
        "Logging initialized: level={}, console={}, file={}",
        settings.level,
        settings.log_to_console,
        file_path.display()
    );

    Ok(())
}

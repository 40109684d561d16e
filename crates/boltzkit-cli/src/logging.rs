use crate::error::{CliError, Result};
use std::fs::{self, File};
use std::path::PathBuf;
use tracing_subscriber::{
    EnvFilter,
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

/// Environment variable holding a full filter directive (e.g. `boltzkit=trace`).
/// When set it replaces the level chosen by `-v`/`-q`.
pub const LOG_ENV: &str = "BOLTZKIT_LOG";

fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn build_filter(verbosity: u8, quiet: bool, directive: Option<&str>) -> EnvFilter {
    let fallback = || EnvFilter::default().add_directive(level_filter(verbosity, quiet).into());
    match directive.filter(|d| !d.trim().is_empty()) {
        Some(d) => EnvFilter::try_new(d).unwrap_or_else(|e| {
            eprintln!("Ignoring invalid {}='{}': {}", LOG_ENV, d, e);
            fallback()
        }),
        None => fallback(),
    }
}

/// Installs the global subscriber: compact stderr output plus an optional
/// plain-text log file that also records how long each workflow span ran.
pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    let directive = std::env::var(LOG_ENV).ok();
    let filter = build_filter(verbosity, quiet, directive.as_deref());

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact();

    let subscriber = tracing_subscriber::registry().with(filter).with(stderr_layer);

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let file = File::create(&path).map_err(CliError::Io)?;
            subscriber.with(file_layer(file)).init();
        }
        None => subscriber.init(),
    }

    Ok(())
}

fn file_layer<S>(file: File) -> impl tracing_subscriber::Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_span_events(FmtSpan::CLOSE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tracing::debug;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_filter(0, false), LevelFilter::WARN);
        assert_eq!(level_filter(2, false), LevelFilter::DEBUG);
        assert_eq!(level_filter(7, false), LevelFilter::TRACE);
        assert_eq!(level_filter(3, true), LevelFilter::ERROR);
    }

    fn max_level(filter: EnvFilter) -> Option<LevelFilter> {
        <EnvFilter as tracing_subscriber::Layer<tracing_subscriber::Registry>>::max_level_hint(
            &filter,
        )
    }

    #[test]
    fn env_directive_replaces_verbosity() {
        assert_eq!(
            max_level(build_filter(0, false, Some("boltzkit=trace"))),
            Some(LevelFilter::TRACE)
        );
        assert_eq!(max_level(build_filter(1, false, None)), Some(LevelFilter::INFO));
        assert_eq!(
            max_level(build_filter(1, false, Some("  "))),
            Some(LevelFilter::INFO)
        );
        assert_eq!(
            max_level(build_filter(0, true, Some("boltzkit=loudest"))),
            Some(LevelFilter::ERROR)
        );
    }

    #[test]
    #[serial]
    fn file_layer_records_span_fields_and_close_timing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("boltzkit.log");

        let file = File::create(&log_path).unwrap();
        let subscriber = tracing_subscriber::registry().with(file_layer(file));

        tracing::subscriber::with_default(subscriber, || {
            let span = tracing::info_span!("analysis_workflow", model = 3u32);
            let _guard = span.enter();
            debug!("Staged params.yaml as T1.yaml");
        });

        let content = std::fs::read_to_string(log_path).unwrap();
        assert!(content.contains("Staged params.yaml as T1.yaml"));
        assert!(content.contains("analysis_workflow"));
        assert!(content.contains("model=3"));
        assert!(content.contains("close"));
        assert!(content.contains("ThreadId"));
    }

    #[test]
    #[serial]
    fn directory_as_log_file_is_an_io_error() {
        if cfg!(unix) {
            let result = setup_logging(0, false, Some(PathBuf::from("/")));
            assert!(matches!(result, Err(CliError::Io(_))));
        }
    }
}

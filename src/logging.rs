use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing_appender::non_blocking::{self, WorkerGuard};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};

const DEFAULT_LOG_FORMAT: &str = "pretty";
const DEFAULT_LOG_OUTPUT: &str = "stderr";
const DEFAULT_LOG_FILE_PATH: &str = "logs/gemini-chat.log";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

type InitResult = Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LogOutput {
    Stderr,
    File,
    Both,
}

fn parse_log_format(raw: Option<&str>) -> LogFormat {
    match raw
        .unwrap_or(DEFAULT_LOG_FORMAT)
        .trim()
        .to_ascii_lowercase()
        .as_str()
    {
        "json" => LogFormat::Json,
        _ => LogFormat::Pretty,
    }
}

fn parse_log_output(raw: Option<&str>) -> LogOutput {
    match raw
        .unwrap_or(DEFAULT_LOG_OUTPUT)
        .trim()
        .to_ascii_lowercase()
        .as_str()
    {
        "file" => LogOutput::File,
        "both" => LogOutput::Both,
        _ => LogOutput::Stderr,
    }
}

fn parse_log_file_path(raw: Option<&str>) -> PathBuf {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE_PATH))
}

fn build_file_writer(path: &Path) -> std::io::Result<(non_blocking::NonBlocking, WorkerGuard)> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| std::ffi::OsStr::new("gemini-chat.log"));

    fs::create_dir_all(dir)?;
    let appender = tracing_appender::rolling::daily(dir, file_name);
    Ok(tracing_appender::non_blocking(appender))
}

fn default_directive(log_level: &str, debug: bool) -> String {
    let level = if debug { "debug" } else { log_level };
    format!("warn,gemini_chat={level}")
}

// RUST_LOG still wins when set; --debug wins over LOG_LEVEL.
fn env_filter(log_level: &str, debug: bool) -> EnvFilter {
    if debug {
        return EnvFilter::new(default_directive(log_level, true));
    }
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(log_level, false)))
}

fn stderr_writer() -> BoxMakeWriter {
    BoxMakeWriter::new(std::io::stderr)
}

fn init_with_writer(format: LogFormat, filter: EnvFilter, writer: BoxMakeWriter) -> InitResult {
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(writer)
            .try_init(),
    }
}

fn init_file_output(
    format: LogFormat,
    file_path: &Path,
    include_stderr: bool,
    log_level: &str,
    debug: bool,
) -> InitResult {
    let fallback_message = if include_stderr {
        "using stderr only"
    } else {
        "using stderr instead"
    };

    match build_file_writer(file_path) {
        Ok((file_writer, guard)) => {
            let writer = if include_stderr {
                BoxMakeWriter::new(std::io::stderr.and(file_writer))
            } else {
                BoxMakeWriter::new(file_writer)
            };

            let init_result = init_with_writer(format, env_filter(log_level, debug), writer);
            if init_result.is_ok() {
                let _ = LOG_GUARD.set(guard);
            }
            init_result
        }
        Err(err) => {
            let mode = if include_stderr { "both" } else { "file" };
            eprintln!(
                "gemini-chat: failed to initialize LOG_OUTPUT={} at '{}': {}; {}",
                mode,
                file_path.display(),
                err,
                fallback_message
            );
            init_with_writer(format, env_filter(log_level, debug), stderr_writer())
        }
    }
}

/// Install the global tracing subscriber.
///
/// `log_level` comes from the validated settings; `debug` is the CLI flag.
pub fn init(log_level: &str, debug: bool) {
    let format = parse_log_format(env::var("LOG_FORMAT").ok().as_deref());
    let output = parse_log_output(env::var("LOG_OUTPUT").ok().as_deref());
    let file_path = parse_log_file_path(env::var("LOG_FILE_PATH").ok().as_deref());

    let init_result = match output {
        LogOutput::Stderr => init_with_writer(
            format,
            env_filter(log_level, debug),
            stderr_writer(),
        ),
        LogOutput::File => init_file_output(format, &file_path, false, log_level, debug),
        LogOutput::Both => init_file_output(format, &file_path, true, log_level, debug),
    };

    let _ = init_result;
}

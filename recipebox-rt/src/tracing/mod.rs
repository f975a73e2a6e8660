use recipebox::{GenericConfig, TracingConfig};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{prelude::*, EnvFilter};

use self::logfile_writer::LogFileWriter;

mod logfile_writer;

const LOGFILE_PREFIX: &str = "recipebox-logs";

/// Logs go to stderr, as stdout is reserved for rendered recipes.
/// The returned guard flushes the logfile when dropped and must be kept alive.
pub(super) fn init(config: &GenericConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let tracing_config = TracingConfig::from(config);
    let filter = tracing_config.log_string();

    let (file_layer, guard) = match tracing_config.file() {
        Some(file) => {
            std::fs::create_dir_all(&file.path)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(LogFileWriter::new(
                tracing_appender::rolling::hourly(&file.path, LOGFILE_PREFIX),
                &file.path,
                LOGFILE_PREFIX,
                file.number_of_files,
            ));
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .compact()
                .with_ansi(false)
                .with_line_number(true)
                .with_filter(EnvFilter::new(&filter));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_line_number(true)
                .compact()
                .with_filter(EnvFilter::new(&filter)),
        )
        .with(file_layer)
        .try_init()?;

    match tracing_config.directory() {
        Some(directory) => info!(
            "Recording logs into: {:?}, filter '{filter}'",
            directory.canonicalize()
        ),
        None => info!("Logging to console only, filter '{filter}'"),
    }

    Ok(guard)
}

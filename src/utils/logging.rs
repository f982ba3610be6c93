//! Logger setup for the benchmark binary.

use std::path::Path;

use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming};

use super::error::BenchError;

/// Start the global logger.
///
/// `RUST_LOG` overrides `level`. Without `log_dir` records go to stderr so
/// they never interleave with the result tables on stdout; with it they go
/// to rotating files and warnings are still copied to stderr.
///
/// Keep the returned handle alive for the lifetime of the program.
pub fn setup_logging(level: &str, log_dir: Option<&Path>) -> Result<LoggerHandle, BenchError> {
    let logger = Logger::try_with_env_or_str(level)?;
    let logger = match log_dir {
        Some(dir) => logger
            .log_to_file(FileSpec::default().directory(dir))
            .duplicate_to_stderr(Duplicate::Warn)
            .rotate(
                Criterion::Size(1024 * 1024),
                Naming::Timestamps,
                Cleanup::KeepLogFiles(5),
            ),
        None => logger.log_to_stderr(),
    };
    Ok(logger.start()?)
}

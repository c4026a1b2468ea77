//! Machine-readable logs in daily rotating files.

use std::path::PathBuf;
use std::{env, fs, io};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::filter::FilterFn;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// The directory logs are written to if `LOG_DIR` is not set.
const DEFAULT_LOG_DIR: &str = "./logs";

/// Provides a tracing layer that writes this crate's logs into `LOG_DIR`.
///
/// Returns the layer, the guard that flushes it, and the canonical path of
/// the log directory.
pub fn layer<S>() -> io::Result<(impl Layer<S>, WorkerGuard, PathBuf)>
where
	S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
	let log_dir = env::var("LOG_DIR")
		.map(PathBuf::from)
		.unwrap_or_else(|_| PathBuf::from(DEFAULT_LOG_DIR));

	if !log_dir.exists() {
		fs::create_dir_all(&log_dir)?;
	}

	let log_dir = log_dir.canonicalize()?;

	let (writer, guard) = tracing_appender::rolling::Builder::new()
		.rotation(Rotation::DAILY)
		.filename_prefix("steam-verifier")
		.filename_suffix("log")
		.build(&log_dir)
		.map(tracing_appender::non_blocking)
		.map_err(io::Error::other)?;

	let layer = tracing_subscriber::fmt::layer()
		.with_writer(writer)
		.with_ansi(false)
		.with_target(true)
		.with_filter(FilterFn::new(|metadata| {
			metadata.target().starts_with("steam_verifier")
		}));

	Ok((layer, guard, log_dir))
}

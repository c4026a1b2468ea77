//! Log-capturing facilities.

use std::io;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod stderr;
mod files;

/// Initializes [`tracing-subscriber`].
///
/// NOTE: the returned [`WorkerGuard`] will flush the tracing layer that emits
///       logs to files when it is dropped, which means it has to stay alive
///       until the program exits!
///
/// [`tracing-subscriber`]: tracing_subscriber
pub fn init() -> io::Result<WorkerGuard>
{
	let (files_layer, guard, log_dir) = files::layer()?;
	let registry = tracing_subscriber::registry()
		.with(stderr::layer())
		.with(files_layer);

	#[cfg(feature = "console")]
	let registry = {
		use tracing_subscriber::{EnvFilter, Layer};
		registry.with(console_subscriber::spawn().with_filter(EnvFilter::new("tokio=trace")))
	};

	registry.init();

	tracing::info! {
		dir = %log_dir.display(),
		"initialized logging",
	};

	Ok(guard)
}

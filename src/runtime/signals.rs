//! This module contains OS signal handlers.
//!
//! These are used for graceful shutdown.

use tokio::signal;

/// The future returned by this function will resolve when the program receives
/// either `SIGINT` or (on unix) `SIGTERM` from the OS.
#[tracing::instrument]
pub async fn shutdown()
{
	let sigint = async {
		match signal::ctrl_c().await {
			Ok(()) => tracing::warn!("received SIGINT, shutting down"),
			Err(error) => tracing::error!(%error, "failed to receive SIGINT"),
		}
	};

	#[cfg(unix)]
	let sigterm = async {
		match signal::unix::signal(signal::unix::SignalKind::terminate()) {
			Ok(mut sigterm) => {
				sigterm.recv().await;
				tracing::warn!("received SIGTERM, shutting down");
			}
			Err(error) => {
				tracing::error!(%error, "failed to install SIGTERM handler");
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let sigterm = std::future::pending::<()>();

	tokio::select! {
		() = sigint => {}
		() = sigterm => {}
	}
}

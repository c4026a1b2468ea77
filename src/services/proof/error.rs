//! The errors that can occur when interacting with this service.

use thiserror::Error;

/// Type alias with a default `Err` type of [`Error`].
///
/// [`Error`]: enum@Error
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The errors that can occur when generating proofs.
#[derive(Debug, Error)]
pub enum Error
{
	/// The proof generator could not be reached, rejected the request, or
	/// responded with something that is not JSON.
	#[error("failed to generate web proof")]
	Http(#[from] reqwest::Error),
}

//! The errors that can occur when interacting with this service.

use thiserror::Error;

/// Type alias with a default `Err` type of [`Error`].
///
/// [`Error`]: enum@Error
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The errors that can occur when posting to the webhook.
#[derive(Debug, Error)]
pub enum Error
{
	/// The request could not be sent, or it timed out.
	///
	/// The webhook URL is stripped; it may carry a token.
	#[error("failed to reach webhook")]
	Http(#[source] reqwest::Error),
}

impl From<reqwest::Error> for Error
{
	fn from(error: reqwest::Error) -> Self
	{
		Self::Http(error.without_url())
	}
}

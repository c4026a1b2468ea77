//! The errors that can occur when interacting with this service.

use thiserror::Error;

use crate::http::problem_details::{self, IntoProblemDetails, ProblemType};
use crate::steam_id::SteamID;

/// Type alias with a default `Err` type of [`Error`].
///
/// [`Error`]: enum@Error
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The errors that can occur when interacting with Steam's Web API.
#[derive(Debug, Error)]
pub enum Error
{
	/// `STEAM_API_KEY` was not set.
	#[error("Steam API key not configured")]
	MissingApiKey,

	/// Steam returned an empty player list for a SteamID.
	#[error("Steam does not know a user with SteamID {steam_id}")]
	UserNotFound
	{
		/// The SteamID we asked about.
		steam_id: SteamID,
	},

	/// We failed to make an HTTP request to Steam's Web API, or it responded
	/// with something we could not understand.
	///
	/// The request URL is stripped, as it contains our API key.
	#[error("failed to make http request")]
	Http(#[source] reqwest::Error),
}

impl From<reqwest::Error> for Error
{
	fn from(error: reqwest::Error) -> Self
	{
		Self::Http(error.without_url())
	}
}

impl IntoProblemDetails for Error
{
	fn problem_type(&self) -> ProblemType
	{
		match self {
			Self::MissingApiKey => ProblemType::ApiKeyNotConfigured,
			Self::UserNotFound { .. } => ProblemType::ResourceNotFound,
			Self::Http(source) => source.problem_type(),
		}
	}

	fn add_extension_members(&self, ext: &mut problem_details::ExtensionMembers)
	{
		match self {
			Self::UserNotFound { steam_id } => {
				ext.add("steam_id", steam_id);
			}
			Self::Http(source) => {
				source.add_extension_members(ext);
			}
			Self::MissingApiKey => {}
		}
	}
}

/// The errors that can occur while setting up the [`SteamService`].
///
/// [`SteamService`]: super::SteamService
#[derive(Debug, Error)]
pub enum SetupError
{
	/// A URL derived from the configuration was invalid.
	#[error("failed to build url")]
	Url(#[from] url::ParseError),

	/// We failed to encode the OpenID login form.
	#[error("failed to encode openid login form")]
	EncodeLoginForm(#[from] serde_urlencoded::ser::Error),
}

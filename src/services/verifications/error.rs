//! The errors that can occur when interacting with this service.

use thiserror::Error;

use crate::http::problem_details::{self, IntoProblemDetails, ProblemType};
use crate::services::steam;

/// Type alias with a default `Err` type of [`Error`].
///
/// [`Error`]: enum@Error
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The errors that can occur when running a verification.
#[derive(Debug, Error)]
pub enum Error
{
	/// `STEAM_API_KEY` was not set.
	#[error("Steam API key not configured")]
	MissingApiKey,

	/// We could not get the user's games from Steam.
	#[error("failed to fetch Steam games data")]
	FetchGames(#[source] steam::Error),
}

impl IntoProblemDetails for Error
{
	fn problem_type(&self) -> ProblemType
	{
		match self {
			Self::MissingApiKey => ProblemType::ApiKeyNotConfigured,
			Self::FetchGames(_) => ProblemType::ExternalService,
		}
	}

	fn add_extension_members(&self, ext: &mut problem_details::ExtensionMembers)
	{
		if let Self::FetchGames(source) = self {
			source.add_extension_members(ext);
		}
	}
}

//! The errors that can occur when interacting with this service.

use thiserror::Error;

use crate::services::steam::{self, OpenIDError};

/// Type alias with a default `Err` type of [`Error`].
///
/// [`Error`]: enum@Error
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The errors that can occur when interacting with the auth service.
#[derive(Debug, Error)]
pub enum Error
{
	/// We failed to encode a JWT.
	///
	/// Our payloads are known statically, so this should not happen.
	#[error("failed to encode jwt")]
	EncodeJwt
	{
		/// The original error we got from the JWT library.
		source: jsonwebtoken::errors::Error,
	},

	/// We failed to decode a JWT.
	///
	/// Either the signature is wrong, the token expired, or it is not a JWT
	/// at all.
	#[error("failed to decode jwt: {source}")]
	DecodeJwt
	{
		/// The original error we got from the JWT library.
		source: jsonwebtoken::errors::Error,
	},

	/// We failed to encode a user profile as JSON.
	#[error("failed to serialize user profile")]
	SerializeProfile(#[from] serde_json::Error),
}

/// The errors that can occur while a user logs in with Steam.
///
/// None of these ever reach the user as a response body; they are turned
/// into an `?error=<code>` redirect instead (see [`LoginError::code()`]).
#[derive(Debug, Error)]
pub enum LoginError
{
	/// The OpenID payload could not be verified.
	#[error(transparent)]
	OpenID(#[from] OpenIDError),

	/// We could not resolve the verified SteamID to a profile.
	#[error(transparent)]
	Profile(#[from] steam::Error),

	/// We could not issue a session for the user.
	#[error(transparent)]
	Session(#[from] Error),
}

impl LoginError
{
	/// The error code that is passed to the frontend.
	pub const fn code(&self) -> &'static str
	{
		match self {
			Self::OpenID(OpenIDError::ModeMismatch { .. }) => "steam_auth_failed",
			Self::OpenID(OpenIDError::ProviderUnreachable(_)) => "steam_unreachable",
			Self::OpenID(OpenIDError::AssertionInvalid) => "steam_assertion_invalid",
			Self::OpenID(OpenIDError::MalformedClaimedId { .. }) => "no_steam_id",
			Self::Profile(steam::Error::UserNotFound { .. }) => "steam_user_not_found",
			Self::Profile(_) => "steam_api_error",
			Self::Session(_) => "session_error",
		}
	}

	/// Which step of the login failed.
	pub const fn stage(&self) -> &'static str
	{
		match self {
			Self::OpenID(_) => "verify",
			Self::Profile(_) => "profile",
			Self::Session(_) => "session",
		}
	}
}

/// The errors that can occur while setting up the [`AuthService`].
///
/// [`AuthService`]: super::AuthService
#[derive(Debug, Error)]
pub enum SetupError
{
	/// The session secret is not valid base64.
	#[error("invalid session secret: {0}")]
	SessionSecret(#[from] jsonwebtoken::errors::Error),

	/// We could not derive the home URL from our public URL.
	#[error("invalid public url: {0}")]
	PublicUrl(#[from] url::ParseError),
}

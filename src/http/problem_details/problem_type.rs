//! This module contains the [`ProblemType`] enum.
//!
//! It represents an exhaustive list of all the possible error conditions the
//! JSON routes might return.

use std::sync::OnceLock;

use serde::{Serialize, Serializer};
use url::Url;

/// The base URL for the problem type documentation.
static BASE_URL: OnceLock<Url> = OnceLock::new();

/// Sets the base URL problem type URIs are relative to.
///
/// Only the first call has any effect.
#[doc(hidden)]
pub(crate) fn set_base_url(url: Url)
{
	if let Err(url) = BASE_URL.set(url) {
		tracing::warn!(%url, "problem type base url was already set");
	}
}

/// A problem type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemType
{
	/// You did not provide a valid session cookie.
	Unauthorized,

	/// A requested resource could not be found.
	ResourceNotFound,

	/// The server has not been configured with a Steam Web API key, so it
	/// cannot make requests to Steam's Web API on your behalf.
	ApiKeyNotConfigured,

	/// We made a request to an external service and failed to decode the
	/// response.
	DecodeExternal,

	/// An internal failure occurred.
	///
	/// Any occurrence of this problem type is considered a bug!
	Internal,

	/// We failed to communicate with an external service, such as Steam.
	ExternalService,
}

impl ProblemType
{
	/// Every problem type.
	pub const ALL: [Self; 6] = [
		Self::Unauthorized,
		Self::ResourceNotFound,
		Self::ApiKeyNotConfigured,
		Self::DecodeExternal,
		Self::Internal,
		Self::ExternalService,
	];

	/// The HTTP status code responses of this problem type should have.
	pub const fn status(&self) -> http::StatusCode
	{
		match self {
			Self::Unauthorized => http::StatusCode::UNAUTHORIZED,
			Self::ResourceNotFound => http::StatusCode::NOT_FOUND,
			Self::ApiKeyNotConfigured | Self::DecodeExternal | Self::Internal => {
				http::StatusCode::INTERNAL_SERVER_ERROR
			}
			Self::ExternalService => http::StatusCode::BAD_GATEWAY,
		}
	}

	/// A short, human-readable description of this problem type.
	pub const fn title(&self) -> &'static str
	{
		match self {
			Self::Unauthorized => "Authentication required",
			Self::ResourceNotFound => "Resource not found",
			Self::ApiKeyNotConfigured => "Steam API key not configured",
			Self::DecodeExternal => "Failed to decode a response from an external service",
			Self::Internal => "Internal server error",
			Self::ExternalService => "Failed to communicate with an external service",
		}
	}

	/// The URI fragment identifying this problem type.
	pub const fn slug(&self) -> &'static str
	{
		match self {
			Self::Unauthorized => "unauthorized",
			Self::ResourceNotFound => "resource-not-found",
			Self::ApiKeyNotConfigured => "api-key-not-configured",
			Self::DecodeExternal => "decode-external",
			Self::Internal => "internal",
			Self::ExternalService => "external-service",
		}
	}
}

impl Serialize for ProblemType
{
	// Serialize as a URI as specified by the RFC.
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let Some(base_url) = BASE_URL.get() else {
			return serializer.collect_str(&format_args!("about:blank#{}", self.slug()));
		};

		let mut url = base_url
			.join("/docs/problem-types")
			.map_err(serde::ser::Error::custom)?;

		url.set_fragment(Some(self.slug()));
		url.serialize(serializer)
	}
}

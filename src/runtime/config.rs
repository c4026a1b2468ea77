//! This module contains the [`Config`] struct - a set of configuration options
//! that will be read from the environment on startup.
//!
//! See the `.env.example` file in the root of the repository for all the
//! relevant variables and example values.

use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::{env, fmt};

use thiserror::Error;
use url::Url;

/// The origin used in production deployments, unless `PRODUCTION_URL`
/// overrides it.
pub const DEFAULT_PRODUCTION_URL: &str = "https://steam-verifier-poc.vercel.app";

/// The origin used for local development.
pub const DEFAULT_LOCAL_URL: &str = "http://localhost:3000";

/// Steam's OpenID endpoint.
pub const DEFAULT_STEAM_OPENID_URL: &str = "https://steamcommunity.com/openid/login";

/// Steam's Web API.
pub const DEFAULT_STEAM_API_URL: &str = "https://api.steampowered.com";

/// The web-proof generator.
pub const DEFAULT_PROOF_SERVICE_URL: &str =
	"https://web-proof-vercel-oq8rvyvuw-vlayer.vercel.app/api/handler";

/// The notary the web-proof generator should use.
pub const DEFAULT_PROOF_NOTARY_URL: &str = "https://test-notary.vlayer.xyz/v0.1.0-alpha.11/";

/// The application's runtime configuration.
#[derive(Clone)]
pub struct Config
{
	/// The address the HTTP server will listen on.
	pub addr: SocketAddr,

	/// The public URL of the application.
	///
	/// This is used as the OpenID realm and for building redirect URLs.
	pub public_url: Url,

	/// Steam Web API key.
	pub steam_api_key: Option<String>,

	/// Base64 secret for signing session tokens.
	pub session_secret: String,

	/// URL that verification results are posted to.
	pub webhook_url: Option<Url>,

	/// Database connection URL.
	///
	/// If this is not set, verification results are not persisted.
	pub database_url: Option<Url>,

	/// Endpoint of the web-proof generator.
	pub proof_service_url: Url,

	/// Notary passed along to the web-proof generator.
	pub proof_notary_url: Url,

	/// Steam's OpenID login / verification endpoint.
	pub steam_openid_url: Url,

	/// Base URL of Steam's Web API.
	pub steam_api_url: Url,
}

/// Error that can occur while initializing the application's [`Config`].
#[derive(Debug, Error)]
pub enum InitializeConfigError
{
	/// An environment variable was set, but not valid UTF-8.
	#[error("failed to read environment variable `{var}`: {source}")]
	Env
	{
		/// The environment variable we tried to read.
		var: &'static str,

		/// The original error we got when we tried to read a value.
		source: env::VarError,
	},

	/// A required configuration option was empty.
	#[error("`{var}` cannot be empty")]
	EmptyValue
	{
		/// The environment variable we read.
		var: &'static str,
	},

	/// A configuration option could not be parsed into the required type.
	#[error("failed to parse configuration value `{var}`: {source}")]
	Parse
	{
		/// The environment variable containing the value.
		var: &'static str,

		/// The parsing error.
		source: Box<dyn std::error::Error + Send + Sync + 'static>,
	},

	/// The resolved public URL cannot be used as an HTTP origin.
	#[error("public url `{url}` must be an http(s) url")]
	InvalidPublicUrl
	{
		/// The URL we resolved.
		url: String,
	},
}

impl Config
{
	/// Initializes a [`Config`] by reading and parsing environment variables.
	#[tracing::instrument(err(Debug))]
	pub fn new() -> Result<Self, InitializeConfigError>
	{
		Self::from_lookup(|var| env::var(var))
	}

	/// Initializes a [`Config`] from an arbitrary variable source.
	///
	/// `lookup` behaves like [`std::env::var()`].
	pub fn from_lookup<F>(lookup: F) -> Result<Self, InitializeConfigError>
	where
		F: Fn(&'static str) -> Result<String, env::VarError>,
	{
		let vars = Vars { lookup };

		let addr = vars
			.parse_opt::<SocketAddr>("STEAM_VERIFIER_ADDR")?
			.unwrap_or_else(|| SocketAddr::from((Ipv4Addr::LOCALHOST, 3000)));

		let public_url = resolve_public_url(|var| vars.get_opt(var))?;
		let steam_api_key = vars.parse_opt::<String>("STEAM_API_KEY")?;
		let session_secret = vars.parse::<String>("SESSION_SECRET")?;
		let webhook_url = vars.parse_opt::<Url>("WEBHOOK_URL")?;
		let database_url = vars.parse_opt::<Url>("DATABASE_URL")?;
		let proof_service_url =
			vars.parse_or::<Url>("PROOF_SERVICE_URL", DEFAULT_PROOF_SERVICE_URL)?;
		let proof_notary_url = vars.parse_or::<Url>("PROOF_NOTARY_URL", DEFAULT_PROOF_NOTARY_URL)?;
		let steam_openid_url = vars.parse_or::<Url>("STEAM_OPENID_URL", DEFAULT_STEAM_OPENID_URL)?;
		let steam_api_url = vars.parse_or::<Url>("STEAM_API_URL", DEFAULT_STEAM_API_URL)?;

		Ok(Self {
			addr,
			public_url,
			steam_api_key,
			session_secret,
			webhook_url,
			database_url,
			proof_service_url,
			proof_notary_url,
			steam_openid_url,
			steam_api_url,
		})
	}
}

impl fmt::Debug for Config
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		f.debug_struct("Config")
			.field("addr", &format_args!("{}", self.addr))
			.field("public_url", &format_args!("{:?}", self.public_url.as_str()))
			.field("steam_api_key", &self.steam_api_key.as_ref().map(|_| "*****"))
			.field("session_secret", &"*****")
			.field("webhook_url", &self.webhook_url.as_ref().map(Url::as_str))
			.field("database_url", &self.database_url.as_ref().map(|_| "*****"))
			.field("proof_service_url", &format_args!("{:?}", self.proof_service_url.as_str()))
			.field("steam_openid_url", &format_args!("{:?}", self.steam_openid_url.as_str()))
			.field("steam_api_url", &format_args!("{:?}", self.steam_api_url.as_str()))
			.finish_non_exhaustive()
	}
}

/// Resolves the application's public URL.
///
/// The first match wins:
///
/// 1. `VERCEL_ENV=production` => `PRODUCTION_URL` (or [`DEFAULT_PRODUCTION_URL`])
/// 2. `VERCEL_URL=<host>` => `https://<host>`
/// 3. `APP_URL`
/// 4. [`DEFAULT_LOCAL_URL`]
pub fn resolve_public_url<F>(lookup: F) -> Result<Url, InitializeConfigError>
where
	F: Fn(&'static str) -> Result<Option<String>, InitializeConfigError>,
{
	let (var, raw) = if lookup("VERCEL_ENV")?.as_deref() == Some("production") {
		let url = lookup("PRODUCTION_URL")?.unwrap_or_else(|| DEFAULT_PRODUCTION_URL.to_owned());
		("PRODUCTION_URL", url)
	} else if let Some(host) = lookup("VERCEL_URL")? {
		("VERCEL_URL", format!("https://{host}"))
	} else if let Some(url) = lookup("APP_URL")? {
		("APP_URL", url)
	} else {
		("APP_URL", DEFAULT_LOCAL_URL.to_owned())
	};

	let url = raw
		.parse::<Url>()
		.map_err(|error| InitializeConfigError::Parse { var, source: Box::new(error) })?;

	if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
		return Err(InitializeConfigError::InvalidPublicUrl { url: raw });
	}

	Ok(url)
}

/// Helper for reading variables through a user-provided lookup function.
struct Vars<F>
{
	/// Behaves like [`std::env::var()`].
	lookup: F,
}

impl<F> Vars<F>
where
	F: Fn(&'static str) -> Result<String, env::VarError>,
{
	/// Reads a variable, returning [`None`] if it does not exist or is empty.
	fn get_opt(&self, var: &'static str) -> Result<Option<String>, InitializeConfigError>
	{
		match (self.lookup)(var) {
			Ok(value) if value.is_empty() => Ok(None),
			Ok(value) => Ok(Some(value)),
			Err(env::VarError::NotPresent) => Ok(None),
			Err(source) => Err(InitializeConfigError::Env { var, source }),
		}
	}

	/// Reads and parses a required variable.
	fn parse<T>(&self, var: &'static str) -> Result<T, InitializeConfigError>
	where
		T: FromStr<Err: std::error::Error + Send + Sync + 'static>,
	{
		let value = (self.lookup)(var).map_err(|source| InitializeConfigError::Env { var, source })?;

		if value.is_empty() {
			return Err(InitializeConfigError::EmptyValue { var });
		}

		value
			.parse::<T>()
			.map_err(|error| InitializeConfigError::Parse { var, source: Box::new(error) })
	}

	/// Reads and parses a variable.
	///
	/// Returns [`None`] if the variable does not exist or is empty.
	fn parse_opt<T>(&self, var: &'static str) -> Result<Option<T>, InitializeConfigError>
	where
		T: FromStr<Err: std::error::Error + Send + Sync + 'static>,
	{
		let Some(value) = self.get_opt(var)? else {
			return Ok(None);
		};

		value
			.parse::<T>()
			.map(Some)
			.map_err(|error| InitializeConfigError::Parse { var, source: Box::new(error) })
	}

	/// Reads and parses a variable, falling back to `default` if it does not
	/// exist or is empty.
	fn parse_or<T>(&self, var: &'static str, default: &str) -> Result<T, InitializeConfigError>
	where
		T: FromStr<Err: std::error::Error + Send + Sync + 'static>,
	{
		let value = self.get_opt(var)?.unwrap_or_else(|| default.to_owned());

		value
			.parse::<T>()
			.map_err(|error| InitializeConfigError::Parse { var, source: Box::new(error) })
	}
}

//! OpenID authentication.
//!
//! Steam can act as an OpenID 2.0 authentication provider.
//! This is a fairly old standard, which is why there are barely any libraries
//! for it. The procedure is pretty simple however, and so we implemented it
//! ourselves:
//!
//! 1. build a login URL containing the information that Steam requires to
//!    authenticate a user and send them back to us (see [`login_url()`])
//! 2. redirect the user to that URL
//! 3. the user will login as usual
//! 4. the user will be redirected back to [`RETURN_ROUTE`]
//! 5. we receive a request with an [`OpenIDPayload`] encoded in the query
//!    parameters
//! 6. we send the payload back to Steam with `openid.mode` set to
//!    `check_authentication`, to verify that it actually originated from Steam
//! 7. we extract the user's SteamID from `openid.claimed_id`
//!
//! Steam does the signature checking for us in step 6; we never look at
//! `openid.sig` ourselves.

use serde::Serialize;
use thiserror::Error;
use url::Url;

use super::SetupError;
use crate::steam_id::SteamID;

/// The OpenID 2.0 namespace.
pub const NAMESPACE: &str = "http://specs.openid.net/auth/2.0";

/// Tells Steam to let the user pick the identity to log in with.
pub const IDENTIFIER_SELECT: &str = "http://specs.openid.net/auth/2.0/identifier_select";

/// The only shape of `openid.claimed_id` we accept, minus the SteamID.
pub const CLAIMED_ID_PREFIX: &str = "https://steamcommunity.com/openid/id/";

/// The route Steam should redirect back to after a successful login.
pub const RETURN_ROUTE: &str = "/api/auth/steam/callback";

/// Form parameters that will be sent to Steam when redirecting a user for
/// login.
#[derive(Debug, Serialize)]
#[allow(clippy::missing_docs_in_private_items)]
struct LoginForm<'a>
{
	#[serde(rename = "openid.ns")]
	namespace: &'static str,

	#[serde(rename = "openid.mode")]
	mode: &'static str,

	#[serde(rename = "openid.return_to")]
	return_to: &'a str,

	#[serde(rename = "openid.realm")]
	realm: &'a str,

	#[serde(rename = "openid.identity")]
	identity: &'static str,

	#[serde(rename = "openid.claimed_id")]
	claimed_id: &'static str,
}

/// Generates the URL users are redirected to for logging in with Steam.
///
/// `openid_url` is Steam's OpenID endpoint and `public_url` is our own
/// origin. The result only depends on these two, so it is computed once on
/// startup.
#[tracing::instrument(level = "debug", err(Debug))]
pub fn login_url(openid_url: &Url, public_url: &Url) -> Result<Url, SetupError>
{
	let realm = public_url.as_str().trim_end_matches('/');
	let return_to = format!("{realm}{RETURN_ROUTE}").parse::<Url>()?;
	let query_string = serde_urlencoded::to_string(LoginForm {
		namespace: NAMESPACE,
		mode: "checkid_setup",
		return_to: return_to.as_str(),
		realm,
		identity: IDENTIFIER_SELECT,
		claimed_id: IDENTIFIER_SELECT,
	})?;

	let mut url = openid_url.clone();
	url.set_query(Some(&query_string));

	Ok(url)
}

/// The errors that can occur while verifying an [`OpenIDPayload`].
#[derive(Debug, Error)]
pub enum OpenIDError
{
	/// The callback was hit with something other than a positive assertion.
	#[error("expected `openid.mode=id_res`, got {mode:?}")]
	ModeMismatch
	{
		/// The `openid.mode` we got instead.
		mode: Option<String>,
	},

	/// Steam's verification endpoint could not be reached or did not respond
	/// with a success status.
	#[error("failed to contact Steam's OpenID endpoint")]
	ProviderUnreachable(#[source] reqwest::Error),

	/// Steam did not confirm the assertion.
	#[error("Steam did not confirm the OpenID assertion")]
	AssertionInvalid,

	/// Steam confirmed the assertion, but the claimed identifier does not
	/// have the shape we expect.
	#[error("unexpected `openid.claimed_id`: {claimed_id:?}")]
	MalformedClaimedId
	{
		/// The claimed identifier we received.
		claimed_id: Option<String>,
	},
}

/// Query parameters Steam attaches to its redirect back to us.
///
/// Every parameter is kept verbatim and in order, including ones we do not
/// know about and repeated keys, because Steam expects to get all of them back
/// during verification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenIDPayload
{
	/// `openid.*` key/value pairs.
	params: Vec<(String, String)>,
}

impl OpenIDPayload
{
	/// Parses a raw query string.
	pub fn from_query_string(query: &str) -> Self
	{
		let params = url::form_urlencoded::parse(query.as_bytes())
			.into_owned()
			.collect();

		Self { params }
	}

	/// Returns the first value of an arbitrary parameter.
	pub fn get(&self, key: &str) -> Option<&str>
	{
		self.params
			.iter()
			.find(|(k, _)| k == key)
			.map(|(_, value)| value.as_str())
	}

	/// Returns `openid.mode`.
	pub fn mode(&self) -> Option<&str>
	{
		self.get("openid.mode")
	}

	/// Returns `openid.claimed_id`.
	pub fn claimed_id(&self) -> Option<&str>
	{
		self.get("openid.claimed_id")
	}

	/// The form we send back to Steam for verification.
	///
	/// This is an exact copy of the payload, except for `openid.mode`, which is
	/// rewritten in place.
	fn check_authentication_form(&self) -> Vec<(&str, &str)>
	{
		self.params
			.iter()
			.map(|(key, value)| match key.as_str() {
				"openid.mode" => ("openid.mode", "check_authentication"),
				key => (key, value.as_str()),
			})
			.collect()
	}

	/// Verifies this payload with Steam and extracts the user's SteamID from
	/// it.
	///
	/// No request is made if `openid.mode` is not `id_res`.
	#[tracing::instrument(
		level = "debug",
		name = "OpenIDPayload::verify",
		skip_all,
		fields(claimed_id = ?self.claimed_id()),
		ret(level = "debug"),
		err(Debug, level = "debug"),
	)]
	pub async fn verify(
		&self,
		http_client: &reqwest::Client,
		openid_url: &Url,
	) -> Result<SteamID, OpenIDError>
	{
		if self.mode() != Some("id_res") {
			return Err(OpenIDError::ModeMismatch { mode: self.mode().map(ToOwned::to_owned) });
		}

		let response = http_client
			.post(openid_url.as_str())
			.form(&self.check_authentication_form())
			.send()
			.await
			.and_then(reqwest::Response::error_for_status)
			.map_err(OpenIDError::ProviderUnreachable)?
			.text()
			.await
			.map_err(OpenIDError::ProviderUnreachable)?;

		if !is_valid(&response) {
			tracing::debug!(%response, "steam login invalid");
			return Err(OpenIDError::AssertionInvalid);
		}

		let steam_id = self
			.claimed_id()
			.and_then(parse_claimed_id)
			.ok_or_else(|| OpenIDError::MalformedClaimedId {
				claimed_id: self.claimed_id().map(ToOwned::to_owned),
			})?;

		tracing::debug!(%steam_id, "user logged in");

		Ok(steam_id)
	}
}

/// Checks whether a `check_authentication` response body confirms the
/// assertion.
///
/// The body is a list of `key:value` lines; we look for `is_valid:true`,
/// ignoring case and surrounding whitespace.
pub fn is_valid(response_body: &str) -> bool
{
	response_body
		.lines()
		.filter_map(|line| line.split_once(':'))
		.any(|(key, value)| {
			key.trim().eq_ignore_ascii_case("is_valid") && value.trim().eq_ignore_ascii_case("true")
		})
}

/// Extracts the SteamID from `https://steamcommunity.com/openid/id/<17 digits>`.
pub fn parse_claimed_id(claimed_id: &str) -> Option<SteamID>
{
	claimed_id
		.strip_prefix(CLAIMED_ID_PREFIX)?
		.parse::<SteamID>()
		.ok()
}

//! The [`SteamService`] is responsible for communicating with Steam.
//!
//! It can generate OpenID login URLs, verify OpenID payloads, and provide
//! profile and library information about users.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use url::Url;

use crate::steam_id::SteamID;

mod error;
pub use error::{Error, Result, SetupError};

pub mod openid;
pub use openid::{OpenIDError, OpenIDPayload};

pub mod user;
pub use user::UserProfile;

pub mod games;
pub use games::{GamesData, SteamGame};

/// Steam Web API path for fetching user information.
const USER_PATH: &str = "/ISteamUser/GetPlayerSummaries/v0002/";

/// Steam Web API path for fetching a user's games.
const OWNED_GAMES_PATH: &str = "/IPlayerService/GetOwnedGames/v0001/";

/// A service for interacting with Steam.
#[derive(Clone)]
#[allow(clippy::missing_docs_in_private_items)]
pub struct SteamService
{
	openid_url: Arc<Url>,
	login_url: Arc<Url>,
	user_url: Arc<Url>,
	owned_games_url: Arc<Url>,
	steam_api_key: Option<Arc<str>>,
	http_client: reqwest::Client,
}

impl fmt::Debug for SteamService
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		f.debug_struct("SteamService")
			.field("openid_url", &format_args!("{:?}", self.openid_url.as_str()))
			.field("user_url", &format_args!("{:?}", self.user_url.as_str()))
			.field("owned_games_url", &format_args!("{:?}", self.owned_games_url.as_str()))
			.field("has_api_key", &self.steam_api_key.is_some())
			.finish_non_exhaustive()
	}
}

impl SteamService
{
	/// Creates a new [`SteamService`].
	///
	/// `public_url` is our own origin; Steam will redirect users back to it.
	pub fn new(
		openid_url: Url,
		api_url: &Url,
		steam_api_key: Option<String>,
		public_url: &Url,
		http_client: reqwest::Client,
	) -> std::result::Result<Self, SetupError>
	{
		let login_url = openid::login_url(&openid_url, public_url)?;
		let user_url = api_url.join(USER_PATH)?;
		let owned_games_url = api_url.join(OWNED_GAMES_PATH)?;

		Ok(Self {
			openid_url: Arc::new(openid_url),
			login_url: Arc::new(login_url),
			user_url: Arc::new(user_url),
			owned_games_url: Arc::new(owned_games_url),
			steam_api_key: steam_api_key.map(Into::into),
			http_client,
		})
	}

	/// The URL users should be redirected to for logging in.
	pub fn openid_login_url(&self) -> &Url
	{
		&self.login_url
	}

	/// Whether `STEAM_API_KEY` is set.
	pub const fn has_api_key(&self) -> bool
	{
		self.steam_api_key.is_some()
	}

	/// Verifies an OpenID payload with Steam.
	pub async fn verify_openid_payload(
		&self,
		payload: &OpenIDPayload,
	) -> std::result::Result<SteamID, OpenIDError>
	{
		payload.verify(&self.http_client, &self.openid_url).await
	}

	/// Fetch information about a user.
	#[tracing::instrument(level = "debug", err(Debug, level = "debug"))]
	pub async fn fetch_user(&self, steam_id: SteamID) -> Result<UserProfile>
	{
		#[allow(clippy::missing_docs_in_private_items)]
		#[derive(Serialize)]
		struct Query<'a>
		{
			key: &'a str,

			#[serde(rename = "steamids")]
			steam_id: SteamID,
		}

		let key = self.api_key()?;

		tracing::debug!(url = %self.user_url, "making http request to steam");

		let response = self
			.http_client
			.get(self.user_url.as_str())
			.query(&Query { key, steam_id })
			.send()
			.await?;

		if let Err(error) = response.error_for_status_ref() {
			let error = Error::from(error);
			let response_body = response.text().await.ok();

			tracing::error! {
				?error,
				?response_body,
				"failed to fetch profile information from steam",
			};

			return Err(error);
		}

		response
			.json::<user::PlayerSummaries>()
			.await?
			.into_profile(steam_id)
			.ok_or(Error::UserNotFound { steam_id })
	}

	/// Fetch the games a user owns.
	#[tracing::instrument(level = "debug", err(Debug, level = "debug"))]
	pub async fn fetch_owned_games(&self, steam_id: SteamID) -> Result<GamesData>
	{
		let url = self.owned_games_url(steam_id)?;

		tracing::debug!(url = %self.owned_games_url, "making http request to steam");

		let response = self.http_client.get(url).send().await?;

		if let Err(error) = response.error_for_status_ref() {
			let error = Error::from(error);
			let response_body = response.text().await.ok();

			tracing::error! {
				?error,
				?response_body,
				"failed to fetch owned games from steam",
			};

			return Err(error);
		}

		let games = response.json::<games::OwnedGames>().await?.response;

		tracing::debug!(game_count = games.game_count, "fetched owned games");

		Ok(games)
	}

	/// The full `GetOwnedGames` URL for a user, including the API key.
	///
	/// The proof service needs this to make the very same request we do.
	pub fn owned_games_url(&self, steam_id: SteamID) -> Result<Url>
	{
		let key = self.api_key()?;
		let mut url = Url::clone(&self.owned_games_url);

		url.query_pairs_mut()
			.append_pair("key", key)
			.append_pair("steamid", &steam_id.to_string())
			.append_pair("include_appinfo", "true")
			.append_pair("format", "json");

		Ok(url)
	}

	/// Returns the API key, or an error if none is configured.
	fn api_key(&self) -> Result<&str>
	{
		self.steam_api_key.as_deref().ok_or(Error::MissingApiKey)
	}
}

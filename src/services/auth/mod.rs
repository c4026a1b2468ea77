//! The [`AuthService`] is responsible for logging users in with Steam and
//! keeping track of their sessions.
//!
//! [`AuthService::login_url()`] produces the URL users are sent to for
//! logging in. Steam redirects them back to our callback, which hands the
//! payload to [`AuthService::login()`]. That verifies the payload, resolves
//! the user's profile, and issues a signed session token.
//!
//! Sessions are [`Jwt`]s stored in a cookie; see the [`session`] module.

#![allow(clippy::clone_on_ref_ptr)] // TODO: remove once axum 0.8 releases

use std::fmt;
use std::sync::Arc;

use axum::extract::FromRef;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::services::steam::{OpenIDPayload, UserProfile};
use crate::services::SteamService;

pub(crate) mod http;

mod error;
pub use error::{Error, LoginError, Result, SetupError};

pub mod session;
pub use session::{Session, SessionRejection};

pub mod jwt;
pub use jwt::Jwt;

/// A service for managing user authentication.
#[derive(Clone, FromRef)]
#[allow(clippy::missing_docs_in_private_items)]
pub struct AuthService
{
	jwt_state: Arc<JwtState>,
	steam_svc: SteamService,
	home_url: Arc<Url>,
}

impl fmt::Debug for AuthService
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		f.debug_struct("AuthService")
			.field("home_url", &format_args!("{:?}", self.home_url.as_str()))
			.finish_non_exhaustive()
	}
}

/// A successful login.
#[derive(Debug)]
pub struct Login
{
	/// The user who logged in.
	pub user: UserProfile,

	/// The encoded session token.
	pub token: String,

	/// Where to send the user afterwards.
	pub redirect_to: Url,
}

impl AuthService
{
	/// Create a new [`AuthService`].
	///
	/// `session_secret` must be base64.
	#[tracing::instrument(skip(session_secret), err(Debug))]
	pub fn new(
		steam_svc: SteamService,
		session_secret: &str,
		public_url: &Url,
	) -> std::result::Result<Self, SetupError>
	{
		let jwt_state = Arc::new(JwtState {
			header: jsonwebtoken::Header::default(),
			encoding_key: jsonwebtoken::EncodingKey::from_base64_secret(session_secret)?,
			decoding_key: jsonwebtoken::DecodingKey::from_base64_secret(session_secret)?,
			validation: jsonwebtoken::Validation::default(),
		});

		let home_url = format!("{}/", public_url.as_str().trim_end_matches('/')).parse::<Url>()?;

		Ok(Self { jwt_state, steam_svc, home_url: Arc::new(home_url) })
	}

	/// The URL that allows a user to login with Steam.
	pub fn login_url(&self) -> &Url
	{
		self.steam_svc.openid_login_url()
	}

	/// Our landing page.
	pub fn home_url(&self) -> &Url
	{
		&self.home_url
	}

	/// Completes a login with the payload Steam redirected the user back
	/// with.
	#[tracing::instrument(level = "debug", skip_all, err(Debug, level = "debug"))]
	pub async fn login(&self, payload: &OpenIDPayload) -> Result<Login, LoginError>
	{
		let steam_id = self.steam_svc.verify_openid_payload(payload).await?;
		let user = self.steam_svc.fetch_user(steam_id).await?;
		let token = self.encode_jwt(&Jwt::new(&user, session::DURATION.unsigned_abs()))?;
		let user_json = serde_json::to_string(&user).map_err(Error::SerializeProfile)?;

		let mut redirect_to = Url::clone(&self.home_url);
		redirect_to.query_pairs_mut().append_pair("user", &user_json);

		tracing::info!(user.id = %user.id, user.name = %user.name, "user logged in");

		Ok(Login { user, token, redirect_to })
	}

	/// Where to send a user whose login failed.
	pub fn error_redirect(&self, error: &LoginError) -> Url
	{
		let mut url = Url::clone(&self.home_url);
		url.query_pairs_mut().append_pair("error", error.code());
		url
	}

	/// Encode a JWT into a string.
	#[tracing::instrument(level = "debug", skip_all, err(Debug, level = "debug"))]
	pub fn encode_jwt<T>(&self, jwt: &Jwt<T>) -> Result<String>
	where
		T: Serialize,
	{
		jsonwebtoken::encode(&self.jwt_state.header, jwt, &self.jwt_state.encoding_key)
			.map_err(|source| Error::EncodeJwt { source })
	}

	/// Decode a string as a JWT.
	#[tracing::instrument(level = "debug", skip_all, err(Debug, level = "debug"))]
	pub fn decode_jwt<T>(&self, jwt: &str) -> Result<Jwt<T>>
	where
		T: DeserializeOwned,
	{
		jsonwebtoken::decode(jwt, &self.jwt_state.decoding_key, &self.jwt_state.validation)
			.map(|data| data.claims)
			.map_err(|source| Error::DecodeJwt { source })
	}
}

/// State for encoding/decoding JWTs.
#[allow(clippy::missing_docs_in_private_items)]
struct JwtState
{
	header: jsonwebtoken::Header,
	encoding_key: jsonwebtoken::EncodingKey,
	decoding_key: jsonwebtoken::DecodingKey,
	validation: jsonwebtoken::Validation,
}

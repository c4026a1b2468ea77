//! Session authentication.
//!
//! A session is a signed [`Jwt`] carrying the user's [`UserProfile`], stored
//! in an HTTP-only cookie. There is no server-side session state.

use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use http::request;
use thiserror::Error;
use time::OffsetDateTime;

use super::{AuthService, Jwt};
use crate::http::problem_details::{IntoProblemDetails, ProblemType};
use crate::http::ProblemDetails;
use crate::services::steam::UserProfile;

/// The name of the HTTP cookie that will store the session token.
pub const COOKIE_NAME: &str = "steam_user";

/// How long a session stays valid.
pub const DURATION: time::Duration = time::Duration::WEEK;

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session(Jwt<UserProfile>);

impl Session
{
	/// Returns the logged-in user.
	pub fn user(&self) -> &UserProfile
	{
		self.0.payload()
	}

	/// Returns the logged-in user.
	pub fn into_user(self) -> UserProfile
	{
		self.0.into_payload()
	}

	/// When this session expires.
	pub fn expires_on(&self) -> Option<OffsetDateTime>
	{
		self.0.expires_on()
	}
}

impl From<Jwt<UserProfile>> for Session
{
	fn from(jwt: Jwt<UserProfile>) -> Self
	{
		Self(jwt)
	}
}

/// Creates the session cookie for an encoded token.
pub fn cookie(token: String) -> Cookie<'static>
{
	Cookie::build((COOKIE_NAME, token))
		.path("/")
		.secure(cfg!(feature = "production"))
		.same_site(SameSite::Lax)
		.http_only(true)
		.max_age(DURATION)
		.build()
}

/// Creates a cookie that makes the browser forget the session.
pub fn removal_cookie() -> Cookie<'static>
{
	Cookie::build((COOKIE_NAME, ""))
		.path("/")
		.secure(cfg!(feature = "production"))
		.same_site(SameSite::Lax)
		.http_only(true)
		.max_age(time::Duration::ZERO)
		.expires(OffsetDateTime::UNIX_EPOCH)
		.build()
}

/// Error that can occur while authenticating a session.
#[derive(Debug, Error)]
pub enum SessionRejection
{
	/// The session cookie is missing.
	#[error("missing session cookie")]
	MissingCookie,

	/// The session token is invalid or has expired.
	#[error("invalid session token")]
	InvalidToken(#[source] super::Error),
}

impl IntoProblemDetails for SessionRejection
{
	fn problem_type(&self) -> ProblemType
	{
		ProblemType::Unauthorized
	}
}

impl IntoResponse for SessionRejection
{
	fn into_response(self) -> Response
	{
		ProblemDetails::from(self).into_response()
	}
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
	S: Send + Sync + 'static,
	AuthService: FromRef<S>,
{
	type Rejection = SessionRejection;

	#[tracing::instrument(
		name = "Session::from_request_parts",
		skip_all,
		fields(user.id = tracing::field::Empty),
		err(Debug, level = "debug")
	)]
	async fn from_request_parts(
		req: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection>
	{
		if let Some(session) = req.extensions.get::<Self>() {
			return Ok(session.clone());
		}

		let cookies = CookieJar::from_headers(&req.headers);
		let token = cookies
			.get(COOKIE_NAME)
			.map(Cookie::value)
			.filter(|value| !value.is_empty())
			.ok_or(SessionRejection::MissingCookie)?;

		let session = AuthService::from_ref(state)
			.decode_jwt::<UserProfile>(token)
			.map(Self)
			.map_err(SessionRejection::InvalidToken)?;

		tracing::Span::current().record("user.id", format_args!("{}", session.user().id));
		req.extensions.insert(session.clone());

		Ok(session)
	}
}

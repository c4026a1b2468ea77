//! HTTP handlers for this service.

use axum::extract::{RawQuery, State};
use axum::response::Redirect;
use axum::{routing, Json, Router};
use axum_extra::extract::CookieJar;
use serde::Serialize;

use super::{session, AuthService, Session, SessionRejection};
use crate::services::steam::{OpenIDPayload, UserProfile};

impl From<AuthService> for Router
{
	fn from(svc: AuthService) -> Self
	{
		Router::new()
			.route("/api/auth/steam", routing::get(login))
			.route("/login-redirect", routing::get(login))
			.route("/api/auth/steam/callback", routing::get(callback))
			.route("/callback", routing::get(callback))
			.route("/api/auth/logout", routing::get(logout))
			.route("/api/user", routing::get(current_user))
			.with_state(svc)
	}
}

/// Login with Steam.
///
/// Redirects to Steam's login page.
#[tracing::instrument(level = "debug", skip_all)]
#[utoipa::path(
	get,
	path = "/api/auth/steam",
	tag = "Auth",
	responses((status = 303, description = "redirect to Steam"))
)]
pub(crate) async fn login(State(svc): State<AuthService>) -> Redirect
{
	Redirect::to(svc.login_url().as_str())
}

/// Hit by Steam after a login attempt.
///
/// Always redirects back to the landing page; either with `?user=<profile>`
/// and a session cookie, or with `?error=<code>`.
#[tracing::instrument(skip_all)]
#[utoipa::path(
	get,
	path = "/api/auth/steam/callback",
	tag = "Auth",
	responses((status = 303, description = "redirect to the landing page"))
)]
pub(crate) async fn callback(
	State(svc): State<AuthService>,
	RawQuery(query): RawQuery,
	cookies: CookieJar,
) -> (CookieJar, Redirect)
{
	let payload = OpenIDPayload::from_query_string(query.as_deref().unwrap_or_default());

	match svc.login(&payload).await {
		Ok(login) => {
			let cookies = cookies.add(session::cookie(login.token));
			(cookies, Redirect::to(login.redirect_to.as_str()))
		}
		Err(error) => {
			tracing::warn! {
				stage = error.stage(),
				code = error.code(),
				error = %error,
				source = ?std::error::Error::source(&error),
				"steam login failed",
			};

			(cookies, Redirect::to(svc.error_redirect(&error).as_str()))
		}
	}
}

/// Clears the session.
#[tracing::instrument(level = "debug", skip_all)]
#[utoipa::path(
	get,
	path = "/api/auth/logout",
	tag = "Auth",
	responses((status = 303, description = "redirect to the landing page"))
)]
pub(crate) async fn logout(State(svc): State<AuthService>, cookies: CookieJar) -> (CookieJar, Redirect)
{
	(cookies.add(session::removal_cookie()), Redirect::to(svc.home_url().as_str()))
}

/// Response body of [`current_user`].
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub(crate) struct CurrentUser
{
	/// The logged-in user, if any.
	user: Option<UserProfile>,
}

/// Returns the currently logged-in user.
#[tracing::instrument(level = "debug", skip_all)]
#[utoipa::path(
	get,
	path = "/api/user",
	tag = "Auth",
	responses((status = 200, body = CurrentUser))
)]
pub(crate) async fn current_user(session: Result<Session, SessionRejection>) -> Json<CurrentUser>
{
	let user = match session {
		Ok(session) => Some(session.into_user()),
		Err(SessionRejection::MissingCookie) => None,
		Err(error) => {
			tracing::warn!(%error, "ignoring invalid session");
			None
		}
	};

	Json(CurrentUser { user })
}

#[cfg(test)]
mod tests
{
	use std::collections::BTreeMap;
	use std::sync::atomic::Ordering;

	use axum::body::Body;
	use http::{header, Request, StatusCode};
	use serde_json::json;
	use tower::ServiceExt;
	use url::Url;

	use crate::testing::{self, FakeProvider};

	const CLAIMED_ID: &str = "https://steamcommunity.com/openid/id/76561198012345678";

	fn callback_uri(mode: &str, claimed_id: &str) -> String
	{
		let query = serde_urlencoded::to_string([
			("openid.ns", "http://specs.openid.net/auth/2.0"),
			("openid.mode", mode),
			("openid.op_endpoint", "https://steamcommunity.com/openid/login"),
			("openid.claimed_id", claimed_id),
			("openid.identity", claimed_id),
			("openid.return_to", "http://localhost:3000/api/auth/steam/callback"),
			("openid.response_nonce", "2024-06-15T12:00:00Zabcdef"),
			("openid.assoc_handle", "1234567890"),
			("openid.signed", "signed,op_endpoint,claimed_id,identity,return_to,response_nonce,assoc_handle"),
			("openid.sig", "c2lnbmF0dXJl+/="),
		])
		.unwrap_or_default();

		format!("/api/auth/steam/callback?{query}")
	}

	fn location(response: &http::Response<Body>) -> color_eyre::Result<Url>
	{
		let location = response
			.headers()
			.get(header::LOCATION)
			.ok_or_else(|| color_eyre::eyre::eyre!("no location header"))?
			.to_str()?;

		Ok(Url::parse("http://localhost:3000")?.join(location)?)
	}

	fn query(url: &Url) -> BTreeMap<String, String>
	{
		url.query_pairs().into_owned().collect()
	}

	fn set_cookies(response: &http::Response<Body>) -> Vec<String>
	{
		response
			.headers()
			.get_all(header::SET_COOKIE)
			.into_iter()
			.filter_map(|value| value.to_str().ok())
			.map(ToOwned::to_owned)
			.collect()
	}

	async fn get(router: axum::Router, uri: &str) -> color_eyre::Result<http::Response<Body>>
	{
		Ok(router.oneshot(Request::get(uri).body(Body::empty())?).await?)
	}

	#[tokio::test]
	async fn login_redirects_to_steam() -> color_eyre::Result<()>
	{
		let provider = FakeProvider::spawn().await?;
		let router = testing::router(&provider).await?;

		for uri in ["/api/auth/steam", "/login-redirect", "/api/auth/steam"] {
			let response = get(router.clone(), uri).await?;
			assert_eq!(response.status(), StatusCode::SEE_OTHER);

			let url = location(&response)?;
			let params = query(&url);

			assert_eq!(url.path(), "/openid/login");
			assert_eq!(params.get("openid.mode").map(String::as_str), Some("checkid_setup"));
			assert_eq!(
				params.get("openid.return_to").map(String::as_str),
				Some("http://localhost:3000/api/auth/steam/callback"),
			);
			assert_eq!(params.get("openid.realm").map(String::as_str), Some("http://localhost:3000"));
		}

		Ok(())
	}

	#[tokio::test]
	async fn successful_login() -> color_eyre::Result<()>
	{
		let provider = FakeProvider::spawn().await?;
		let router = testing::router(&provider).await?;
		let response = get(router.clone(), &callback_uri("id_res", CLAIMED_ID)).await?;

		assert_eq!(response.status(), StatusCode::SEE_OTHER);

		let url = location(&response)?;
		let params = query(&url);
		let user = params
			.get("user")
			.ok_or_else(|| color_eyre::eyre::eyre!("no user in redirect"))?;

		assert_eq!(url.path(), "/");
		assert_eq!(params.get("error"), None);
		assert_eq!(
			serde_json::from_str::<serde_json::Value>(user)?,
			json!({
				"id": "76561198012345678",
				"name": testing::PERSONA_NAME,
				"image": "https://avatars.steamstatic.com/abc_full.jpg",
				"profileUrl": "https://steamcommunity.com/id/someone/",
			}),
		);

		let cookie = set_cookies(&response)
			.into_iter()
			.find(|cookie| cookie.starts_with("steam_user="))
			.ok_or_else(|| color_eyre::eyre::eyre!("no session cookie"))?;

		assert!(cookie.contains("HttpOnly"));
		assert!(cookie.contains("SameSite=Lax"));
		assert!(cookie.contains("Path=/"));
		assert!(cookie.contains("Max-Age=604800"));

		// Steam got the exact payload back, except for the mode
		let form = provider.state.check_authentication_form()?;
		assert_eq!(form.get("openid.mode").map(String::as_str), Some("check_authentication"));
		assert_eq!(form.get("openid.sig").map(String::as_str), Some("c2lnbmF0dXJl+/="));
		assert_eq!(form.get("openid.claimed_id").map(String::as_str), Some(CLAIMED_ID));

		// the cookie works
		let token = cookie
			.split(';')
			.next()
			.unwrap_or_default()
			.to_owned();

		let response = router
			.oneshot(Request::get("/api/user").header(header::COOKIE, token).body(Body::empty())?)
			.await?;

		assert_eq!(response.status(), StatusCode::OK);

		let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
		let body = serde_json::from_slice::<serde_json::Value>(&body)?;

		assert_eq!(body["user"]["id"], "76561198012345678");
		assert_eq!(body["user"]["name"], testing::PERSONA_NAME);

		Ok(())
	}

	#[tokio::test]
	async fn wrong_mode_is_not_verified() -> color_eyre::Result<()>
	{
		let provider = FakeProvider::spawn().await?;
		let router = testing::router(&provider).await?;

		for mode in ["cancel", "setup_needed", ""] {
			let response = get(router.clone(), &callback_uri(mode, CLAIMED_ID)).await?;
			let url = location(&response)?;

			assert_eq!(response.status(), StatusCode::SEE_OTHER);
			assert_eq!(query(&url).get("error").map(String::as_str), Some("steam_auth_failed"));
			assert!(set_cookies(&response).is_empty());
		}

		let response = get(router, "/api/auth/steam/callback").await?;
		assert_eq!(
			query(&location(&response)?).get("error").map(String::as_str),
			Some("steam_auth_failed"),
		);

		assert_eq!(provider.state.check_authentication_calls.load(Ordering::SeqCst), 0);
		assert_eq!(provider.state.player_summary_calls.load(Ordering::SeqCst), 0);

		Ok(())
	}

	#[tokio::test]
	async fn unreachable_provider() -> color_eyre::Result<()>
	{
		let provider = FakeProvider::spawn().await?;
		provider.state.set_check_authentication(StatusCode::INTERNAL_SERVER_ERROR, "oops");

		let router = testing::router(&provider).await?;
		let response = get(router, &callback_uri("id_res", CLAIMED_ID)).await?;

		assert_eq!(
			query(&location(&response)?).get("error").map(String::as_str),
			Some("steam_unreachable"),
		);
		assert_eq!(provider.state.check_authentication_calls.load(Ordering::SeqCst), 1);
		assert_eq!(provider.state.player_summary_calls.load(Ordering::SeqCst), 0);

		Ok(())
	}

	#[tokio::test]
	async fn invalid_assertion() -> color_eyre::Result<()>
	{
		let provider = FakeProvider::spawn().await?;
		provider.state.set_check_authentication(
			StatusCode::OK,
			"ns:http://specs.openid.net/auth/2.0\nis_valid:false\n",
		);

		let router = testing::router(&provider).await?;
		let response = get(router, &callback_uri("id_res", CLAIMED_ID)).await?;

		assert_eq!(
			query(&location(&response)?).get("error").map(String::as_str),
			Some("steam_assertion_invalid"),
		);
		assert!(set_cookies(&response).is_empty());
		assert_eq!(provider.state.player_summary_calls.load(Ordering::SeqCst), 0);

		Ok(())
	}

	#[tokio::test]
	async fn malformed_claimed_id() -> color_eyre::Result<()>
	{
		let provider = FakeProvider::spawn().await?;
		let router = testing::router(&provider).await?;
		let response = get(
			router,
			&callback_uri("id_res", "https://steamcommunity.com/openid/id/12345"),
		)
		.await?;

		assert_eq!(
			query(&location(&response)?).get("error").map(String::as_str),
			Some("no_steam_id"),
		);
		assert_eq!(provider.state.player_summary_calls.load(Ordering::SeqCst), 0);

		Ok(())
	}

	#[tokio::test]
	async fn unknown_user() -> color_eyre::Result<()>
	{
		let provider = FakeProvider::spawn().await?;
		provider
			.state
			.set_player_summaries(StatusCode::OK, json!({ "response": { "players": [] } }));

		let router = testing::router(&provider).await?;
		let response = get(router, &callback_uri("id_res", CLAIMED_ID)).await?;

		assert_eq!(
			query(&location(&response)?).get("error").map(String::as_str),
			Some("steam_user_not_found"),
		);
		assert!(set_cookies(&response).is_empty());

		Ok(())
	}

	#[tokio::test]
	async fn broken_web_api() -> color_eyre::Result<()>
	{
		let provider = FakeProvider::spawn().await?;
		provider
			.state
			.set_player_summaries(StatusCode::FORBIDDEN, json!({ "error": "bad key" }));

		let router = testing::router(&provider).await?;
		let response = get(router, &callback_uri("id_res", CLAIMED_ID)).await?;

		assert_eq!(
			query(&location(&response)?).get("error").map(String::as_str),
			Some("steam_api_error"),
		);

		Ok(())
	}

	#[tokio::test]
	async fn anonymous_user() -> color_eyre::Result<()>
	{
		let provider = FakeProvider::spawn().await?;
		let router = testing::router(&provider).await?;

		for cookie in [None, Some("steam_user=garbage"), Some("steam_user=")] {
			let mut req = Request::get("/api/user");

			if let Some(cookie) = cookie {
				req = req.header(header::COOKIE, cookie);
			}

			let response = router.clone().oneshot(req.body(Body::empty())?).await?;
			let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;

			assert_eq!(serde_json::from_slice::<serde_json::Value>(&body)?, json!({ "user": null }));
		}

		Ok(())
	}

	#[tokio::test]
	async fn logout_clears_cookie() -> color_eyre::Result<()>
	{
		let provider = FakeProvider::spawn().await?;
		let router = testing::router(&provider).await?;
		let response = get(router, "/api/auth/logout").await?;

		assert_eq!(response.status(), StatusCode::SEE_OTHER);
		assert_eq!(location(&response)?.as_str(), "http://localhost:3000/");

		let cookies = set_cookies(&response);

		assert!(cookies
			.iter()
			.any(|cookie| cookie.starts_with("steam_user=;") && cookie.contains("Max-Age=0")));

		Ok(())
	}
}

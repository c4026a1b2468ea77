//! Everything related to [OpenAPI].
//!
//! The [`Spec`] struct in this module lists out all the relevant types, routes,
//! and other metadata that will be included in the document served at
//! `/docs/openapi.json`.
//!
//! [OpenAPI]: https://spec.openapis.org/oas/latest.html

use axum::{routing, Json, Router};
use derive_more::{Deref, DerefMut};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::OpenApi;

/// The route the document is served at.
pub const ROUTE: &str = "/docs/openapi.json";

#[derive(Debug, Clone, Deref, DerefMut, OpenApi)]
#[openapi(
  info(
    title = "Steam Games Verification",
    description = "Log in with Steam and prove which games you own.",
    license(name = "Licensed under the MIT license", url = "https://opensource.org/license/mit"),
  ),
  modifiers(&Security),
  paths(
    crate::services::home::http::get,
    crate::services::auth::http::login,
    crate::services::auth::http::callback,
    crate::services::auth::http::logout,
    crate::services::auth::http::current_user,
    crate::services::verifications::http::verify,
    crate::services::verifications::http::games,
  ),
  components(
    schemas(
      crate::steam_id::SteamID,
      crate::services::steam::UserProfile,
      crate::services::steam::GamesData,
      crate::services::steam::SteamGame,
      crate::services::auth::http::CurrentUser,
      crate::services::verifications::VerificationResult,
    ),
  ),
)]
#[allow(missing_docs)]
pub struct Spec(utoipa::openapi::OpenApi);

impl Spec
{
	/// Creates a new [`Spec`].
	pub fn new() -> Self
	{
		Self(Self::openapi())
	}

	/// Returns an iterator over the registered routes and their allowed HTTP
	/// methods.
	pub fn routes(&self) -> impl Iterator<Item = (&str, String)>
	{
		self.paths.paths.iter().map(|(path, handler)| {
			let methods = handler
				.operations
				.keys()
				.map(|method| format!("{method:?}").to_uppercase())
				.collect::<Vec<_>>()
				.join(", ");

			(path.as_str(), methods)
		})
	}

	/// Generates a JSON representation of this OpenAPI spec.
	pub fn as_json(&self) -> serde_json::Result<String>
	{
		self.to_pretty_json()
	}
}

impl From<Spec> for Router
{
	fn from(spec: Spec) -> Self
	{
		Router::new().route(ROUTE, routing::get(move || async move { Json(spec.0) }))
	}
}

/// Security modifier for the OpenAPI spec.
#[derive(Debug)]
struct Security;

impl utoipa::Modify for Security
{
	fn modify(&self, openapi: &mut utoipa::openapi::OpenApi)
	{
		let session = SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(
			crate::services::auth::session::COOKIE_NAME,
		)));

		openapi
			.components
			.get_or_insert_with(Default::default)
			.add_security_scheme("Browser Session", session);
	}
}

#[cfg(test)]
mod tests
{
	use axum::body::Body;
	use http::{Request, StatusCode};
	use tower::ServiceExt;

	use super::*;

	#[test]
	fn every_route_is_documented() -> color_eyre::Result<()>
	{
		let spec = Spec::new();
		let routes = spec.routes().collect::<Vec<_>>();

		for (path, method) in [
			("/", "GET"),
			("/api/auth/steam", "GET"),
			("/api/auth/steam/callback", "GET"),
			("/api/auth/logout", "GET"),
			("/api/user", "GET"),
			("/api/verify", "POST"),
			("/api/steam/games", "GET"),
		] {
			assert!(
				routes.iter().any(|(p, m)| *p == path && m.contains(method)),
				"{method} {path} is missing",
			);
		}

		serde_json::from_str::<serde_json::Value>(&spec.as_json()?)?;

		Ok(())
	}

	#[tokio::test]
	async fn serves_json() -> color_eyre::Result<()>
	{
		let response = Router::from(Spec::new())
			.oneshot(Request::get(ROUTE).body(Body::empty())?)
			.await?;

		assert_eq!(response.status(), StatusCode::OK);

		let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
		let json = serde_json::from_slice::<serde_json::Value>(&body)?;

		assert_eq!(json["info"]["title"], "Steam Games Verification");
		assert!(json["components"]["securitySchemes"]["Browser Session"].is_object());

		Ok(())
	}
}

//! HTTP handlers for this service.

use axum::extract::State;
use axum::response::Html;
use axum::{routing, Router};

use super::HomeService;

impl From<HomeService> for Router
{
	fn from(svc: HomeService) -> Self
	{
		Router::new().route("/", routing::get(get)).with_state(svc)
	}
}

/// The landing page.
#[tracing::instrument(level = "debug")]
#[utoipa::path(get, path = "/", tag = "Home", responses(
  (status = OK, description = "A page with a \"Sign in through Steam\" button.", body = str, content_type = "text/html"),
))]
pub(crate) async fn get(State(svc): State<HomeService>) -> Html<&'static str>
{
	Html(svc.page())
}

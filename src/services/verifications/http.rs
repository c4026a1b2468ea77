//! HTTP handlers for this service.

use axum::extract::State;
use axum::{routing, Json, Router};

use super::{VerificationResult, VerificationService};
use crate::http::ProblemDetails;
use crate::services::auth::Session;
use crate::services::steam::GamesData;

impl From<VerificationService> for Router
{
	fn from(svc: VerificationService) -> Self
	{
		Router::new()
			.route("/api/verify", routing::post(verify))
			.route("/api/steam/games", routing::get(games))
			.with_state(svc)
	}
}

/// Verify your game library.
///
/// Fetches your games, generates a web proof, and sends both to the
/// configured webhook.
#[tracing::instrument(skip_all, fields(user.id = %session.user().id), err(Debug, level = "debug"))]
#[utoipa::path(
	post,
	path = "/api/verify",
	tag = "Verifications",
	responses(
		(status = 200, body = VerificationResult),
		(status = 401, description = "you are not logged in"),
		(status = 500, description = "no Steam API key configured"),
		(status = 502, description = "Steam could not be reached"),
	)
)]
pub(crate) async fn verify(
	session: Session,
	State(svc): State<VerificationService>,
) -> Result<Json<VerificationResult>, ProblemDetails>
{
	let result = svc.verify(session.user()).await?;

	Ok(Json(result))
}

/// The games you own.
#[tracing::instrument(skip_all, fields(user.id = %session.user().id), err(Debug, level = "debug"))]
#[utoipa::path(
	get,
	path = "/api/steam/games",
	tag = "Verifications",
	responses(
		(status = 200, body = GamesData),
		(status = 401, description = "you are not logged in"),
		(status = 500, description = "no Steam API key configured"),
		(status = 502, description = "Steam could not be reached"),
	)
)]
pub(crate) async fn games(
	session: Session,
	State(svc): State<VerificationService>,
) -> Result<Json<GamesData>, ProblemDetails>
{
	let games = svc.games(session.user().id).await?;

	Ok(Json(games))
}

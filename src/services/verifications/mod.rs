//! The [`VerificationService`] runs the verification pipeline for a logged-in
//! user:
//!
//! 1. fetch their games from Steam
//! 2. ask for a web proof of that data
//! 3. post everything to the webhook, if one is configured
//! 4. store a record in the database, if one is configured
//!
//! Only the first step can fail the whole run; everything after it is best
//! effort and reported in the [`VerificationResult`].

use std::fmt;

use ::http::StatusCode;
use axum::extract::FromRef;
use sqlx::types::Json;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::services::proof::WebProof;
use crate::services::steam::{GamesData, UserProfile};
use crate::services::webhook::WebhookPayload;
use crate::services::{AuthService, ProofService, SteamService, WebhookService};
use crate::steam_id::SteamID;

pub(crate) mod http;

mod error;
pub use error::{Error, Result};

mod models;
pub use models::VerificationResult;

/// A service for verifying users' game libraries.
#[derive(Clone, FromRef)]
#[allow(clippy::missing_docs_in_private_items)]
pub struct VerificationService
{
	steam_svc: SteamService,
	auth_svc: AuthService,
	proof_svc: ProofService,
	webhook_svc: Option<WebhookService>,
	database: Option<PgPool>,
}

impl fmt::Debug for VerificationService
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		f.debug_struct("VerificationService")
			.field("webhook", &self.webhook_svc)
			.field("persistence", &self.database.is_some())
			.finish_non_exhaustive()
	}
}

impl VerificationService
{
	/// Create a new [`VerificationService`].
	pub fn new(
		steam_svc: SteamService,
		auth_svc: AuthService,
		proof_svc: ProofService,
		webhook_svc: Option<WebhookService>,
		database: Option<PgPool>,
	) -> Self
	{
		Self { steam_svc, auth_svc, proof_svc, webhook_svc, database }
	}

	/// Fetches the games a user owns.
	#[tracing::instrument(level = "debug", err(Debug, level = "debug"))]
	pub async fn games(&self, steam_id: SteamID) -> Result<GamesData>
	{
		if !self.steam_svc.has_api_key() {
			return Err(Error::MissingApiKey);
		}

		self.steam_svc
			.fetch_owned_games(steam_id)
			.await
			.map_err(Error::FetchGames)
	}

	/// Runs a verification for `user`.
	#[tracing::instrument(level = "debug", skip_all, fields(user.id = %user.id), err(Debug, level = "debug"))]
	pub async fn verify(&self, user: &UserProfile) -> Result<VerificationResult>
	{
		let games = self.games(user.id).await?;
		let proof = self.generate_proof(user.id).await;

		let webhook_status = match &self.webhook_svc {
			None => None,
			Some(webhook_svc) => {
				let payload = WebhookPayload {
					steam_user: user,
					games: &games,
					vlayer_proof: proof.as_ref(),
					timestamp: OffsetDateTime::now_utc(),
				};

				match webhook_svc.send(&payload).await {
					Ok(outcome) => {
						tracing::info!(status = %outcome.status, success = outcome.success, "webhook responded");
						Some(outcome.status)
					}
					Err(error) => {
						tracing::error!(?error, "webhook failed");
						None
					}
				}
			}
		};

		let webhook_sent = webhook_status.is_some_and(|status| status.is_success());
		let verification_id = self
			.store(user, &games, proof.as_ref(), webhook_sent, webhook_status)
			.await;

		tracing::info!(
			game_count = games.game_count,
			proof = proof.is_some(),
			webhook_sent,
			?verification_id,
			"verification completed",
		);

		Ok(VerificationResult::new(games.game_count, proof, webhook_status, verification_id))
	}

	/// Generates a web proof of the user's games.
	///
	/// Failures are logged and swallowed.
	async fn generate_proof(&self, steam_id: SteamID) -> Option<WebProof>
	{
		let target = match self.steam_svc.owned_games_url(steam_id) {
			Ok(url) => url,
			Err(error) => {
				tracing::warn!(?error, "cannot build proof target");
				return None;
			}
		};

		self.proof_svc
			.generate(&target)
			.await
			.inspect_err(|error| {
				tracing::warn!(?error, "failed to generate web proof, continuing without it");
			})
			.ok()
	}

	/// Stores a verification record, if persistence is enabled.
	///
	/// Returns the new record's ID, or [`None`] if nothing was stored.
	async fn store(
		&self,
		user: &UserProfile,
		games: &GamesData,
		proof: Option<&WebProof>,
		webhook_sent: bool,
		webhook_status: Option<StatusCode>,
	) -> Option<Uuid>
	{
		let database = self.database.as_ref()?;

		// saturate; nobody owns 2^31 games
		let game_count = i32::try_from(games.game_count).unwrap_or(i32::MAX);

		sqlx::query_scalar::<_, Uuid>(
			r"
			INSERT INTO
			  verifications (
			    steam_id,
			    steam_username,
			    steam_avatar,
			    steam_profile_url,
			    game_count,
			    games_data,
			    vlayer_proof,
			    webhook_sent,
			    webhook_status
			  )
			VALUES
			  ($1, $2, $3, $4, $5, $6, $7, $8, $9)
			RETURNING
			  id
			",
		)
		.bind(user.id.to_string())
		.bind(&user.name)
		.bind(user.image.as_str())
		.bind(user.profile_url.as_str())
		.bind(game_count)
		.bind(Json(games))
		.bind(proof.map(Json))
		.bind(webhook_sent.to_string())
		.bind(webhook_status.map(|status| i32::from(status.as_u16())))
		.fetch_one(database)
		.await
		.inspect(|id| tracing::debug!(%id, "stored verification"))
		.inspect_err(|error| tracing::error!(?error, "failed to store verification"))
		.ok()
	}
}

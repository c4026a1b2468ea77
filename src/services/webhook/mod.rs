//! The [`WebhookService`] delivers verification results to a configured URL.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use time::OffsetDateTime;
use url::Url;

use crate::services::proof::WebProof;
use crate::services::steam::{GamesData, UserProfile};

mod error;
pub use error::{Error, Result};

/// How long we wait for the webhook to respond.
pub const TIMEOUT: Duration = Duration::from_secs(10);

/// The `User-Agent` we identify ourselves with.
pub const USER_AGENT: &str = "Steam-Games-Verification/1.0";

/// The JSON body posted to the webhook.
#[derive(Debug, Serialize)]
pub struct WebhookPayload<'a>
{
	/// The verified user.
	pub steam_user: &'a UserProfile,

	/// Their games.
	pub games: &'a GamesData,

	/// A web proof of `games`, if one could be generated.
	pub vlayer_proof: Option<&'a WebProof>,

	/// When the payload was created.
	#[serde(with = "time::serde::rfc3339")]
	pub timestamp: OffsetDateTime,
}

/// What the webhook told us.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebhookOutcome
{
	/// The response status.
	pub status: http::StatusCode,

	/// Whether `status` is 2xx.
	pub success: bool,
}

/// A service for posting to a webhook.
#[derive(Clone)]
#[allow(clippy::missing_docs_in_private_items)]
pub struct WebhookService
{
	url: Arc<Url>,
	http_client: reqwest::Client,
}

impl fmt::Debug for WebhookService
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		f.debug_struct("WebhookService")
			.field("host", &self.url.host_str())
			.finish_non_exhaustive()
	}
}

impl WebhookService
{
	/// Creates a new [`WebhookService`].
	pub fn new(url: Url, http_client: reqwest::Client) -> Self
	{
		Self { url: Arc::new(url), http_client }
	}

	/// Posts `payload` to the webhook.
	///
	/// A non-2xx response is not an error; see [`WebhookOutcome::success`].
	#[tracing::instrument(level = "debug", skip_all, fields(status), err(Debug, level = "debug"))]
	pub async fn send(&self, payload: &WebhookPayload<'_>) -> Result<WebhookOutcome>
	{
		let response = self
			.http_client
			.post(self.url.as_str())
			.header(http::header::USER_AGENT, USER_AGENT)
			.timeout(TIMEOUT)
			.json(payload)
			.send()
			.await?;

		let status = response.status();

		tracing::Span::current().record("status", status.as_u16());

		Ok(WebhookOutcome { status, success: status.is_success() })
	}
}

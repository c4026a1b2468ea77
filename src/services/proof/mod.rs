//! The [`ProofService`] asks a third-party web-proof generator to notarize a
//! Steam Web API request.
//!
//! We never look inside the proof; it is passed along as-is.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use url::Url;

mod error;
pub use error::{Error, Result};

/// An opaque web proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WebProof(pub serde_json::Value);

/// Request body for the proof generator.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::missing_docs_in_private_items)]
struct ProofRequest<'a>
{
	url: &'a str,
	method: &'static str,
	notary_url: &'a str,
	headers: &'a [(&'a str, &'a str)],
}

/// A service for generating web proofs.
#[derive(Clone)]
#[allow(clippy::missing_docs_in_private_items)]
pub struct ProofService
{
	service_url: Arc<Url>,
	notary_url: Arc<Url>,
	http_client: reqwest::Client,
}

impl fmt::Debug for ProofService
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		f.debug_struct("ProofService")
			.field("service_url", &format_args!("{:?}", self.service_url.as_str()))
			.field("notary_url", &format_args!("{:?}", self.notary_url.as_str()))
			.finish_non_exhaustive()
	}
}

impl ProofService
{
	/// Creates a new [`ProofService`].
	pub fn new(service_url: Url, notary_url: Url, http_client: reqwest::Client) -> Self
	{
		Self {
			service_url: Arc::new(service_url),
			notary_url: Arc::new(notary_url),
			http_client,
		}
	}

	/// Generates a proof for a `GET` request to `target`.
	///
	/// `target` usually contains our Steam API key, so it is not logged.
	#[tracing::instrument(level = "debug", skip_all, err(Debug, level = "debug"))]
	pub async fn generate(&self, target: &Url) -> Result<WebProof>
	{
		tracing::debug!(url = %self.service_url, "requesting web proof");

		let response = self
			.http_client
			.post(self.service_url.as_str())
			.json(&ProofRequest {
				url: target.as_str(),
				method: "GET",
				notary_url: self.notary_url.as_str(),
				headers: &[],
			})
			.send()
			.await?;

		if let Err(error) = response.error_for_status_ref() {
			let response_body = response.text().await.ok();

			tracing::debug!(?error, ?response_body, "proof generator rejected request");

			return Err(Error::Http(error));
		}

		let proof = response.json::<WebProof>().await?;

		tracing::debug!("generated web proof");

		Ok(proof)
	}
}

//! Request / Response types for this service.

use serde::Serialize;
use uuid::Uuid;

use crate::services::proof::WebProof;

/// Message reported when the webhook accepted the results.
pub const MESSAGE_WEBHOOK_SENT: &str = "Verification completed and webhook sent successfully";

/// Message reported otherwise.
pub const MESSAGE_NO_WEBHOOK: &str = "Verification completed (no webhook configured)";

/// The result of a verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[schema(example = json!({
  "success": true,
  "message": "Verification completed and webhook sent successfully",
  "webhook_sent": true,
  "webhook_status": 200,
  "games_sent": 42,
  "vlayer_proof": "Generated successfully",
  "vlayer_proof_data": { "presentation": "..." },
  "verification_id": "01902b5c-5c7e-7c3a-a1b2-0123456789ab"
}))]
pub struct VerificationResult
{
	/// Always `true`; failures are reported as problem details instead.
	pub success: bool,

	/// A human-readable summary.
	pub message: String,

	/// Whether the webhook responded with a 2xx status.
	pub webhook_sent: bool,

	/// The webhook's response status, if it responded at all.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub webhook_status: Option<u16>,

	/// How many games were sent.
	pub games_sent: u32,

	/// `Generated successfully` or `Failed to generate`.
	pub vlayer_proof: String,

	/// The proof itself.
	#[schema(value_type = Option<Object>)]
	pub vlayer_proof_data: Option<WebProof>,

	/// ID of the stored record, if persistence is enabled and succeeded.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub verification_id: Option<Uuid>,
}

impl VerificationResult
{
	/// Summarizes a verification run.
	pub fn new(
		games_sent: u32,
		proof: Option<WebProof>,
		webhook_status: Option<http::StatusCode>,
		verification_id: Option<Uuid>,
	) -> Self
	{
		let webhook_sent = webhook_status.is_some_and(|status| status.is_success());

		Self {
			success: true,
			message: if webhook_sent { MESSAGE_WEBHOOK_SENT } else { MESSAGE_NO_WEBHOOK }.to_owned(),
			webhook_sent,
			webhook_status: webhook_status.map(|status| status.as_u16()),
			games_sent,
			vlayer_proof: if proof.is_some() { "Generated successfully" } else { "Failed to generate" }
				.to_owned(),
			vlayer_proof_data: proof,
			verification_id,
		}
	}
}

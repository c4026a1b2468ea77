//! HTTP Problem Details [RFC 9457].
//!
//! The [`ProblemDetails`] can be used for HTTP responses, as it implements
//! [`IntoResponse`]. It can be created from any error type that implements
//! [`IntoProblemDetails`].
//!
//! The login callback is the one place that never produces these; it always
//! redirects back to the frontend instead.
//!
//! [RFC 9457]: https://www.rfc-editor.org/rfc/rfc9457.html

use std::panic::Location;

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tap::Tap;

pub(crate) mod problem_type;
pub use problem_type::ProblemType;

mod extension_members;
pub use extension_members::ExtensionMembers;

mod into_problem_details;
pub use into_problem_details::IntoProblemDetails;

/// HTTP Problem Details, as described in [RFC 9457].
///
/// [RFC 9457]: https://www.rfc-editor.org/rfc/rfc9457.html
#[derive(Debug, Serialize)]
pub struct ProblemDetails
{
	/// The problem type.
	#[serde(rename = "type")]
	problem_type: ProblemType,

	/// The HTTP status code the response should have.
	#[serde(skip_serializing)]
	status: http::StatusCode,

	/// Short, human-readable, description of the problem type.
	title: &'static str,

	/// Short, human-readable, error message describing this particular problem.
	detail: String,

	/// Any extra details that will be included in the response body.
	#[serde(flatten)]
	extra: ExtensionMembers,
}

impl ProblemDetails
{
	/// Returns the problem type.
	pub const fn problem_type(&self) -> ProblemType
	{
		self.problem_type
	}

	/// Returns the HTTP status code of the response.
	pub const fn status(&self) -> http::StatusCode
	{
		self.status
	}
}

impl<E> From<E> for ProblemDetails
where
	E: IntoProblemDetails,
{
	#[track_caller]
	fn from(error: E) -> Self
	{
		tracing::debug!(loc = %Location::caller(), ?error, "creating error response");

		let problem_type = error.problem_type();
		let status = problem_type.status();
		let title = problem_type.title();
		let detail = error.to_string();
		let extra = ExtensionMembers::new().tap_mut(|ext| {
			error.add_extension_members(ext);
		});

		Self { problem_type, status, title, detail, extra }
	}
}

impl IntoResponse for ProblemDetails
{
	fn into_response(self) -> Response
	{
		let status = self.status;
		let content_type = "application/problem+json";
		let headers = [(http::header::CONTENT_TYPE, content_type)];

		(status, headers, Json(self)).into_response()
	}
}

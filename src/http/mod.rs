//! HTTP-related utilities shared by all services.

pub mod problem_details;
pub use problem_details::ProblemDetails;

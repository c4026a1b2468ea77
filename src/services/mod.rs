//! Application services.
//!
//! These contain the core business logic.
//!
//! If a service directly maps to an HTTP route, it will have an `http` module
//! containing the handlers and an `Into<axum::Router>` implementation.

pub mod steam;
pub use steam::SteamService;

pub mod auth;
pub use auth::AuthService;

pub mod proof;
pub use proof::ProofService;

pub mod webhook;
pub use webhook::WebhookService;

pub mod verifications;
pub use verifications::VerificationService;

pub mod home;
pub use home::HomeService;

//! A tiny landing page.
//!
//! The real frontend lives elsewhere; this exists so the login flow can be
//! exercised with nothing but a browser.

use std::fmt;

use axum::extract::FromRef;

pub(crate) mod http;

/// The page served at `/`.
const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <title>Steam Games Verification</title>
  </head>
  <body>
    <h1>Steam Games Verification</h1>
    <a href="/api/auth/steam">
      <img src="https://steamcommunity-a.akamaihd.net/public/images/signinthroughsteam/sits_01.png" alt="Sign in through Steam">
    </a>
  </body>
</html>
"#;

/// A service that serves the landing page.
#[derive(Clone, Copy, FromRef)]
#[allow(clippy::missing_docs_in_private_items)]
pub struct HomeService {}

impl fmt::Debug for HomeService
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		f.debug_struct("HomeService").finish_non_exhaustive()
	}
}

impl HomeService
{
	/// Create a new [`HomeService`].
	#[tracing::instrument]
	pub fn new() -> Self
	{
		Self {}
	}

	/// Returns the landing page.
	pub const fn page(&self) -> &'static str
	{
		PAGE
	}
}

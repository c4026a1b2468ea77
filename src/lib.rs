#![doc = include_str!("../README.md")]
// TODO: remove once https://github.com/tokio-rs/tracing/issues/2912 lands
#![allow(clippy::blocks_in_conditions)]

use std::fmt::Write;
use std::future::Future;
use std::net::SocketAddr;

use anyhow::Context;
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;

pub mod runtime;
pub use runtime::Config;

pub mod logging;
pub mod middleware;
pub mod http;
pub mod openapi;
pub mod database;
pub mod steam_id;
pub mod services;

#[cfg(test)]
mod testing;

use self::http::problem_details::problem_type;
use self::services::{
	AuthService,
	HomeService,
	ProofService,
	SteamService,
	VerificationService,
	WebhookService,
};

/// Run the server.
///
/// This function will not exit until SIGINT or SIGTERM is received.
/// If you want to supply a custom signal for graceful shutdown, use
/// [`run_until()`] instead.
pub async fn run(config: Config) -> anyhow::Result<()>
{
	run_until(config, runtime::signals::shutdown()).await
}

/// Run the server until a given future completes.
pub async fn run_until<Until>(config: Config, until: Until) -> anyhow::Result<()>
where
	Until: Future<Output = ()> + Send + 'static,
{
	tracing::debug!(?config, "establishing TCP connection");

	let tcp_listener = TcpListener::bind(config.addr)
		.await
		.context("bind tcp socket")?;

	let addr = tcp_listener.local_addr().context("get tcp addr")?;
	let router = server(&config).await?;

	tracing::info!(
		%addr,
		public_url = %config.public_url,
		prod = cfg!(feature = "production"),
		"listening for requests",
	);

	axum::serve(tcp_listener, router.into_make_service_with_connect_info::<SocketAddr>())
		.with_graceful_shutdown(until)
		.await
		.context("run http server")?;

	tracing::info!("shut down");

	Ok(())
}

/// Runs the necessary setup and returns the application's [`Router`].
async fn server(config: &Config) -> anyhow::Result<Router>
{
	let http_client = reqwest::Client::new();
	let database = match &config.database_url {
		Some(url) => Some(database::create_pool(url).await.context("connect to database")?),
		None => {
			tracing::warn!("`DATABASE_URL` is not set; verifications will not be stored");
			None
		}
	};

	if config.steam_api_key.is_none() {
		tracing::warn!("`STEAM_API_KEY` is not set; logins and verifications will fail");
	}

	if config.webhook_url.is_none() {
		tracing::warn!("`WEBHOOK_URL` is not set; verifications will not be forwarded");
	}

	let spec = openapi::Spec::new();
	let mut routes_message = String::from("registering routes:\n");

	for (path, methods) in spec.routes() {
		writeln!(&mut routes_message, "    • {path} => [{methods}]")?;
	}

	tracing::info!("{routes_message}");

	problem_type::set_base_url(config.public_url.clone());

	Services::new(config, http_client, database).map(Services::into_router)
}

/// Every service, wired up.
#[derive(Debug)]
pub(crate) struct Services
{
	/// `/`
	pub(crate) home: HomeService,

	/// Login and sessions.
	pub(crate) auth: AuthService,

	/// The verification pipeline.
	pub(crate) verifications: VerificationService,
}

impl Services
{
	/// Creates every service from `config`.
	pub(crate) fn new(
		config: &Config,
		http_client: reqwest::Client,
		database: Option<PgPool>,
	) -> anyhow::Result<Self>
	{
		let steam_svc = SteamService::new(
			config.steam_openid_url.clone(),
			&config.steam_api_url,
			config.steam_api_key.clone(),
			&config.public_url,
			http_client.clone(),
		)
		.context("initialize steam service")?;

		let auth_svc = AuthService::new(steam_svc.clone(), &config.session_secret, &config.public_url)
			.context("initialize auth service")?;

		let proof_svc = ProofService::new(
			config.proof_service_url.clone(),
			config.proof_notary_url.clone(),
			http_client.clone(),
		);

		let webhook_svc = config
			.webhook_url
			.clone()
			.map(|url| WebhookService::new(url, http_client));

		let verification_svc =
			VerificationService::new(steam_svc, auth_svc.clone(), proof_svc, webhook_svc, database);

		Ok(Self { home: HomeService::new(), auth: auth_svc, verifications: verification_svc })
	}

	/// Turns every service into one [`Router`].
	pub(crate) fn into_router(self) -> Router
	{
		Router::new()
			.merge(Router::from(self.home))
			.merge(Router::from(self.auth))
			.merge(Router::from(self.verifications))
			.merge(Router::from(openapi::Spec::new()))
			.layer(middleware::logging::layer!())
	}
}

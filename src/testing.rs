//! This module contains helpers for unit/integration tests.
//!
//! [`FakeProvider`] stands in for every external HTTP service we talk to:
//! Steam's OpenID endpoint, Steam's Web API, the proof generator, and the
//! webhook. It counts calls, so tests can assert that a stage was never
//! reached.

use std::collections::BTreeMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::extract::State;
use axum::{routing, Json, Router};
use color_eyre::eyre::{eyre, OptionExt};
use http::{header, HeaderMap, StatusCode};
use serde_json::{json, Value};
use sqlx::PgPool;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

use crate::runtime::Config;
use crate::services::auth::{session, Jwt};
use crate::services::steam::UserProfile;
use crate::services::VerificationService;

/// Base64 secret used for signing sessions in tests.
pub const SESSION_SECRET: &str = "Zm9vYmFyYmF6";

/// The SteamID every fake login resolves to.
pub const STEAM_ID: &str = "76561198012345678";

/// The name the fake Web API reports.
pub const PERSONA_NAME: &str = "Ünïcødé 名前 🎮";

/// A config pointing every external service at `provider`.
pub fn config(provider: Url) -> Config
{
	Config {
		addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 0)),
		public_url: Url::parse("http://localhost:3000").expect("valid url"),
		steam_api_key: Some(String::from("test-api-key")),
		session_secret: String::from(SESSION_SECRET),
		webhook_url: None,
		database_url: None,
		proof_service_url: provider.join("/proof").expect("valid url"),
		proof_notary_url: Url::parse("https://notary.example.org/").expect("valid url"),
		steam_openid_url: provider.join("/openid/login").expect("valid url"),
		steam_api_url: provider,
	}
}

/// The full application, talking to `provider`, with a webhook configured.
pub async fn router(provider: &FakeProvider) -> color_eyre::Result<Router>
{
	let mut config = config(provider.base_url());
	config.webhook_url = Some(provider.url("/webhook")?);

	crate::Services::new(&config, reqwest::Client::new(), None)
		.map(crate::Services::into_router)
		.map_err(|error| eyre!("{error:?}"))
}

/// A [`VerificationService`] built from `config`, storing results in
/// `database` if given.
pub fn services(config: &Config, database: Option<PgPool>) -> color_eyre::Result<VerificationService>
{
	crate::Services::new(config, reqwest::Client::new(), database)
		.map(|services| services.verifications)
		.map_err(|error| eyre!("{error:?}"))
}

/// A profile with the fake SteamID.
pub fn user_profile(name: &str) -> color_eyre::Result<UserProfile>
{
	Ok(UserProfile {
		id: STEAM_ID.parse()?,
		name: name.to_owned(),
		image: Url::parse("https://avatars.steamstatic.com/abc_full.jpg")?,
		profile_url: Url::parse("https://steamcommunity.com/id/someone/")?,
	})
}

/// A `Cookie` header value carrying a valid session for `user`.
pub fn session_cookie(user: &UserProfile) -> color_eyre::Result<String>
{
	let token = jsonwebtoken::encode(
		&jsonwebtoken::Header::default(),
		&Jwt::new(user, Duration::from_secs(60)),
		&jsonwebtoken::EncodingKey::from_base64_secret(SESSION_SECRET)?,
	)?;

	Ok(format!("{}={token}", session::COOKIE_NAME))
}

/// What the fake Web API answers `GetOwnedGames` with.
pub fn owned_games() -> Value
{
	json!({
		"response": {
			"game_count": 2,
			"games": [
				{
					"appid": 730,
					"name": "Counter-Strike 2",
					"playtime_forever": 1234,
					"img_icon_url": "8dbc71957312bbd3baea65848b545be9eae2a355",
					"rtime_last_played": 1718452800
				},
				{ "appid": 10, "playtime_forever": 0 }
			]
		}
	})
}

/// What the fake proof generator answers with.
pub fn proof() -> Value
{
	json!({
		"presentation": "deadbeef",
		"meta": { "notaryUrl": "https://notary.example.org/" },
		"version": "0.1.0-alpha.11"
	})
}

/// An in-process HTTP server impersonating every external service.
#[derive(Debug)]
pub struct FakeProvider
{
	/// Call counters, canned responses and captured requests.
	pub state: Arc<FakeState>,

	/// Where the server is listening.
	addr: SocketAddr,

	/// The server task.
	server: JoinHandle<()>,
}

impl FakeProvider
{
	/// Starts a new server on a random port.
	pub async fn spawn() -> color_eyre::Result<Self>
	{
		let state = Arc::new(FakeState::default());
		let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
		let addr = listener.local_addr()?;
		let router = Router::new()
			.route("/openid/login", routing::post(check_authentication))
			.route("/ISteamUser/GetPlayerSummaries/v0002/", routing::get(player_summaries))
			.route("/IPlayerService/GetOwnedGames/v0001/", routing::get(owned_games_handler))
			.route("/proof", routing::post(proof_handler))
			.route("/webhook", routing::post(webhook))
			.with_state(Arc::clone(&state));

		let server = tokio::spawn(async move {
			if let Err(error) = axum::serve(listener, router).await {
				tracing::error!(%error, "fake provider crashed");
			}
		});

		Ok(Self { state, addr, server })
	}

	/// The server's origin.
	pub fn base_url(&self) -> Url
	{
		Url::parse(&format!("http://{}", self.addr)).expect("valid url")
	}

	/// An absolute URL on the server.
	pub fn url(&self, path: &str) -> color_eyre::Result<Url>
	{
		Ok(self.base_url().join(path)?)
	}
}

impl Drop for FakeProvider
{
	fn drop(&mut self)
	{
		self.server.abort();
	}
}

/// Shared state of a [`FakeProvider`].
#[derive(Debug)]
pub struct FakeState
{
	/// `check_authentication` requests received.
	pub check_authentication_calls: AtomicUsize,

	/// `GetPlayerSummaries` requests received.
	pub player_summary_calls: AtomicUsize,

	/// `GetOwnedGames` requests received.
	pub owned_games_calls: AtomicUsize,

	/// Proof requests received.
	pub proof_calls: AtomicUsize,

	/// Webhook deliveries received.
	pub webhook_calls: AtomicUsize,

	/// What to respond with.
	responses: Mutex<Responses>,

	/// What we received.
	captured: Mutex<Captured>,
}

/// Canned responses.
#[derive(Debug)]
#[allow(clippy::missing_docs_in_private_items)]
struct Responses
{
	check_authentication: (StatusCode, String),
	player_summaries: (StatusCode, Value),
	owned_games: (StatusCode, Value),
	proof: (StatusCode, Value),
	webhook: StatusCode,
}

/// Captured request bodies.
#[derive(Debug, Default)]
#[allow(clippy::missing_docs_in_private_items)]
struct Captured
{
	check_authentication_form: Option<BTreeMap<String, String>>,
	webhook: Option<(Option<String>, Value)>,
	proof_request: Option<Value>,
}

impl Default for FakeState
{
	fn default() -> Self
	{
		let player_summaries = json!({
			"response": {
				"players": [{
					"steamid": STEAM_ID,
					"personaname": PERSONA_NAME,
					"avatar": "https://avatars.steamstatic.com/abc.jpg",
					"avatarfull": "https://avatars.steamstatic.com/abc_full.jpg",
					"profileurl": "https://steamcommunity.com/id/someone/"
				}]
			}
		});

		Self {
			check_authentication_calls: AtomicUsize::new(0),
			player_summary_calls: AtomicUsize::new(0),
			owned_games_calls: AtomicUsize::new(0),
			proof_calls: AtomicUsize::new(0),
			webhook_calls: AtomicUsize::new(0),
			responses: Mutex::new(Responses {
				check_authentication: (
					StatusCode::OK,
					String::from("ns:http://specs.openid.net/auth/2.0\nis_valid:true\n"),
				),
				player_summaries: (StatusCode::OK, player_summaries),
				owned_games: (StatusCode::OK, owned_games()),
				proof: (StatusCode::OK, proof()),
				webhook: StatusCode::OK,
			}),
			captured: Mutex::new(Captured::default()),
		}
	}
}

impl FakeState
{
	/// Locks the canned responses.
	fn responses(&self) -> MutexGuard<'_, Responses>
	{
		self.responses.lock().unwrap_or_else(PoisonError::into_inner)
	}

	/// Locks the captured requests.
	fn captured(&self) -> MutexGuard<'_, Captured>
	{
		self.captured.lock().unwrap_or_else(PoisonError::into_inner)
	}

	/// Changes the `check_authentication` response.
	pub fn set_check_authentication(&self, status: StatusCode, body: &str)
	{
		self.responses().check_authentication = (status, body.to_owned());
	}

	/// Changes the `GetPlayerSummaries` response.
	pub fn set_player_summaries(&self, status: StatusCode, body: Value)
	{
		self.responses().player_summaries = (status, body);
	}

	/// Changes the `GetOwnedGames` response.
	pub fn set_owned_games(&self, status: StatusCode, body: Value)
	{
		self.responses().owned_games = (status, body);
	}

	/// Changes the proof generator's response.
	pub fn set_proof(&self, status: StatusCode, body: Value)
	{
		self.responses().proof = (status, body);
	}

	/// Changes the webhook's response status.
	pub fn set_webhook_status(&self, status: StatusCode)
	{
		self.responses().webhook = status;
	}

	/// The last form sent to `check_authentication`.
	pub fn check_authentication_form(&self) -> color_eyre::Result<BTreeMap<String, String>>
	{
		self.captured()
			.check_authentication_form
			.clone()
			.ok_or_eyre("check_authentication was never called")
	}

	/// The `User-Agent` and body of the last webhook delivery.
	pub fn last_webhook(&self) -> color_eyre::Result<(Option<String>, Value)>
	{
		self.captured()
			.webhook
			.clone()
			.ok_or_eyre("webhook was never called")
	}

	/// The body of the last proof request.
	pub fn last_proof_request(&self) -> color_eyre::Result<Value>
	{
		self.captured()
			.proof_request
			.clone()
			.ok_or_eyre("proof generator was never called")
	}
}

/// Fake `openid/login` in `check_authentication` mode.
async fn check_authentication(State(state): State<Arc<FakeState>>, body: String) -> (StatusCode, String)
{
	state.check_authentication_calls.fetch_add(1, Ordering::SeqCst);
	state.captured().check_authentication_form = serde_urlencoded::from_str(&body).ok();
	state.responses().check_authentication.clone()
}

/// Fake `ISteamUser/GetPlayerSummaries`.
async fn player_summaries(State(state): State<Arc<FakeState>>) -> (StatusCode, Json<Value>)
{
	state.player_summary_calls.fetch_add(1, Ordering::SeqCst);

	let (status, body) = state.responses().player_summaries.clone();
	(status, Json(body))
}

/// Fake `IPlayerService/GetOwnedGames`.
async fn owned_games_handler(State(state): State<Arc<FakeState>>) -> (StatusCode, Json<Value>)
{
	state.owned_games_calls.fetch_add(1, Ordering::SeqCst);

	let (status, body) = state.responses().owned_games.clone();
	(status, Json(body))
}

/// Fake proof generator.
async fn proof_handler(
	State(state): State<Arc<FakeState>>,
	Json(request): Json<Value>,
) -> (StatusCode, Json<Value>)
{
	state.proof_calls.fetch_add(1, Ordering::SeqCst);
	state.captured().proof_request = Some(request);

	let (status, body) = state.responses().proof.clone();
	(status, Json(body))
}

/// Fake webhook.
async fn webhook(State(state): State<Arc<FakeState>>, headers: HeaderMap, Json(body): Json<Value>) -> StatusCode
{
	state.webhook_calls.fetch_add(1, Ordering::SeqCst);

	let user_agent = headers
		.get(header::USER_AGENT)
		.and_then(|value| value.to_str().ok())
		.map(ToOwned::to_owned);

	state.captured().webhook = Some((user_agent, body));
	state.responses().webhook
}

/// Global constructor that will run before tests.
#[ctor::ctor]
fn ctor()
{
	use tracing_subscriber::fmt::format::FmtSpan;
	use tracing_subscriber::EnvFilter;

	color_eyre::install().expect("failed to install color-eyre");
	tracing_subscriber::fmt()
		.compact()
		.with_ansi(true)
		.with_file(true)
		.with_level(true)
		.with_line_number(true)
		.with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
		.with_target(true)
		.with_test_writer()
		.with_thread_ids(true)
		.with_thread_names(true)
		.with_env_filter(EnvFilter::from_default_env())
		.init();
}

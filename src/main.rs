use anyhow::Context;
use steam_verifier::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()>
{
	if let Err(error) = dotenvy::dotenv() {
		eprintln!("WARNING: Failed to load `.env` file: {error}");
	}

	let _guard = steam_verifier::logging::init().context("initialize logging")?;
	let config = Config::new().context("load config")?;

	if cfg!(not(feature = "production")) {
		tracing::warn!("running in development mode");
	}

	steam_verifier::run(config).await
}

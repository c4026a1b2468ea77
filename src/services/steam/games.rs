//! Owned games, as reported by `IPlayerService/GetOwnedGames`.

use serde::{Deserialize, Deserializer, Serialize};

/// A user's game library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[schema(example = json!({
  "game_count": 1,
  "games": [{
    "appid": 730,
    "name": "Counter-Strike 2",
    "playtime_forever": 12345,
    "img_icon_url": "8dbc71957312bbd3baea65848b545be9eae2a355"
  }]
}))]
pub struct GamesData
{
	/// How many games the user owns.
	pub game_count: u32,

	/// The games themselves.
	pub games: Vec<SteamGame>,
}

/// A single owned game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[allow(missing_docs)]
pub struct SteamGame
{
	pub appid: u32,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,

	/// Total playtime in minutes.
	#[serde(default)]
	pub playtime_forever: u32,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub img_icon_url: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub img_logo_url: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub playtime_windows_forever: Option<u32>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub playtime_mac_forever: Option<u32>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub playtime_linux_forever: Option<u32>,

	/// Unix timestamp of the last time the game was played.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub rtime_last_played: Option<u64>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub playtime_disconnected: Option<u32>,
}

impl<'de> Deserialize<'de> for GamesData
{
	#[allow(clippy::missing_docs_in_private_items)]
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		#[derive(Deserialize)]
		struct Helper
		{
			#[serde(default)]
			game_count: Option<u32>,

			#[serde(default)]
			games: Vec<SteamGame>,
		}

		let Helper { game_count, games } = Helper::deserialize(deserializer)?;
		let game_count = match game_count {
			Some(count) => count,
			None => u32::try_from(games.len()).map_err(serde::de::Error::custom)?,
		};

		Ok(Self { game_count, games })
	}
}

/// Response body of `IPlayerService/GetOwnedGames`.
///
/// Private profiles come back as `{"response":{}}`.
#[derive(Debug, Deserialize)]
pub(super) struct OwnedGames
{
	/// The actual data.
	pub(super) response: GamesData,
}

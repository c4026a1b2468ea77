//! This module contains the [`UserProfile`] type, which represents a user's
//! public profile information.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::steam_id::SteamID;

/// A Steam user's public profile.
///
/// This is what we store in the session and hand back to the frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[schema(example = json!({
  "id": "76561198282622073",
  "name": "AlphaKeks",
  "image": "https://avatars.steamstatic.com/da7587d32ed9cd619be8ecec623ce68a1a0afd63_full.jpg",
  "profileUrl": "https://steamcommunity.com/id/AlphaKeks/"
}))]
pub struct UserProfile
{
	/// The user's SteamID.
	pub id: SteamID,

	/// The user's display name.
	pub name: String,

	/// URL to the user's full-size avatar.
	pub image: Url,

	/// URL to the user's Steam profile.
	#[serde(rename = "profileUrl")]
	pub profile_url: Url,
}

/// Response body of `ISteamUser/GetPlayerSummaries`.
#[derive(Debug, Deserialize)]
pub(super) struct PlayerSummaries
{
	/// The actual data.
	response: PlayerSummariesResponse,
}

/// The `response` object of [`PlayerSummaries`].
#[derive(Debug, Deserialize)]
struct PlayerSummariesResponse
{
	/// One entry per requested SteamID that exists.
	#[serde(default)]
	players: Vec<PlayerSummary>,
}

/// A single player record.
#[derive(Debug, Deserialize)]
#[allow(clippy::missing_docs_in_private_items)]
struct PlayerSummary
{
	personaname: String,
	avatarfull: Url,
	profileurl: Url,
}

impl PlayerSummaries
{
	/// Turns the first player record into a [`UserProfile`].
	///
	/// The profile's ID is always `steam_id`, the one we verified.
	pub(super) fn into_profile(self, steam_id: SteamID) -> Option<UserProfile>
	{
		self.response
			.players
			.into_iter()
			.next()
			.map(|player| UserProfile {
				id: steam_id,
				name: player.personaname,
				image: player.avatarfull,
				profile_url: player.profileurl,
			})
	}
}

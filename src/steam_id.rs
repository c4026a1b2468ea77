//! This module contains the [`SteamID`] type.
//!
//! Steam identifies accounts by a 64-bit "community ID", which is always
//! rendered as 17 decimal digits (e.g. `76561198012345678`). This is the only
//! representation this application ever receives from Steam, and the only one
//! it hands out again.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use utoipa::openapi::schema::Schema;
use utoipa::openapi::{ObjectBuilder, RefOr, SchemaType};
use utoipa::ToSchema;

/// A Steam account's 64-bit community ID.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SteamID(u64);

/// The amount of digits in a stringified [`SteamID`].
pub const DIGITS: usize = 17;

/// Error returned by [`SteamID`]'s [`FromStr`] implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseSteamIDError
{
	/// The input did not have exactly [`DIGITS`] characters.
	#[error("expected {DIGITS} digits, got {actual}")]
	Length
	{
		/// The amount of characters we actually got.
		actual: usize,
	},

	/// The input contained something other than ASCII digits.
	#[error("SteamID must only contain ASCII digits")]
	NotNumeric,
}

impl SteamID
{
	/// Returns the raw 64-bit representation.
	pub const fn as_u64(&self) -> u64
	{
		self.0
	}
}

impl fmt::Debug for SteamID
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		write!(f, "SteamID({self})")
	}
}

impl fmt::Display for SteamID
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		write!(f, "{:0width$}", self.0, width = DIGITS)
	}
}

impl FromStr for SteamID
{
	type Err = ParseSteamIDError;

	fn from_str(value: &str) -> Result<Self, Self::Err>
	{
		if value.len() != DIGITS {
			return Err(ParseSteamIDError::Length { actual: value.chars().count() });
		}

		if !value.bytes().all(|byte| byte.is_ascii_digit()) {
			return Err(ParseSteamIDError::NotNumeric);
		}

		value
			.parse::<u64>()
			.map(Self)
			.map_err(|_| ParseSteamIDError::NotNumeric)
	}
}

impl Serialize for SteamID
{
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for SteamID
{
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		String::deserialize(deserializer)?
			.parse::<Self>()
			.map_err(serde::de::Error::custom)
	}
}

impl<'s> ToSchema<'s> for SteamID
{
	fn schema() -> (&'s str, RefOr<Schema>)
	{
		(
			"SteamID",
			ObjectBuilder::new()
				.description(Some("A Steam account's 64-bit community ID"))
				.schema_type(SchemaType::String)
				.example(Some(serde_json::json!("76561198012345678")))
				.build()
				.into(),
		)
	}
}

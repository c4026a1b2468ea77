//! Signed [JWT]s.
//!
//! [JWT]: https://jwt.io

use std::time::Duration;
use std::{fmt, ops};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A JWT.
///
/// Encode and decode these using [`AuthService::encode_jwt()`] and
/// [`AuthService::decode_jwt()`].
///
/// [`AuthService::encode_jwt()`]: super::AuthService::encode_jwt
/// [`AuthService::decode_jwt()`]: super::AuthService::decode_jwt
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwt<T>
{
	/// The payload to encode in the token.
	#[serde(flatten)]
	payload: T,

	/// Timestamp (in seconds) of when this token will expire.
	#[serde(rename = "exp")]
	expiration_timestamp: u64,
}

impl<T> Jwt<T>
{
	/// Creates a new [`Jwt`].
	pub fn new(payload: T, expires_after: Duration) -> Self
	{
		Self {
			payload,
			expiration_timestamp: jsonwebtoken::get_current_timestamp() + expires_after.as_secs(),
		}
	}

	/// Returns a reference to the inner payload.
	pub const fn payload(&self) -> &T
	{
		&self.payload
	}

	/// Returns the inner payload.
	pub fn into_payload(self) -> T
	{
		self.payload
	}

	/// Returns a unix timestamp of when this token will expire.
	pub const fn timestamp(&self) -> u64
	{
		self.expiration_timestamp
	}

	/// Returns an [`OffsetDateTime`] of when this token will expire.
	///
	/// [`None`] if the timestamp is out of range.
	pub fn expires_on(&self) -> Option<OffsetDateTime>
	{
		i64::try_from(self.expiration_timestamp)
			.ok()
			.and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok())
	}
}

impl<T> fmt::Debug for Jwt<T>
where
	T: fmt::Debug,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		f.debug_struct("Jwt")
			.field("payload", self.payload())
			.field("expires_on", &self.expires_on())
			.finish()
	}
}

impl<T> ops::Deref for Jwt<T>
{
	type Target = T;

	fn deref(&self) -> &Self::Target
	{
		self.payload()
	}
}

//! Wire models for the legal-assistant HTTP contract.

// self
use crate::{
	_prelude::*,
	auth::{ChatId, CredentialPair, FolderId, MessageId, SessionUser, TokenSecret, UserId},
};

/// Payload returned by the login and registration endpoints.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthResponse {
	/// Issued access/refresh pair.
	#[serde(flatten)]
	pub credentials: CredentialPair,
	/// Account details; absence means the sign-in must be treated as failed.
	#[serde(default)]
	pub user: Option<SessionUser>,
}

/// Payload returned by the token-refresh endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct RenewedTokens {
	/// Freshly minted access token.
	pub access: TokenSecret,
	/// Rotated refresh token, when the server rotates on every renewal.
	#[serde(default)]
	pub refresh: Option<TokenSecret>,
}

/// Folder grouping chats for one user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
	/// Server identifier.
	pub id: FolderId,
	/// Display name.
	pub name: String,
	/// Creation instant.
	#[serde(with = "timestamp")]
	pub created_at: OffsetDateTime,
	/// Owning account, when the server includes it.
	#[serde(default)]
	pub user: Option<UserId>,
	/// Chats embedded by the server in folder listings.
	#[serde(default)]
	pub chats: Vec<Chat>,
}

/// Chat thread inside a folder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
	/// Server identifier.
	pub id: ChatId,
	/// Display name.
	pub name: String,
	/// Parent folder.
	pub folder: FolderId,
	/// Creation instant.
	#[serde(with = "timestamp")]
	pub created_at: OffsetDateTime,
	/// Number of stored messages, when the server includes it.
	#[serde(default)]
	pub message_count: Option<u64>,
}

/// Stored question/answer pair of a chat transcript.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
	/// Server identifier.
	pub id: MessageId,
	/// Question asked by the user.
	pub question: String,
	/// Answer produced by the server; opaque text.
	pub answer: String,
	/// Instant the pair was stored.
	#[serde(with = "timestamp")]
	pub timestamp: OffsetDateTime,
	/// Owning chat.
	pub chat: ChatId,
}

/// Answer returned by the question endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Answer {
	/// Answer text; opaque to the client.
	pub answer: String,
}

/// Server acknowledgement of an uploaded document; the shape is server-defined.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct UploadReceipt(pub serde_json::Value);

#[derive(Serialize)]
pub(crate) struct LoginBody<'a> {
	pub username: &'a str,
	pub password: &'a str,
}

#[derive(Serialize)]
pub(crate) struct RegisterBody<'a> {
	pub username: &'a str,
	pub email: &'a str,
	pub password: &'a str,
}

#[derive(Serialize)]
pub(crate) struct RefreshBody<'a> {
	pub refresh: &'a str,
}

#[derive(Serialize)]
pub(crate) struct NewFolderBody<'a> {
	pub name: &'a str,
}

#[derive(Serialize)]
pub(crate) struct NewChatBody<'a> {
	pub name: &'a str,
	pub folder_id: FolderId,
}

#[derive(Serialize)]
pub(crate) struct QuestionBody<'a> {
	pub question: &'a str,
	pub chat_id: ChatId,
}

// Server instants are RFC 3339, but a backend running without time-zone support emits naive
// `YYYY-MM-DDTHH:MM:SS[.ffffff]` values; those are read as UTC.
mod timestamp {
	// crates.io
	use serde::{Deserializer, Serializer, de::Error as _};
	use time::{PrimitiveDateTime, format_description::well_known::Rfc3339, macros::format_description};
	// self
	use crate::_prelude::*;

	pub(super) fn serialize<S>(instant: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		time::serde::rfc3339::serialize(instant, serializer)
	}

	pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw = String::deserialize(deserializer)?;

		parse(&raw).map_err(D::Error::custom)
	}

	pub(super) fn parse(raw: &str) -> Result<OffsetDateTime, time::error::Parse> {
		OffsetDateTime::parse(raw, &Rfc3339).or_else(|_| {
			PrimitiveDateTime::parse(
				raw,
				format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"),
			)
			.map(PrimitiveDateTime::assume_utc)
		})
	}
}

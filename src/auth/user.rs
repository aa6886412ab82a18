//! Session user record cached next to the credentials.

// self
use crate::{_prelude::*, auth::UserId};

/// Role reported by the server for the signed-in account.
///
/// The server stores `Admin`/`Citizen`; older payloads used lowercase values, so parsing trims
/// and ignores case. Role checks on this side only steer navigation, the server enforces access.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum UserRole {
	/// Administrator allowed to upload source documents.
	Admin,
	/// Regular signed-in user.
	Citizen,
	/// Any role this client does not know about.
	Other(String),
}
impl UserRole {
	/// Returns the label as the server spells it.
	pub fn as_str(&self) -> &str {
		match self {
			Self::Admin => "Admin",
			Self::Citizen => "Citizen",
			Self::Other(raw) => raw,
		}
	}
}
impl From<&str> for UserRole {
	fn from(value: &str) -> Self {
		let trimmed = value.trim();

		if trimmed.eq_ignore_ascii_case("admin") {
			Self::Admin
		} else if trimmed.eq_ignore_ascii_case("citizen") {
			Self::Citizen
		} else {
			Self::Other(trimmed.to_owned())
		}
	}
}
impl Display for UserRole {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl Serialize for UserRole {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_str(self.as_str())
	}
}
impl<'de> Deserialize<'de> for UserRole {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		let raw = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;

		Ok(Self::from(raw.as_ref()))
	}
}

/// Account details returned by login and cached under the `user` key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
	/// Server-side account identifier.
	pub id: UserId,
	/// Login name.
	pub username: String,
	/// Contact address; may be empty.
	#[serde(default)]
	pub email: String,
	/// Role used for navigation hints.
	pub role: UserRole,
}
impl SessionUser {
	/// Returns `true` when the account may open the administrative view.
	pub fn is_admin(&self) -> bool {
		self.role == UserRole::Admin
	}
}

//! Strongly typed numeric identifiers for server-side records.

// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(u64);
		impl $name {
			/// Wraps a raw identifier issued by the server.
			pub const fn new(value: u64) -> Self {
				Self(value)
			}

			/// Returns the raw identifier.
			pub const fn get(self) -> u64 {
				self.0
			}
		}
		impl From<u64> for $name {
			fn from(value: u64) -> Self {
				Self(value)
			}
		}
		impl From<$name> for u64 {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				Display::fmt(&self.0, f)
			}
		}
		impl FromStr for $name {
			type Err = std::num::ParseIntError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				s.trim().parse().map(Self)
			}
		}
	};
}

def_id! { UserId, "Identifier of an account on the legal-assistant server.", "User" }
def_id! { FolderId, "Identifier of a folder grouping chats.", "Folder" }
def_id! { ChatId, "Identifier of a chat thread inside a folder.", "Chat" }
def_id! { MessageId, "Identifier of a stored question/answer pair.", "Message" }

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_serialize_as_bare_numbers() {
		let folder: FolderId = serde_json::from_str("42").expect("Folder id should deserialize.");

		assert_eq!(folder.get(), 42);
		assert_eq!(serde_json::to_string(&ChatId::new(7)).expect("Chat id should serialize."), "7");
		assert!(serde_json::from_str::<ChatId>("\"7\"").is_err());
	}

	#[test]
	fn identifiers_format_with_kind() {
		assert_eq!(format!("{:?}", MessageId::new(3)), "Message(3)");
		assert_eq!(UserId::new(9).to_string(), "9");
		assert_eq!(" 12 ".parse::<FolderId>().expect("Padded id should parse."), FolderId::new(12));
	}
}

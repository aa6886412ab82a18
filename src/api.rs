//! Typed operations of the legal-assistant HTTP contract.
//!
//! Each submodule extends [`Gateway`](crate::gateway::Gateway) with the calls for one area of
//! the API. Authenticated calls go through [`Gateway::send`](crate::gateway::Gateway::send) and
//! therefore share its renewal behavior; sign-in calls use the public path.

pub mod models;

mod admin;
mod auth;
mod chats;
mod folders;

pub use admin::PdfDocument;
pub use models::{AuthResponse, Answer, Chat, ChatMessage, Folder, RenewedTokens, UploadReceipt};

// self
use crate::_prelude::*;

// Rejects values that are empty once surrounding whitespace is removed.
fn require_text<'a>(field: &'static str, value: &'a str) -> Result<&'a str> {
	let trimmed = value.trim();

	if trimmed.is_empty() {
		return Err(Error::InvalidInput { field, reason: "must not be blank" });
	}

	Ok(trimmed)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn blank_text_is_rejected() {
		assert_eq!(require_text("name", "  Ugovori ").expect("Padded text is accepted."), "Ugovori");
		assert!(matches!(
			require_text("name", " \t"),
			Err(Error::InvalidInput { field: "name", .. })
		));
	}
}

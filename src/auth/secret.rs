//! Secure token secret wrapper that redacts sensitive material.

// self
use crate::_prelude::*;

/// Redacted token secret wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Formats the value of an `Authorization` header carrying this token.
	pub fn bearer(&self) -> String {
		format!("Bearer {}", self.0)
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Access/refresh token pair issued at login or registration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
	/// Short-lived token attached to every API request.
	pub access: TokenSecret,
	/// Longer-lived token used only to mint a new access token.
	pub refresh: TokenSecret,
}
impl CredentialPair {
	/// Builds a pair from raw token strings.
	pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
		Self { access: TokenSecret::new(access), refresh: TokenSecret::new(refresh) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = TokenSecret::new("super-secret");

		assert_eq!(format!("{secret:?}"), "TokenSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
		assert_eq!(secret.bearer(), "Bearer super-secret");
	}

	#[test]
	fn credential_pair_debug_stays_redacted() {
		let pair = CredentialPair::new("a1", "r1");
		let rendered = format!("{pair:?}");

		assert!(!rendered.contains("a1"));
		assert!(!rendered.contains("r1"));
	}
}

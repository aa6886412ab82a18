//! Storage contracts and built-in store implementations for persisted session state.
//!
//! Stores hold a flat key/value map with three well-known keys (`access_token`,
//! `refresh_token`, `user`). Values are opaque strings; [`crate::session::Session`] owns
//! their meaning.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::_prelude::*;

/// Boxed future returned by [`SessionStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Persistence contract for session state shared by login, logout, and renewal.
pub trait SessionStore
where
	Self: Send + Sync,
{
	/// Fetches the value stored under `key`, if present.
	fn get(&self, key: StoreKey) -> StoreFuture<'_, Option<String>>;

	/// Persists or replaces the value stored under `key`.
	fn set(&self, key: StoreKey, value: String) -> StoreFuture<'_, ()>;

	/// Deletes the value stored under `key`; missing keys are not an error.
	fn remove(&self, key: StoreKey) -> StoreFuture<'_, ()>;

	/// Deletes every persisted value.
	fn clear(&self) -> StoreFuture<'_, ()>;
}

/// Well-known keys persisted by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKey {
	/// Current access token.
	AccessToken,
	/// Current refresh token.
	RefreshToken,
	/// Serialized [`crate::auth::SessionUser`].
	User,
}
impl StoreKey {
	/// Every key, in a stable order.
	pub const ALL: [StoreKey; 3] = [StoreKey::AccessToken, StoreKey::RefreshToken, StoreKey::User];

	/// Returns the storage name of the key.
	pub const fn as_str(self) -> &'static str {
		match self {
			StoreKey::AccessToken => "access_token",
			StoreKey::RefreshToken => "refresh_token",
			StoreKey::User => "user",
		}
	}
}
impl Display for StoreKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Error type produced by [`SessionStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

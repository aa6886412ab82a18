//! Thread-safe in-memory [`SessionStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	store::{SessionStore, StoreError, StoreFuture, StoreKey},
};

type StoreMap = Arc<RwLock<HashMap<StoreKey, String>>>;

/// Thread-safe storage backend that keeps session values in-process.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Returns a copy of the stored value without going through the async contract.
	pub fn peek(&self, key: StoreKey) -> Option<String> {
		self.0.read().get(&key).cloned()
	}

	/// Returns `true` when no value is stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	fn set_now(map: StoreMap, key: StoreKey, value: String) -> Result<(), StoreError> {
		map.write().insert(key, value);

		Ok(())
	}

	fn remove_now(map: StoreMap, key: StoreKey) -> Result<(), StoreError> {
		map.write().remove(&key);

		Ok(())
	}
}
impl SessionStore for MemoryStore {
	fn get(&self, key: StoreKey) -> StoreFuture<'_, Option<String>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.read().get(&key).cloned()) })
	}

	fn set(&self, key: StoreKey, value: String) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move { Self::set_now(map, key, value) })
	}

	fn remove(&self, key: StoreKey) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move { Self::remove_now(map, key) })
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			map.write().clear();

			Ok(())
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn set_get_remove_round_trip() {
		let store = MemoryStore::default();

		store
			.set(StoreKey::AccessToken, "access-1".into())
			.await
			.expect("Saving access token into memory store should succeed.");

		let fetched = store
			.get(StoreKey::AccessToken)
			.await
			.expect("Fetching access token from memory store should succeed.");

		assert_eq!(fetched.as_deref(), Some("access-1"));
		assert_eq!(store.peek(StoreKey::RefreshToken), None);

		store.remove(StoreKey::AccessToken).await.expect("Removing a key should succeed.");
		store.remove(StoreKey::AccessToken).await.expect("Removing a missing key should succeed.");

		assert!(store.is_empty());
	}

	#[tokio::test]
	async fn clear_drops_every_key() {
		let store = MemoryStore::default();

		for key in StoreKey::ALL {
			store.set(key, format!("{key}-value")).await.expect("Seeding store should succeed.");
		}

		store.clear().await.expect("Clearing memory store should succeed.");

		for key in StoreKey::ALL {
			assert_eq!(store.peek(key), None, "{key} should be gone after clear.");
		}
	}
}

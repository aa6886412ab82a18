//! Simple file-backed [`SessionStore`] so sessions survive process restarts.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	store::{SessionStore, StoreError, StoreFuture, StoreKey},
};

/// Persists session values to a JSON file after each mutation.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	inner: Arc<RwLock<BTreeMap<StoreKey, String>>>,
}
impl FileStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing data.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	/// Returns the snapshot location.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_snapshot(path: &Path) -> Result<BTreeMap<StoreKey, String>, StoreError> {
		if !path.exists() {
			return Ok(BTreeMap::new());
		}

		let metadata = path.metadata().map_err(|e| StoreError::Backend {
			message: format!("Failed to inspect {}: {e}", path.display()),
		})?;

		if metadata.len() == 0 {
			return Ok(BTreeMap::new());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
			message: format!("Failed to parse {}: {e}", path.display()),
		})
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}
		Ok(())
	}

	fn persist_locked(&self, contents: &BTreeMap<StoreKey, String>) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let serialized =
			serde_json::to_vec_pretty(contents).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize store snapshot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}

	fn mutate<F>(&self, apply: F) -> Result<(), StoreError>
	where
		F: FnOnce(&mut BTreeMap<StoreKey, String>) -> bool,
	{
		let mut guard = self.inner.write();

		if apply(&mut *guard) { self.persist_locked(&guard) } else { Ok(()) }
	}
}
impl SessionStore for FileStore {
	fn get(&self, key: StoreKey) -> StoreFuture<'_, Option<String>> {
		Box::pin(async move { Ok(self.inner.read().get(&key).cloned()) })
	}

	fn set(&self, key: StoreKey, value: String) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			self.mutate(|map| map.insert(key, value.clone()).as_ref() != Some(&value))
		})
	}

	fn remove(&self, key: StoreKey) -> StoreFuture<'_, ()> {
		Box::pin(async move { self.mutate(|map| map.remove(&key).is_some()) })
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			self.mutate(|map| {
				let dirty = !map.is_empty();

				map.clear();

				dirty
			})
		})
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::{env, process};
	// crates.io
	use tokio::runtime::Runtime;
	// self
	use super::*;

	fn temp_path() -> PathBuf {
		let unique = format!(
			"legal_assistant_client_file_store_{}_{}.json",
			process::id(),
			OffsetDateTime::now_utc().unix_timestamp_nanos(),
		);

		env::temp_dir().join(unique)
	}

	#[test]
	fn save_and_reload_round_trip() {
		let path = temp_path();
		let store = FileStore::open(&path).expect("Failed to open file store snapshot.");
		let rt = Runtime::new().expect("Failed to build Tokio runtime for file store test.");

		rt.block_on(store.set(StoreKey::AccessToken, "access-token".into()))
			.expect("Failed to save access token to file store.");
		rt.block_on(store.set(StoreKey::RefreshToken, "refresh-token".into()))
			.expect("Failed to save refresh token to file store.");
		drop(store);

		let reopened = FileStore::open(&path).expect("Failed to reopen file store snapshot.");
		let fetched = rt
			.block_on(reopened.get(StoreKey::RefreshToken))
			.expect("Failed to fetch refresh token from file store.")
			.expect("File store lost value after reopen.");

		assert_eq!(fetched, "refresh-token");

		rt.block_on(reopened.clear()).expect("Failed to clear file store.");

		let emptied = FileStore::open(&path).expect("Failed to reopen cleared file store.");

		assert_eq!(
			rt.block_on(emptied.get(StoreKey::AccessToken)).expect("Fetch should succeed."),
			None
		);

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary file store snapshot {}: {e}", path.display())
		});
	}

	#[test]
	fn corrupt_snapshot_is_reported() {
		let path = temp_path();

		fs::write(&path, b"not json").expect("Failed to write corrupt snapshot fixture.");

		let err = FileStore::open(&path).expect_err("Corrupt snapshot should be rejected.");

		assert!(matches!(err, StoreError::Serialization { .. }));

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary file store snapshot {}: {e}", path.display())
		});
	}
}

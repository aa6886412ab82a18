//! Session state owned by one component and shared by handle.
//!
//! [`Session`] is the only code path that reads or writes the persisted credentials and the
//! cached user record. Login establishes it, renewal rotates the access token, and logout or
//! a failed renewal tears it down.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::{
	_prelude::*,
	api::{AuthResponse, RenewedTokens},
	auth::{CredentialPair, SessionUser, TokenSecret},
	store::{SessionStore, StoreError, StoreKey},
};

/// Handle to the persisted session state.
///
/// Clones share the store and the epoch counter.
#[derive(Clone)]
pub struct Session {
	store: Arc<dyn SessionStore>,
	epoch: Arc<AtomicU64>,
}
impl Session {
	/// Wraps the provided store.
	pub fn new(store: Arc<dyn SessionStore>) -> Self {
		Self { store, epoch: Default::default() }
	}

	/// Returns a counter that advances every time the session is established or cleared.
	///
	/// Token rotation keeps the epoch, so two reads with the same epoch belong to the same
	/// sign-in.
	pub fn epoch(&self) -> u64 {
		self.epoch.load(Ordering::Acquire)
	}

	/// Returns the current access token, if any.
	pub async fn access_token(&self) -> Result<Option<TokenSecret>> {
		self.secret(StoreKey::AccessToken).await
	}

	/// Returns the current refresh token, if any.
	pub async fn refresh_token(&self) -> Result<Option<TokenSecret>> {
		self.secret(StoreKey::RefreshToken).await
	}

	/// Returns both tokens when the pair is complete.
	pub async fn credentials(&self) -> Result<Option<CredentialPair>> {
		let access = self.access_token().await?;
		let refresh = self.refresh_token().await?;

		Ok(access.zip(refresh).map(|(access, refresh)| CredentialPair { access, refresh }))
	}

	/// Returns the cached user record, if one is stored and parses.
	pub async fn user(&self) -> Result<Option<SessionUser>> {
		match self.store.get(StoreKey::User).await? {
			Some(raw) => Ok(Some(decode_user(&raw)?)),
			None => Ok(None),
		}
	}

	/// Persists a successful login or registration.
	///
	/// A response without a user record is a failed sign-in: nothing is persisted and
	/// [`Error::MissingUser`] is returned.
	pub async fn establish(&self, response: AuthResponse) -> Result<SessionUser> {
		let AuthResponse { credentials, user } = response;
		let user = user.ok_or(Error::MissingUser)?;
		let encoded = serde_json::to_string(&user).map_err(|e| StoreError::Serialization {
			message: format!("Failed to encode session user: {e}"),
		})?;

		let written = async {
			self.store.set(StoreKey::AccessToken, credentials.access.expose().to_owned()).await?;
			self.store.set(StoreKey::RefreshToken, credentials.refresh.expose().to_owned()).await?;
			self.store.set(StoreKey::User, encoded).await
		}
		.await;

		self.advance_epoch();
		written?;

		Ok(user)
	}

	/// Overwrites the stored access token.
	pub async fn replace_access_token(&self, token: &TokenSecret) -> Result<()> {
		self.store.set(StoreKey::AccessToken, token.expose().to_owned()).await?;

		Ok(())
	}

	/// Applies a renewal result, keeping the refresh token unless the server rotated it.
	pub async fn rotate(&self, renewed: &RenewedTokens) -> Result<()> {
		self.replace_access_token(&renewed.access).await?;

		if let Some(refresh) = renewed.refresh.as_ref() {
			self.store.set(StoreKey::RefreshToken, refresh.expose().to_owned()).await?;
		}

		Ok(())
	}

	/// Deletes every persisted credential and the cached user.
	pub async fn clear(&self) -> Result<()> {
		let cleared = self.store.clear().await;

		self.advance_epoch();
		cleared?;

		Ok(())
	}

	/// Restores a previously established session.
	///
	/// The user counts as signed in only when both a user record and an access token are
	/// stored. A user record that no longer parses wipes the store.
	pub async fn restore(&self) -> Result<Option<SessionUser>> {
		let raw_user = self.store.get(StoreKey::User).await?;
		let token = self.store.get(StoreKey::AccessToken).await?;
		let (Some(raw_user), Some(token)) = (raw_user, token) else {
			return Ok(None);
		};

		if is_unset(&raw_user) || is_unset(&token) {
			return Ok(None);
		}

		match decode_user(&raw_user) {
			Ok(user) => Ok(Some(user)),
			Err(_) => {
				self.clear().await?;

				Ok(None)
			},
		}
	}

	fn advance_epoch(&self) {
		self.epoch.fetch_add(1, Ordering::AcqRel);
	}

	async fn secret(&self, key: StoreKey) -> Result<Option<TokenSecret>> {
		let value = self.store.get(key).await?;

		Ok(value.filter(|v| !is_unset(v)).map(TokenSecret::new))
	}
}
impl Debug for Session {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("Session(..)")
	}
}

// Values written by a broken sign-in may be the literal string "undefined".
fn is_unset(value: &str) -> bool {
	value.is_empty() || value == "undefined"
}

fn decode_user(raw: &str) -> Result<SessionUser, StoreError> {
	serde_json::from_str(raw).map_err(|e| StoreError::Serialization {
		message: format!("Failed to decode session user: {e}"),
	})
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		auth::{UserId, UserRole},
		store::MemoryStore,
	};

	fn session() -> (Session, Arc<MemoryStore>) {
		let backend = Arc::new(MemoryStore::default());

		(Session::new(backend.clone()), backend)
	}

	fn login_response(with_user: bool) -> AuthResponse {
		AuthResponse {
			credentials: CredentialPair::new("a1", "r1"),
			user: with_user.then(|| SessionUser {
				id: UserId::new(1),
				username: "pravnik".into(),
				email: "pravnik@primer.rs".into(),
				role: UserRole::Citizen,
			}),
		}
	}

	#[tokio::test]
	async fn establish_persists_tokens_and_user() {
		let (session, backend) = session();
		let user = session
			.establish(login_response(true))
			.await
			.expect("Establishing a complete session should succeed.");

		assert_eq!(user.username, "pravnik");
		assert_eq!(backend.peek(StoreKey::AccessToken).as_deref(), Some("a1"));
		assert_eq!(backend.peek(StoreKey::RefreshToken).as_deref(), Some("r1"));
		assert_eq!(
			session.restore().await.expect("Restore should succeed."),
			Some(user),
			"Restored user should match the established one."
		);
	}

	#[tokio::test]
	async fn establish_without_user_persists_nothing() {
		let (session, backend) = session();
		let err = session
			.establish(login_response(false))
			.await
			.expect_err("A response without user must fail the sign-in.");

		assert!(matches!(err, Error::MissingUser));
		assert!(backend.is_empty());
	}

	#[tokio::test]
	async fn restore_requires_user_and_token() {
		let (session, backend) = session();

		session.establish(login_response(true)).await.expect("Seeding session should succeed.");
		backend.remove(StoreKey::AccessToken).await.expect("Dropping access token should succeed.");

		assert_eq!(session.restore().await.expect("Restore should succeed."), None);
		assert!(backend.peek(StoreKey::User).is_some(), "Incomplete session is left untouched.");
	}

	#[tokio::test]
	async fn restore_wipes_unreadable_user() {
		let (session, backend) = session();

		backend.set(StoreKey::AccessToken, "a1".into()).await.expect("Seeding should succeed.");
		backend.set(StoreKey::User, "{broken".into()).await.expect("Seeding should succeed.");

		assert_eq!(session.restore().await.expect("Restore should succeed."), None);
		assert!(backend.is_empty());
	}

	#[tokio::test]
	async fn rotate_keeps_refresh_unless_replaced() {
		let (session, backend) = session();

		session.establish(login_response(true)).await.expect("Seeding session should succeed.");
		session
			.rotate(&RenewedTokens { access: TokenSecret::new("a2"), refresh: None })
			.await
			.expect("Rotation should succeed.");

		assert_eq!(backend.peek(StoreKey::AccessToken).as_deref(), Some("a2"));
		assert_eq!(backend.peek(StoreKey::RefreshToken).as_deref(), Some("r1"));

		session
			.rotate(&RenewedTokens {
				access: TokenSecret::new("a3"),
				refresh: Some(TokenSecret::new("r3")),
			})
			.await
			.expect("Rotation should succeed.");

		let pair = session
			.credentials()
			.await
			.expect("Credentials should load.")
			.expect("Both tokens should be present.");

		assert_eq!(pair.access.expose(), "a3");
		assert_eq!(pair.refresh.expose(), "r3");
	}

	#[tokio::test]
	async fn epoch_tracks_sign_in_and_sign_out_only() {
		let (session, _backend) = session();

		assert_eq!(session.epoch(), 0);

		session.establish(login_response(true)).await.expect("Seeding session should succeed.");

		let signed_in = session.epoch();

		session
			.rotate(&RenewedTokens { access: TokenSecret::new("a2"), refresh: None })
			.await
			.expect("Rotation should succeed.");

		assert_eq!(session.epoch(), signed_in, "Rotation stays within the same sign-in.");

		session.clone().clear().await.expect("Clearing should succeed.");

		assert!(session.epoch() > signed_in, "Clones share the epoch counter.");
	}

	#[tokio::test]
	async fn literal_undefined_counts_as_absent() {
		let (session, backend) = session();

		backend
			.set(StoreKey::AccessToken, "undefined".into())
			.await
			.expect("Seeding should succeed.");

		assert_eq!(session.access_token().await.expect("Read should succeed."), None);
	}
}

//! Sign-in, registration, and sign-out.

// self
use crate::{
	_prelude::*,
	api::{
		AuthResponse, require_text,
		models::{LoginBody, RegisterBody},
	},
	auth::SessionUser,
	gateway::Gateway,
	http::{ApiRequest, HttpTransport},
	route::Route,
};

impl<C> Gateway<C>
where
	C: ?Sized + HttpTransport,
{
	/// Exchanges username and password for a session.
	///
	/// On success the tokens and user record are persisted and the user is returned. A
	/// response without a user record yields [`Error::MissingUser`] and persists nothing.
	pub async fn login(&self, username: &str, password: &str) -> Result<SessionUser> {
		let username = require_text("username", username)?;

		if password.is_empty() {
			return Err(Error::InvalidInput { field: "password", reason: "must not be empty" });
		}

		let path = self.descriptor.endpoints.login.as_str();
		let request = ApiRequest::post(path).json(&LoginBody { username, password })?;

		self.establish(path, request).await
	}

	/// Creates an account and signs in with it.
	pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<SessionUser> {
		let username = require_text("username", username)?;
		let email = require_text("email", email)?;

		if password.is_empty() {
			return Err(Error::InvalidInput { field: "password", reason: "must not be empty" });
		}

		let path = self.descriptor.endpoints.register.as_str();
		let request = ApiRequest::post(path).json(&RegisterBody { username, email, password })?;

		self.establish(path, request).await
	}

	/// Ends the session locally and signals navigation to the sign-in view.
	///
	/// The server keeps no session state, so nothing is sent.
	pub async fn logout(&self) -> Result<()> {
		self.session.clear().await?;
		self.navigator.navigate(Route::Auth);

		Ok(())
	}

	/// Restores a persisted session, returning the signed-in user when one is complete.
	pub async fn restore_session(&self) -> Result<Option<SessionUser>> {
		self.session.restore().await
	}

	async fn establish(&self, path: &str, request: ApiRequest) -> Result<SessionUser> {
		let response: AuthResponse = self.send_public(request).await?.json(path)?;

		self.session.establish(response).await
	}
}

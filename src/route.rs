//! Navigation hints derived from the in-page location fragment.
//!
//! Routing here is advisory: it picks which view a front end should show and where to send
//! the user after the session ends. The server remains the authority on what a role may do.

// self
use crate::{_prelude::*, auth::SessionUser};

/// Views a front end can show.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
	/// Folder sidebar and chat transcript; the default view.
	Chat,
	/// Administrative document upload.
	Admin,
	/// Sign-in and registration.
	Auth,
}
impl Route {
	/// Returns the location fragment for the route.
	pub const fn fragment(self) -> &'static str {
		match self {
			Route::Chat => "#/",
			Route::Admin => "#/admin",
			Route::Auth => "#/auth",
		}
	}

	/// Parses a location fragment; anything unrecognized maps to the default view.
	pub fn from_fragment(fragment: &str) -> Self {
		match fragment.trim() {
			"#/admin" => Route::Admin,
			"#/auth" => Route::Auth,
			_ => Route::Chat,
		}
	}

	/// Picks the view to show for `fragment` given the signed-in user.
	///
	/// Without a user only the sign-in view is reachable; the admin view falls back to the
	/// chat view for every role other than admin.
	pub fn resolve(fragment: &str, user: Option<&SessionUser>) -> Self {
		let Some(user) = user else {
			return Route::Auth;
		};

		match Self::from_fragment(fragment) {
			Route::Admin if !user.is_admin() => Route::Chat,
			Route::Auth => Route::Chat,
			route => route,
		}
	}
}
impl Display for Route {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.fragment())
	}
}

/// Receives redirect signals raised by the client (e.g. after the session is torn down).
pub trait Navigator
where
	Self: Send + Sync,
{
	/// Requests navigation to `route`.
	fn navigate(&self, route: Route);
}

/// Navigator that discards every signal.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopNavigator;
impl Navigator for NoopNavigator {
	fn navigate(&self, _route: Route) {}
}

/// Thread-safe slot recording the most recent navigation request.
///
/// Front ends poll it with [`take`](RouteSignal::take) from their event loop; clones share the
/// same slot.
#[derive(Clone, Debug, Default)]
pub struct RouteSignal(Arc<Mutex<Option<Route>>>);
impl RouteSignal {
	/// Returns the pending route, if any, consuming it from the slot.
	pub fn take(&self) -> Option<Route> {
		self.0.lock().take()
	}

	/// Returns the pending route without consuming it.
	pub fn peek(&self) -> Option<Route> {
		*self.0.lock()
	}
}
impl Navigator for RouteSignal {
	fn navigate(&self, route: Route) {
		*self.0.lock() = Some(route);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::{UserId, UserRole};

	fn user(role: UserRole) -> SessionUser {
		SessionUser { id: UserId::new(1), username: "u".into(), email: String::new(), role }
	}

	#[test]
	fn fragments_round_trip() {
		for route in [Route::Chat, Route::Admin, Route::Auth] {
			assert_eq!(Route::from_fragment(route.fragment()), route);
		}

		assert_eq!(Route::from_fragment(""), Route::Chat);
		assert_eq!(Route::from_fragment("#/unknown"), Route::Chat);
	}

	#[test]
	fn admin_view_is_gated_by_role() {
		let admin = user(UserRole::Admin);
		let citizen = user(UserRole::Citizen);

		assert_eq!(Route::resolve("#/admin", Some(&admin)), Route::Admin);
		assert_eq!(Route::resolve("#/admin", Some(&citizen)), Route::Chat);
		assert_eq!(Route::resolve("#/admin", None), Route::Auth);
		assert_eq!(Route::resolve("#/auth", Some(&citizen)), Route::Chat);
	}

	#[test]
	fn route_signal_keeps_latest_request() {
		let signal = RouteSignal::default();
		let shared = signal.clone();

		shared.navigate(Route::Admin);
		shared.navigate(Route::Auth);

		assert_eq!(signal.peek(), Some(Route::Auth));
		assert_eq!(signal.take(), Some(Route::Auth));
		assert_eq!(signal.take(), None);
	}
}

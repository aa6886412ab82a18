//! Typed async client for the legal-assistant chat API.
//!
//! Requests carry the session's bearer token, and an expired token is renewed once through a
//! single in-flight renewal before the request is replayed. On top of that the crate exposes
//! folder and chat navigation, question answering, and admin document upload.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod descriptor;
pub mod error;
pub mod gateway;
pub mod http;
pub mod obs;
pub mod route;
pub mod session;
pub mod store;
#[cfg(feature = "reqwest")]
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests.

	pub use crate::_prelude::*;

	// self
	use crate::{
		descriptor::ApiDescriptor,
		gateway::Gateway,
		http::ReqwestHttpClient,
		route::RouteSignal,
		session::Session,
		store::{MemoryStore, SessionStore},
	};

	/// Gateway type alias used by reqwest-backed integration tests.
	pub type ReqwestTestGateway = Gateway<ReqwestHttpClient>;

	/// Handles returned alongside a test gateway so tests can inspect side effects.
	#[derive(Clone, Debug)]
	pub struct TestHarness {
		/// Backing store shared with the gateway's session.
		pub store: Arc<MemoryStore>,
		/// Navigation slot receiving redirect signals.
		pub routes: RouteSignal,
	}

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Builds a descriptor rooted at the provided mock server base URL.
	pub fn test_descriptor(base_url: &str) -> ApiDescriptor {
		let url = Url::parse(base_url).expect("Mock server base URL should parse.");

		ApiDescriptor::builder(url).build().expect("Test descriptor should build successfully.")
	}

	/// Constructs a [`Gateway`] backed by an in-memory store, a recording navigator, and the
	/// reqwest transport used across integration tests.
	pub fn build_reqwest_test_gateway(base_url: &str) -> (ReqwestTestGateway, TestHarness) {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn SessionStore> = store_backend.clone();
		let routes = RouteSignal::default();
		let gateway = Gateway::with_http_client(
			test_descriptor(base_url),
			Session::new(store),
			test_reqwest_http_client(),
		)
		.with_navigator(routes.clone());

		(gateway, TestHarness { store: store_backend, routes })
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};

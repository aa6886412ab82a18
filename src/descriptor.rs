//! API descriptor: validated base URL plus the endpoint table of the HTTP contract.
//!
//! Paths are stored relative to the base URL so deployments mounted under a path prefix
//! (`https://host/app/`) resolve every endpoint below that prefix.

/// Builder API for assembling API descriptors.
pub mod builder;

pub use builder::*;

// self
use crate::{
	_prelude::*,
	auth::{ChatId, FolderId},
	error::ConfigError,
};

/// Endpoint paths consumed by the client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
	/// Credential exchange for username/password.
	pub login: String,
	/// Account creation.
	pub register: String,
	/// Access-token renewal; never subject to renewal itself.
	pub token_refresh: String,
	/// Folder collection (list and create).
	pub folders: String,
	/// Chat collection (create); per-chat history hangs below it.
	pub chats: String,
	/// Question answering.
	pub chat: String,
	/// Administrative document upload.
	pub admin_upload: String,
}
impl Endpoints {
	/// Chats listed under one folder.
	pub fn folder_chats(&self, folder: FolderId) -> String {
		format!("{}{folder}/chats/", self.folders)
	}

	/// Stored transcript of one chat.
	pub fn chat_history(&self, chat: ChatId) -> String {
		format!("{}{chat}/history/", self.chats)
	}

	fn entries(&self) -> [(&'static str, &str); 7] {
		[
			("login", &self.login),
			("register", &self.register),
			("token_refresh", &self.token_refresh),
			("folders", &self.folders),
			("chats", &self.chats),
			("chat", &self.chat),
			("admin_upload", &self.admin_upload),
		]
	}
}
impl Default for Endpoints {
	fn default() -> Self {
		Self {
			login: "/api/login/".into(),
			register: "/api/register/".into(),
			token_refresh: "/api/token/refresh/".into(),
			folders: "/api/folders/".into(),
			chats: "/api/chats/".into(),
			chat: "/api/chat/".into(),
			admin_upload: "/api/admin/upload/".into(),
		}
	}
}

/// Immutable API descriptor consumed by the gateway.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiDescriptor {
	/// Base URL, always ending with `/`.
	pub base_url: Url,
	/// Endpoint table.
	pub endpoints: Endpoints,
}
impl ApiDescriptor {
	/// Creates a new builder for the provided base URL.
	pub fn builder(base_url: Url) -> ApiDescriptorBuilder {
		ApiDescriptorBuilder::new(base_url)
	}

	/// Resolves an API path against the base URL.
	pub fn resolve(&self, path: &str) -> Result<Url, ConfigError> {
		self.base_url
			.join(path.trim_start_matches('/'))
			.map_err(|source| ConfigError::InvalidPath { path: path.to_owned(), source })
	}
}
